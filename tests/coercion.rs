//! Observable ordering of coercion call-outs

use std::cell::RefCell;
use std::rc::Rc;

use jscore::{Context, ErrorKind, ObjectId, PropertyDescriptor, Value};

type Log = Rc<RefCell<Vec<String>>>;

/// A host function that records `message` and returns `result`
fn logged(ctx: &mut Context, log: &Log, message: &str, result: Value) -> Value {
    let log = Rc::clone(log);
    let message = message.to_string();
    let f = ctx.new_host_function("", 0, move |_, _, _| {
        log.borrow_mut().push(message.clone());
        Ok(result.clone())
    });
    Value::Object(f)
}

/// An object whose `toString`/`valueOf` log before returning
fn coercible(
    ctx: &mut Context,
    log: &Log,
    to_string: (&str, Value),
    value_of: (&str, Value),
) -> Value {
    let obj = ctx.new_object();
    let f = logged(ctx, log, to_string.0, to_string.1);
    ctx.create_data_property_or_throw(obj, "toString", f).unwrap();
    let f = logged(ctx, log, value_of.0, value_of.1);
    ctx.create_data_property_or_throw(obj, "valueOf", f).unwrap();
    Value::Object(obj)
}

fn define_getter(ctx: &mut Context, obj: ObjectId, key: &str, getter: Value) {
    let desc = PropertyDescriptor {
        get: Some(getter),
        enumerable: Some(true),
        configurable: Some(true),
        ..Default::default()
    };
    ctx.define_property_or_throw(obj, key, &desc).unwrap();
}

#[test]
fn join_coerces_length_then_separator_then_each_element() {
    let mut ctx = Context::new();
    let log: Log = Rc::default();

    let obj = ctx.new_object();
    let length_value = coercible(
        &mut ctx,
        &log,
        ("length retvalue toString", Value::from("4")),
        ("length retvalue valueOf", Value::from(3)),
    );
    let getter = logged(&mut ctx, &log, "length getter", length_value);
    define_getter(&mut ctx, obj, "length", getter);
    for i in 0..3 {
        let to_string = format!("{i} retvalue toString");
        let value_of = format!("{i} retvalue valueOf");
        let element = coercible(
            &mut ctx,
            &log,
            (to_string.as_str(), Value::from(format!("str{i}"))),
            (value_of.as_str(), Value::from(format!("val{i}"))),
        );
        let getter = logged(&mut ctx, &log, &format!("{i} getter"), element);
        define_getter(&mut ctx, obj, &i.to_string(), getter);
    }
    let separator = coercible(
        &mut ctx,
        &log,
        ("separator toString", Value::from(":")),
        ("separator valueOf", Value::from(";")),
    );

    let array = ctx.global("Array").unwrap();
    let proto = ctx.get_v(&array, "prototype").unwrap();
    let join = ctx.get_v(&proto, "join").unwrap();
    let call = ctx.get_v(&join, "call").unwrap();
    let result = ctx
        .call(&call, &join, &[Value::Object(obj), separator])
        .unwrap();

    assert_eq!(result, Value::from("str0:str1:str2"));
    // ECMA-262 order: length is read and converted before the separator.
    // Duktape coerces the separator first and logs "separator toString"
    // ahead of "length getter".
    assert_eq!(
        *log.borrow(),
        [
            "length getter",
            "length retvalue valueOf",
            "separator toString",
            "0 getter",
            "0 retvalue toString",
            "1 getter",
            "1 retvalue toString",
            "2 getter",
            "2 retvalue toString",
        ]
    );
}

#[test]
fn join_length_goes_through_to_uint32() {
    let mut ctx = Context::new();
    let array = ctx.global("Array").unwrap();
    let proto = ctx.get_v(&array, "prototype").unwrap();
    let join = ctx.get_v(&proto, "join").unwrap();

    let cases = [
        (Value::from(3.9), "foo_bar_quux"),
        (Value::from(-4294967296.0 + 3.9), "foo_bar_quux_baz"),
        (Value::from("3.9"), "foo_bar_quux"),
    ];
    for (length, expected) in cases {
        let obj = ctx.new_object();
        for (i, s) in ["foo", "bar", "quux", "baz"].into_iter().enumerate() {
            ctx.create_data_property_or_throw(obj, i as u32, Value::from(s))
                .unwrap();
        }
        ctx.create_data_property_or_throw(obj, "length", length).unwrap();
        let result = ctx
            .call(&join, &Value::Object(obj), &[Value::from("_")])
            .unwrap();
        assert_eq!(result, Value::from(expected));
    }
}

#[test]
fn to_primitive_prefers_exotic_method() {
    let mut ctx = Context::new();
    let log: Log = Rc::default();
    let obj = coercible(
        &mut ctx,
        &log,
        ("toString", Value::from("s")),
        ("valueOf", Value::from(1)),
    );
    let id = obj.as_object().unwrap();
    let exotic = {
        let log = Rc::clone(&log);
        ctx.new_host_function("", 1, move |_, _, args| {
            let hint = args.first().cloned().unwrap_or_default();
            log.borrow_mut()
                .push(format!("@@toPrimitive {}", hint.as_string().unwrap()));
            Ok(Value::from(7))
        })
    };
    let to_primitive = ctx.well_known_symbols().to_primitive.clone();
    ctx.create_data_property_or_throw(id, to_primitive, Value::Object(exotic))
        .unwrap();

    assert_eq!(ctx.to_number(&obj).unwrap(), 7.0);
    assert!(ctx.to_string(&obj).unwrap().eq_str("7"));
    assert!(ctx.loose_equals(&obj, &Value::from(7)).unwrap());
    assert_eq!(
        *log.borrow(),
        ["@@toPrimitive number", "@@toPrimitive string", "@@toPrimitive default"]
    );
}

#[test]
fn user_errors_propagate_unchanged() {
    let mut ctx = Context::new();
    let obj = ctx.new_object();
    let thrower = ctx.new_host_function("", 0, |_, _, _| Err(jscore::JsError::thrown("boom")));
    ctx.create_data_property_or_throw(obj, "valueOf", Value::Object(thrower))
        .unwrap();
    let err = ctx.to_number(&Value::Object(obj)).unwrap_err();
    assert!(matches!(err, jscore::JsError::Thrown(ref v) if *v == Value::from("boom")));

    let sym = Value::from(jscore::Symbol::new(None));
    let err = ctx.to_number(&sym).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::TypeError));
}
