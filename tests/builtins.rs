//! End-to-end behaviour of the built-in library

use std::cell::RefCell;
use std::rc::Rc;

use jscore::{Context, ErrorKind, JsResult, Value};

/// Host `print` that joins its arguments with spaces into `out`
fn install_print(ctx: &mut Context, out: &Rc<RefCell<Vec<String>>>) {
    let out = Rc::clone(out);
    let print = ctx.new_host_function("print", 0, move |ctx, _, args| {
        let mut parts = Vec::with_capacity(args.len());
        for arg in args {
            parts.push(ctx.to_string(arg)?.to_std_string_lossy());
        }
        out.borrow_mut().push(parts.join(" "));
        Ok(Value::undefined())
    });
    let global = ctx.global_object();
    ctx.create_data_property_or_throw(global, "print", Value::Object(print))
        .unwrap();
}

/// `print(typeof x, x.length, JSON.stringify(x))`
fn p(ctx: &mut Context, x: &Value) -> JsResult<()> {
    let kind = Value::from(ctx.type_of(x));
    let length = ctx.get_v(x, "length")?;
    let json = ctx.global("JSON")?;
    let text = ctx.invoke(&json, "stringify", &[x.clone()])?;
    let print = ctx.global("print")?;
    ctx.call(&print, &Value::undefined(), &[kind, length, text])?;
    Ok(())
}

#[test]
fn array_constructor_scenario() {
    let mut ctx = Context::new();
    let out = Rc::default();
    install_print(&mut ctx, &out);
    let array = ctx.global("Array").unwrap();

    let x = ctx.call(&array, &Value::undefined(), &[Value::from(3)]).unwrap();
    p(&mut ctx, &x).unwrap();

    let err = ctx
        .call(&array, &Value::undefined(), &[Value::from(-1)])
        .unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::RangeError));
    assert_eq!(ctx.error_name(&err).as_deref(), Some("RangeError"));

    let args = [Value::from(1), Value::from(2), Value::from(3)];
    let x = ctx.call(&array, &Value::undefined(), &args).unwrap();
    p(&mut ctx, &x).unwrap();

    let x = ctx.construct(&array, &[Value::from("3")], None).unwrap();
    p(&mut ctx, &x).unwrap();

    assert_eq!(
        *out.borrow(),
        [
            "object 3 [null,null,null]",
            "object 3 [1,2,3]",
            "object 1 [\"3\"]",
        ]
    );
}

#[test]
fn object_freeze_and_descriptors() {
    let mut ctx = Context::new();
    let object = ctx.global("Object").unwrap();
    let obj = ctx.new_object();
    ctx.create_data_property_or_throw(obj, "a", Value::from(1)).unwrap();
    let o = Value::Object(obj);

    let first = ctx
        .invoke(&object, "getOwnPropertyDescriptor", &[o.clone(), Value::from("a")])
        .unwrap();
    let second = ctx
        .invoke(&object, "getOwnPropertyDescriptor", &[o.clone(), Value::from("a")])
        .unwrap();
    let json = ctx.global("JSON").unwrap();
    let first = ctx.invoke(&json, "stringify", &[first]).unwrap();
    let second = ctx.invoke(&json, "stringify", &[second]).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first,
        Value::from(r#"{"value":1,"writable":true,"enumerable":true,"configurable":true}"#)
    );

    ctx.invoke(&object, "freeze", &[o.clone()]).unwrap();
    assert_eq!(ctx.invoke(&object, "isFrozen", &[o.clone()]).unwrap(), Value::from(true));
    ctx.put(&o, "a", Value::from(2), false).unwrap();
    assert_eq!(ctx.get(obj, "a").unwrap(), Value::from(1));
    let err = ctx.put(&o, "a", Value::from(2), true).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::TypeError));
    let err = ctx.put(&o, "b", Value::from(2), true).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::TypeError));
}

#[test]
fn generic_array_methods_on_array_likes() {
    let mut ctx = Context::new();
    let array = ctx.global("Array").unwrap();
    let proto = ctx.get_v(&array, "prototype").unwrap();

    let obj = ctx.new_object();
    ctx.create_data_property_or_throw(obj, "0", Value::from("a")).unwrap();
    ctx.create_data_property_or_throw(obj, "1", Value::from("b")).unwrap();
    ctx.create_data_property_or_throw(obj, "length", Value::from(2)).unwrap();
    let o = Value::Object(obj);

    let push = ctx.get_v(&proto, "push").unwrap();
    let len = ctx.call(&push, &o, &[Value::from("c")]).unwrap();
    assert_eq!(len, Value::from(3));
    assert_eq!(ctx.get(obj, "length").unwrap(), Value::from(3));

    let reverse = ctx.get_v(&proto, "reverse").unwrap();
    ctx.call(&reverse, &o, &[]).unwrap();
    let join = ctx.get_v(&proto, "join").unwrap();
    assert_eq!(ctx.call(&join, &o, &[]).unwrap(), Value::from("c,b,a"));

    let index_of = ctx.get_v(&proto, "indexOf").unwrap();
    let includes = ctx.get_v(&proto, "includes").unwrap();
    let nan = ctx.create_array_from_list(&[Value::from(f64::NAN)]);
    let nan = Value::Object(nan);
    let found = ctx.call(&index_of, &nan, &[Value::from(f64::NAN)]).unwrap();
    assert_eq!(found, Value::from(-1));
    let found = ctx.call(&includes, &nan, &[Value::from(f64::NAN)]).unwrap();
    assert_eq!(found, Value::from(true));
}

#[test]
fn reflect_and_object_statics_agree_on_key_order() {
    let mut ctx = Context::new();
    let obj = ctx.new_object();
    for key in ["b", "2", "a", "0"] {
        ctx.create_data_property_or_throw(obj, key, Value::from(1)).unwrap();
    }
    let object = ctx.global("Object").unwrap();
    let keys = ctx.invoke(&object, "keys", &[Value::Object(obj)]).unwrap();
    let joined = ctx.invoke(&keys, "join", &[]).unwrap();
    assert_eq!(joined, Value::from("0,2,b,a"));

    let reflect = ctx.global("Reflect").unwrap();
    let keys = ctx.invoke(&reflect, "ownKeys", &[Value::Object(obj)]).unwrap();
    let joined = ctx.invoke(&keys, "join", &[]).unwrap();
    assert_eq!(joined, Value::from("0,2,b,a"));
}

#[test]
fn call_depth_is_bounded() {
    let mut ctx = Context::with_config(jscore::ContextConfig {
        max_call_depth: 16,
        ..Default::default()
    });
    let recurse = ctx.new_host_function("recurse", 0, |ctx, this, _| {
        let f = ctx.global("recurse")?;
        ctx.call(&f, this, &[])
    });
    let global = ctx.global_object();
    ctx.create_data_property_or_throw(global, "recurse", Value::Object(recurse))
        .unwrap();
    let err = ctx
        .call(&Value::Object(recurse), &Value::undefined(), &[])
        .unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::RangeError));
    assert_eq!(ctx.call_depth(), 0);
}
