//! Coupling between an array's `length` and its index properties

use jscore::{Context, ErrorKind, ObjectId, PropertyDescriptor, PropertyKey, Value};

fn attributes(ctx: &mut Context, fields: &[(&str, Value)]) -> Value {
    let obj = ctx.new_object();
    for (name, value) in fields {
        ctx.create_data_property_or_throw(obj, *name, value.clone())
            .unwrap();
    }
    Value::Object(obj)
}

fn define_property(ctx: &mut Context, target: ObjectId, key: &str, attrs: Value) -> jscore::JsResult<Value> {
    let object = ctx.global("Object").unwrap();
    ctx.invoke(
        &object,
        "defineProperty",
        &[Value::Object(target), Value::from(key), attrs],
    )
}

fn one_to_ten(ctx: &mut Context) -> ObjectId {
    let values: Vec<Value> = (1..=10).map(Value::from).collect();
    ctx.create_array_from_list(&values)
}

#[test]
fn truncation_stops_at_non_configurable_element() {
    let mut ctx = Context::new();
    let arr = one_to_ten(&mut ctx);
    let attrs = attributes(&mut ctx, &[("configurable", Value::from(false))]);
    define_property(&mut ctx, arr, "7", attrs).unwrap();

    let attrs = attributes(&mut ctx, &[("value", Value::from(4))]);
    let err = define_property(&mut ctx, arr, "length", attrs).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::TypeError));

    assert_eq!(ctx.get(arr, "length").unwrap(), Value::from(8));
    assert_eq!(ctx.get(arr, "7").unwrap(), Value::from(8));
    assert!(!ctx.has_own_property(arr, "8").unwrap());
    assert!(!ctx.has_own_property(arr, "9").unwrap());
    assert_eq!(ctx.get(arr, "3").unwrap(), Value::from(4));
}

#[test]
fn sloppy_length_write_reports_no_error() {
    let mut ctx = Context::new();
    let arr = one_to_ten(&mut ctx);
    let attrs = attributes(&mut ctx, &[("configurable", Value::from(false))]);
    define_property(&mut ctx, arr, "5", attrs).unwrap();

    let base = Value::Object(arr);
    ctx.put(&base, "length", Value::from(2), false).unwrap();
    assert_eq!(ctx.get(arr, "length").unwrap(), Value::from(6));

    let err = ctx.put(&base, "length", Value::from(2), true).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::TypeError));
}

#[test]
fn invalid_length_is_range_error_before_any_change() {
    let mut ctx = Context::new();
    let arr = one_to_ten(&mut ctx);
    let base = Value::Object(arr);
    for bad in [Value::from(1.5), Value::from(-1), Value::from(4294967296.0)] {
        let err = ctx.put(&base, "length", bad, false).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::RangeError));
    }
    assert_eq!(ctx.get(arr, "length").unwrap(), Value::from(10));

    ctx.put(&base, "length", Value::from("3"), true).unwrap();
    assert_eq!(ctx.get(arr, "length").unwrap(), Value::from(3));
}

#[test]
fn index_writes_extend_length() {
    let mut ctx = Context::new();
    let arr = ctx.create_array_from_list(&[]);
    let base = Value::Object(arr);
    ctx.put(&base, 9u32, Value::from("x"), true).unwrap();
    assert_eq!(ctx.get(arr, "length").unwrap(), Value::from(10));
    ctx.put(&base, "4294967295", Value::from("y"), true).unwrap();
    assert_eq!(ctx.get(arr, "length").unwrap(), Value::from(10));
}

#[test]
fn non_writable_length_blocks_growth_and_shrinking() {
    let mut ctx = Context::new();
    let arr = ctx.create_array_from_list(&[Value::from(1), Value::from(2)]);
    ctx.define_property_or_throw(
        arr,
        "length",
        &PropertyDescriptor {
            writable: Some(false),
            ..Default::default()
        },
    )
    .unwrap();

    assert!(!ctx.create_data_property(arr, 2u32, Value::from(3)).unwrap());
    assert!(!ctx.set(arr, "length", Value::from(0), false).unwrap());
    assert_eq!(ctx.get(arr, "length").unwrap(), Value::from(2));
    assert_eq!(ctx.get(arr, "1").unwrap(), Value::from(2));

    let desc = ctx
        .get_own_property(arr, &PropertyKey::from("length"))
        .unwrap()
        .unwrap();
    assert!(!desc.configurable);
    assert!(!desc.enumerable);
    assert_eq!(desc.writable(), Some(false));
}
