//! Number constructor and Number.prototype

use crate::builtins::{arg, define_constant, define_hidden, define_method};
use crate::context::Context;
use crate::error::{JsError, JsResult};
use crate::runtime::object::{JsObject, ObjectKind};
use crate::util::dtoa::{number_to_string, number_to_string_radix};
use crate::value::{ObjectId, Value};

fn number_call(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    match args.first() {
        None => Ok(Value::from(0)),
        Some(value) => Ok(Value::from(ctx.to_number(value)?)),
    }
}

fn number_construct(ctx: &mut Context, args: &[Value], new_target: ObjectId) -> JsResult<Value> {
    let n = match args.first() {
        None => 0.0,
        Some(value) => ctx.to_number(value)?,
    };
    let fallback = ctx.intrinsics().number_prototype;
    let proto = ctx.get_prototype_from_constructor(new_target, fallback)?;
    Ok(Value::Object(
        ctx.alloc(JsObject::new(ObjectKind::Number(n), Some(proto))),
    ))
}

/// `thisNumberValue(value)`
fn this_number_value(ctx: &Context, this: &Value, method: &str) -> JsResult<f64> {
    match this {
        Value::Number(n) => return Ok(*n),
        Value::Object(id) => {
            if let ObjectKind::Number(n) = ctx.object(*id).kind {
                return Ok(n);
            }
        }
        _ => {}
    }
    Err(JsError::type_error(format!(
        "Number.prototype.{} requires that 'this' be a Number",
        method
    )))
}

fn value_of(ctx: &mut Context, this: &Value, _args: &[Value]) -> JsResult<Value> {
    Ok(Value::from(this_number_value(ctx, this, "valueOf")?))
}

/// `Number.prototype.toString(radix)`
fn to_string(ctx: &mut Context, this: &Value, args: &[Value]) -> JsResult<Value> {
    let x = this_number_value(ctx, this, "toString")?;
    let radix = match arg(args, 0) {
        Value::Undefined => 10.0,
        r => ctx.to_integer(&r)?,
    };
    if !(2.0..=36.0).contains(&radix) {
        return Err(JsError::range_error("toString() radix must be between 2 and 36"));
    }
    let radix = radix as u32;
    if radix == 10 {
        return Ok(Value::from(number_to_string(x)));
    }
    Ok(Value::from(number_to_string_radix(x, radix)))
}

pub(crate) fn install(ctx: &mut Context) {
    let proto = ctx.intrinsics().number_prototype;
    let ctor = ctx.new_constructor("Number", 1, number_call, number_construct, proto);

    let constants = [
        ("MAX_VALUE", f64::MAX),
        ("MIN_VALUE", 5e-324),
        ("NaN", f64::NAN),
        ("POSITIVE_INFINITY", f64::INFINITY),
        ("NEGATIVE_INFINITY", f64::NEG_INFINITY),
        ("MAX_SAFE_INTEGER", 9_007_199_254_740_991.0),
        ("MIN_SAFE_INTEGER", -9_007_199_254_740_991.0),
        ("EPSILON", f64::EPSILON),
    ];
    for (name, value) in constants {
        define_constant(ctx, ctor, name, Value::from(value));
    }

    define_method(ctx, proto, "valueOf", 0, value_of);
    define_method(ctx, proto, "toString", 1, to_string);

    let global = ctx.global_object();
    define_hidden(ctx, global, "Number", Value::Object(ctor));
}
