//! Boolean constructor and Boolean.prototype

use crate::builtins::{arg, define_hidden, define_method};
use crate::context::Context;
use crate::error::{JsError, JsResult};
use crate::runtime::conversion::to_boolean;
use crate::runtime::object::{JsObject, ObjectKind};
use crate::value::{ObjectId, Value};

fn boolean_call(_ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    Ok(Value::from(to_boolean(&arg(args, 0))))
}

fn boolean_construct(ctx: &mut Context, args: &[Value], new_target: ObjectId) -> JsResult<Value> {
    let b = to_boolean(&arg(args, 0));
    let fallback = ctx.intrinsics().boolean_prototype;
    let proto = ctx.get_prototype_from_constructor(new_target, fallback)?;
    Ok(Value::Object(
        ctx.alloc(JsObject::new(ObjectKind::Boolean(b), Some(proto))),
    ))
}

fn this_boolean_value(ctx: &Context, this: &Value) -> JsResult<bool> {
    match this {
        Value::Bool(b) => return Ok(*b),
        Value::Object(id) => {
            if let ObjectKind::Boolean(b) = ctx.object(*id).kind {
                return Ok(b);
            }
        }
        _ => {}
    }
    Err(JsError::type_error("'this' is not a Boolean"))
}

fn value_of(ctx: &mut Context, this: &Value, _args: &[Value]) -> JsResult<Value> {
    Ok(Value::from(this_boolean_value(ctx, this)?))
}

fn to_string(ctx: &mut Context, this: &Value, _args: &[Value]) -> JsResult<Value> {
    let b = this_boolean_value(ctx, this)?;
    Ok(Value::from(if b { "true" } else { "false" }))
}

pub(crate) fn install(ctx: &mut Context) {
    let proto = ctx.intrinsics().boolean_prototype;
    let ctor = ctx.new_constructor("Boolean", 1, boolean_call, boolean_construct, proto);
    define_method(ctx, proto, "valueOf", 0, value_of);
    define_method(ctx, proto, "toString", 0, to_string);

    let global = ctx.global_object();
    define_hidden(ctx, global, "Boolean", Value::Object(ctor));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapper_is_truthy() {
        let mut ctx = Context::new();
        let boolean = ctx.global("Boolean").unwrap();
        let wrapped = ctx.construct(&boolean, &[Value::from(false)], None).unwrap();
        assert!(to_boolean(&wrapped));
        assert_eq!(value_of(&mut ctx, &wrapped, &[]).unwrap(), Value::from(false));
        assert_eq!(to_string(&mut ctx, &wrapped, &[]).unwrap(), Value::from("false"));
        let plain = ctx.call(&boolean, &Value::undefined(), &[Value::from("")]).unwrap();
        assert_eq!(plain, Value::from(false));
        assert!(to_string(&mut ctx, &Value::from(1), &[]).is_err());
    }
}
