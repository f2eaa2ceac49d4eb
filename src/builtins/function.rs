//! Function.prototype

use crate::builtins::{arg, define_method};
use crate::context::Context;
use crate::error::{JsError, JsResult};
use crate::runtime::property::Property;
use crate::value::Value;

/// `Function.prototype` is itself callable and returns undefined
pub fn prototype_call(_ctx: &mut Context, _this: &Value, _args: &[Value]) -> JsResult<Value> {
    Ok(Value::undefined())
}

/// `Function.prototype.call(thisArg, ...args)`
pub fn call(ctx: &mut Context, this: &Value, args: &[Value]) -> JsResult<Value> {
    let rest = args.get(1..).unwrap_or(&[]);
    ctx.call(this, &arg(args, 0), rest)
}

/// `Function.prototype.apply(thisArg, argArray)`
pub fn apply(ctx: &mut Context, this: &Value, args: &[Value]) -> JsResult<Value> {
    if !ctx.is_callable(this) {
        return Err(JsError::type_error(format!(
            "{} is not a function",
            ctx.describe(this)
        )));
    }
    let arg_array = arg(args, 1);
    let list = if arg_array.is_nullish() {
        Vec::new()
    } else {
        ctx.create_list_from_array_like(&arg_array)?
    };
    ctx.call(this, &arg(args, 0), &list)
}

/// `Function.prototype.toString()`
pub fn to_string(ctx: &mut Context, this: &Value, _args: &[Value]) -> JsResult<Value> {
    let Some(id) = this.as_object().filter(|_| ctx.is_callable(this)) else {
        return Err(JsError::type_error("Function.prototype.toString requires a function"));
    };
    let name = ctx.function_name(id).unwrap_or_default();
    Ok(Value::from(format!("function {}() {{ [native code] }}", name)))
}

pub(crate) fn install(ctx: &mut Context) {
    let proto = ctx.intrinsics().function_prototype;
    let object = ctx.object_mut(proto);
    object
        .properties
        .insert("length".into(), Property::data(Value::from(0), false, false, true));
    object
        .properties
        .insert("name".into(), Property::data(Value::from(""), false, false, true));

    define_method(ctx, proto, "call", 1, call);
    define_method(ctx, proto, "apply", 2, apply);
    define_method(ctx, proto, "toString", 0, to_string);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn this_and_args(ctx: &mut Context, this: &Value, args: &[Value]) -> JsResult<Value> {
        let mut all = vec![this.clone()];
        all.extend_from_slice(args);
        Ok(Value::Object(ctx.create_array_from_list(&all)))
    }

    #[test]
    fn test_call_and_apply() {
        let mut ctx = Context::new();
        let f = Value::Object(ctx.new_function("f", 0, this_and_args));
        let json = ctx.global("JSON").unwrap();

        let result = ctx
            .invoke(&f, "call", &[Value::from(1), Value::from(2), Value::from(3)])
            .unwrap();
        let text = ctx.invoke(&json, "stringify", &[result]).unwrap();
        assert_eq!(text, Value::from("[1,2,3]"));

        let list = Value::Object(ctx.create_array_from_list(&[Value::from("a")]));
        let result = ctx.invoke(&f, "apply", &[Value::null(), list]).unwrap();
        let text = ctx.invoke(&json, "stringify", &[result]).unwrap();
        assert_eq!(text, Value::from("[null,\"a\"]"));

        let result = ctx.invoke(&f, "apply", &[Value::from(true)]).unwrap();
        let text = ctx.invoke(&json, "stringify", &[result]).unwrap();
        assert_eq!(text, Value::from("[true]"));
    }

    #[test]
    fn test_apply_rejects_primitive_list() {
        let mut ctx = Context::new();
        let f = Value::Object(ctx.new_function("f", 0, this_and_args));
        let err = ctx
            .invoke(&f, "apply", &[Value::null(), Value::from(1)])
            .unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::TypeError));
    }

    #[test]
    fn test_prototype_is_callable() {
        let mut ctx = Context::new();
        let proto = Value::Object(ctx.intrinsics().function_prototype);
        assert_eq!(ctx.type_of(&proto), "function");
        assert_eq!(ctx.call(&proto, &Value::undefined(), &[]).unwrap(), Value::undefined());
    }
}
