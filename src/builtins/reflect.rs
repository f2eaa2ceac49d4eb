//! Reflect namespace
//!
//! Each function is a direct call of the matching internal method. The
//! boolean-returning ones report `false` instead of throwing.

use crate::builtins::{arg, define_hidden, define_method};
use crate::context::Context;
use crate::error::{JsError, JsResult};
use crate::runtime::property::PropertyKey;
use crate::value::{ObjectId, Value};

fn target_object(ctx: &Context, value: &Value, method: &str) -> JsResult<ObjectId> {
    value.as_object().ok_or_else(|| {
        JsError::type_error(format!(
            "Reflect.{} called on non-object: {}",
            method,
            ctx.describe(value)
        ))
    })
}

fn apply(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    let target = arg(args, 0);
    if !ctx.is_callable(&target) {
        return Err(JsError::type_error(format!(
            "{} is not a function",
            ctx.describe(&target)
        )));
    }
    let list = ctx.create_list_from_array_like(&arg(args, 2))?;
    ctx.call(&target, &arg(args, 1), &list)
}

fn construct(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    let target = arg(args, 0);
    if !ctx.is_constructor(&target) {
        return Err(JsError::type_error(format!(
            "{} is not a constructor",
            ctx.describe(&target)
        )));
    }
    let new_target = args.get(2).cloned().unwrap_or_else(|| target.clone());
    if !ctx.is_constructor(&new_target) {
        return Err(JsError::type_error(format!(
            "{} is not a constructor",
            ctx.describe(&new_target)
        )));
    }
    let list = ctx.create_list_from_array_like(&arg(args, 1))?;
    ctx.construct(&target, &list, Some(&new_target))
}

fn define_property(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    let target = target_object(ctx, &arg(args, 0), "defineProperty")?;
    let key = ctx.to_property_key(&arg(args, 1))?;
    let desc = ctx.to_property_descriptor(&arg(args, 2))?;
    Ok(Value::from(ctx.define_own_property(target, &key, &desc)?))
}

fn delete_property(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    let target = target_object(ctx, &arg(args, 0), "deleteProperty")?;
    let key = ctx.to_property_key(&arg(args, 1))?;
    Ok(Value::from(ctx.delete_property(target, &key)?))
}

fn get(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    let target_value = arg(args, 0);
    let target = target_object(ctx, &target_value, "get")?;
    let key = ctx.to_property_key(&arg(args, 1))?;
    let receiver = args.get(2).cloned().unwrap_or(target_value);
    ctx.get_with_receiver(target, &key, &receiver)
}

fn get_own_property_descriptor(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    let target = target_object(ctx, &arg(args, 0), "getOwnPropertyDescriptor")?;
    let key = ctx.to_property_key(&arg(args, 1))?;
    let desc = ctx.get_own_property(target, &key)?.map(|p| p.to_descriptor());
    ctx.from_property_descriptor(desc.as_ref())
}

fn get_prototype_of(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    let target = target_object(ctx, &arg(args, 0), "getPrototypeOf")?;
    Ok(Value::from(ctx.get_prototype_of(target)?))
}

fn has(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    let target = target_object(ctx, &arg(args, 0), "has")?;
    let key = ctx.to_property_key(&arg(args, 1))?;
    Ok(Value::from(ctx.has_property(target, &key)?))
}

fn is_extensible(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    let target = target_object(ctx, &arg(args, 0), "isExtensible")?;
    Ok(Value::from(ctx.is_extensible(target)?))
}

fn own_keys(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    let target = target_object(ctx, &arg(args, 0), "ownKeys")?;
    let keys = ctx.own_property_keys(target)?;
    let values: Vec<Value> = keys.iter().map(PropertyKey::to_value).collect();
    Ok(Value::Object(ctx.create_array_from_list(&values)))
}

fn prevent_extensions(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    let target = target_object(ctx, &arg(args, 0), "preventExtensions")?;
    Ok(Value::from(ctx.prevent_extensions(target)?))
}

fn set(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    let target_value = arg(args, 0);
    let target = target_object(ctx, &target_value, "set")?;
    let key = ctx.to_property_key(&arg(args, 1))?;
    let receiver = args.get(3).cloned().unwrap_or(target_value);
    Ok(Value::from(ctx.set_with_receiver(target, &key, arg(args, 2), &receiver)?))
}

fn set_prototype_of(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    let target = target_object(ctx, &arg(args, 0), "setPrototypeOf")?;
    let proto = match arg(args, 1) {
        Value::Object(p) => Some(p),
        Value::Null => None,
        other => {
            return Err(JsError::type_error(format!(
                "object prototype may only be an object or null: {}",
                ctx.describe(&other)
            )));
        }
    };
    Ok(Value::from(ctx.set_prototype_of(target, proto)?))
}

pub(crate) fn install(ctx: &mut Context) {
    let reflect = ctx.new_object();
    define_method(ctx, reflect, "apply", 3, apply);
    define_method(ctx, reflect, "construct", 2, construct);
    define_method(ctx, reflect, "defineProperty", 3, define_property);
    define_method(ctx, reflect, "deleteProperty", 2, delete_property);
    define_method(ctx, reflect, "get", 2, get);
    define_method(ctx, reflect, "getOwnPropertyDescriptor", 2, get_own_property_descriptor);
    define_method(ctx, reflect, "getPrototypeOf", 1, get_prototype_of);
    define_method(ctx, reflect, "has", 2, has);
    define_method(ctx, reflect, "isExtensible", 1, is_extensible);
    define_method(ctx, reflect, "ownKeys", 1, own_keys);
    define_method(ctx, reflect, "preventExtensions", 1, prevent_extensions);
    define_method(ctx, reflect, "set", 3, set);
    define_method(ctx, reflect, "setPrototypeOf", 2, set_prototype_of);

    let global = ctx.global_object();
    define_hidden(ctx, global, "Reflect", Value::Object(reflect));
}
