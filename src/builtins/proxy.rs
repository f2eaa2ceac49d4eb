//! Proxy constructor and Proxy.revocable

use std::cell::Cell;

use crate::builtins::{arg, define_hidden, define_method};
use crate::context::Context;
use crate::error::{JsError, JsResult};
use crate::value::{ObjectId, Value};

fn proxy_call(_ctx: &mut Context, _this: &Value, _args: &[Value]) -> JsResult<Value> {
    Err(JsError::type_error("constructor Proxy requires 'new'"))
}

fn proxy_construct(ctx: &mut Context, args: &[Value], _new_target: ObjectId) -> JsResult<Value> {
    let proxy = ctx.proxy_create(&arg(args, 0), &arg(args, 1))?;
    Ok(Value::Object(proxy))
}

/// `Proxy.revocable(target, handler)`: `{ proxy, revoke }`
fn revocable(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    let proxy = ctx.proxy_create(&arg(args, 0), &arg(args, 1))?;
    let slot = Cell::new(Some(proxy));
    let revoke = ctx.new_host_function("", 0, move |ctx, _this, _args| {
        if let Some(proxy) = slot.take() {
            ctx.revoke_proxy(proxy);
        }
        Ok(Value::undefined())
    });
    let result = ctx.new_object();
    ctx.create_data_property_or_throw(result, "proxy", Value::Object(proxy))?;
    ctx.create_data_property_or_throw(result, "revoke", Value::Object(revoke))?;
    Ok(Value::Object(result))
}

pub(crate) fn install(ctx: &mut Context) {
    let ctor = ctx.new_native_constructor("Proxy", 2, proxy_call, proxy_construct);
    define_method(ctx, ctor, "revocable", 2, revocable);
    let global = ctx.global_object();
    define_hidden(ctx, global, "Proxy", Value::Object(ctor));
}
