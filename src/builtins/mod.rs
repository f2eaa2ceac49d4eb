//! JavaScript built-in objects
//!
//! This module contains the standard library functions layered over the
//! object model. Each submodule exposes an `install` function that
//! populates its constructor, prototype and global binding.
//!
//! Built-ins coerce `this` first, then `length` where one is read, then
//! their arguments left to right.

pub mod array;
pub mod boolean;
pub mod error;
pub mod function;
pub mod json;
pub mod number;
pub mod object;
pub mod proxy;
pub mod reflect;
pub mod string;
pub mod symbol;

use crate::context::Context;
use crate::runtime::function::NativeFn;
use crate::runtime::property::{Property, PropertyKey};
use crate::value::{ObjectId, Value};

/// Argument at `index`, undefined when absent
#[inline]
pub(crate) fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or_default()
}

/// Install a native method as a writable, non-enumerable property
pub(crate) fn define_method(
    ctx: &mut Context,
    target: ObjectId,
    name: &str,
    length: u32,
    f: NativeFn,
) -> ObjectId {
    let func = ctx.new_function(name, length, f);
    define_hidden(ctx, target, name, Value::Object(func));
    func
}

/// Store a writable, non-enumerable, configurable data property
pub(crate) fn define_hidden(
    ctx: &mut Context,
    target: ObjectId,
    key: impl Into<PropertyKey>,
    value: Value,
) {
    ctx.object_mut(target)
        .properties
        .insert(key.into(), Property::hidden(value));
}

/// Store a read-only, non-enumerable, non-configurable data property
pub(crate) fn define_constant(
    ctx: &mut Context,
    target: ObjectId,
    key: impl Into<PropertyKey>,
    value: Value,
) {
    ctx.object_mut(target)
        .properties
        .insert(key.into(), Property::data(value, false, false, false));
}

/// Populate the intrinsics and the global object
pub(crate) fn install(ctx: &mut Context) {
    function::install(ctx);
    object::install(ctx);
    array::install(ctx);
    string::install(ctx);
    symbol::install(ctx);
    number::install(ctx);
    boolean::install(ctx);
    error::install(ctx);
    proxy::install(ctx);
    reflect::install(ctx);
    json::install(ctx);

    let global = ctx.global_object();
    define_constant(ctx, global, "undefined", Value::undefined());
    define_constant(ctx, global, "NaN", Value::from(f64::NAN));
    define_constant(ctx, global, "Infinity", Value::from(f64::INFINITY));
    define_hidden(ctx, global, "globalThis", Value::Object(global));
}
