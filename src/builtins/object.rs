//! Object constructor and Object.prototype

use crate::builtins::{arg, define_method};
use crate::context::Context;
use crate::error::{JsError, JsResult};
use crate::runtime::object::{JsObject, ObjectKind};
use crate::runtime::operations::IntegrityLevel;
use crate::runtime::property::PropertyKey;
use crate::value::{ObjectId, Value};

fn require_object(ctx: &Context, value: &Value, method: &str) -> JsResult<ObjectId> {
    value.as_object().ok_or_else(|| {
        JsError::type_error(format!(
            "Object.{} called on non-object: {}",
            method,
            ctx.describe(value)
        ))
    })
}

/// Build an array holding the given keys as values
fn keys_to_array(ctx: &mut Context, keys: &[PropertyKey]) -> Value {
    let values: Vec<Value> = keys.iter().map(PropertyKey::to_value).collect();
    Value::Object(ctx.create_array_from_list(&values))
}

/// `ObjectDefineProperties(O, Properties)`
///
/// All descriptors are read before any of them is applied.
fn define_properties(ctx: &mut Context, id: ObjectId, properties: &Value) -> JsResult<()> {
    let props = ctx.to_object(properties)?;
    let mut descriptors = Vec::new();
    for key in ctx.own_property_keys(props)? {
        let Some(prop) = ctx.get_own_property(props, &key)? else {
            continue;
        };
        if !prop.enumerable {
            continue;
        }
        let desc_obj = ctx.get(props, &key)?;
        let desc = ctx.to_property_descriptor(&desc_obj)?;
        descriptors.push((key, desc));
    }
    for (key, desc) in descriptors {
        ctx.define_property_or_throw(id, key, &desc)?;
    }
    Ok(())
}

fn object_call(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    let value = arg(args, 0);
    if value.is_nullish() {
        return Ok(Value::Object(ctx.new_object()));
    }
    Ok(Value::Object(ctx.to_object(&value)?))
}

fn object_construct(ctx: &mut Context, args: &[Value], new_target: ObjectId) -> JsResult<Value> {
    let value = arg(args, 0);
    if value.is_nullish() {
        let fallback = ctx.intrinsics().object_prototype;
        let proto = ctx.get_prototype_from_constructor(new_target, fallback)?;
        return Ok(Value::Object(ctx.alloc(JsObject::ordinary(Some(proto)))));
    }
    Ok(Value::Object(ctx.to_object(&value)?))
}

/// `Object.defineProperty(O, P, Attributes)`
fn define_property(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    let target = arg(args, 0);
    let id = require_object(ctx, &target, "defineProperty")?;
    let key = ctx.to_property_key(&arg(args, 1))?;
    let desc = ctx.to_property_descriptor(&arg(args, 2))?;
    ctx.define_property_or_throw(id, key, &desc)?;
    Ok(target)
}

/// `Object.defineProperties(O, Properties)`
fn define_properties_fn(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    let target = arg(args, 0);
    let id = require_object(ctx, &target, "defineProperties")?;
    define_properties(ctx, id, &arg(args, 1))?;
    Ok(target)
}

/// `Object.getOwnPropertyDescriptor(O, P)`
fn get_own_property_descriptor(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    let id = ctx.to_object(&arg(args, 0))?;
    let key = ctx.to_property_key(&arg(args, 1))?;
    let desc = ctx.get_own_property(id, &key)?.map(|p| p.to_descriptor());
    ctx.from_property_descriptor(desc.as_ref())
}

fn get_own_property_names(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    let id = ctx.to_object(&arg(args, 0))?;
    let mut keys = ctx.own_property_keys(id)?;
    keys.retain(|k| !k.is_symbol());
    Ok(keys_to_array(ctx, &keys))
}

fn get_own_property_symbols(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    let id = ctx.to_object(&arg(args, 0))?;
    let mut keys = ctx.own_property_keys(id)?;
    keys.retain(PropertyKey::is_symbol);
    Ok(keys_to_array(ctx, &keys))
}

fn keys(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    let id = ctx.to_object(&arg(args, 0))?;
    let names = ctx.enumerable_own_names(id)?;
    Ok(keys_to_array(ctx, &names))
}

fn get_prototype_of(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    let id = ctx.to_object(&arg(args, 0))?;
    Ok(Value::from(ctx.get_prototype_of(id)?))
}

fn set_prototype_of(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    let target = arg(args, 0);
    ctx.require_object_coercible(&target)?;
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
    let Some(id) = target.as_object() else {
        return Ok(target);
    };
    if !ctx.set_prototype_of(id, proto)? {
        return Err(JsError::type_error("cannot set prototype"));
    }
    Ok(target)
}

fn create(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    let proto = match arg(args, 0) {
        Value::Object(p) => Some(p),
        Value::Null => None,
        other => {
            return Err(JsError::type_error(format!(
                "object prototype may only be an object or null: {}",
                ctx.describe(&other)
            )));
        }
    };
    let id = ctx.alloc(JsObject::ordinary(proto));
    let properties = arg(args, 1);
    if !properties.is_undefined() {
        define_properties(ctx, id, &properties)?;
    }
    Ok(Value::Object(id))
}

fn prevent_extensions(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    let target = arg(args, 0);
    if let Some(id) = target.as_object() {
        if !ctx.prevent_extensions(id)? {
            return Err(JsError::type_error("cannot prevent extensions"));
        }
    }
    Ok(target)
}

fn is_extensible(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    match arg(args, 0).as_object() {
        Some(id) => Ok(Value::from(ctx.is_extensible(id)?)),
        None => Ok(Value::from(false)),
    }
}

fn set_level(ctx: &mut Context, args: &[Value], level: IntegrityLevel) -> JsResult<Value> {
    let target = arg(args, 0);
    if let Some(id) = target.as_object() {
        if !ctx.set_integrity_level(id, level)? {
            return Err(JsError::type_error(match level {
                IntegrityLevel::Sealed => "cannot seal object",
                IntegrityLevel::Frozen => "cannot freeze object",
            }));
        }
    }
    Ok(target)
}

fn test_level(ctx: &mut Context, args: &[Value], level: IntegrityLevel) -> JsResult<Value> {
    match arg(args, 0).as_object() {
        Some(id) => Ok(Value::from(ctx.test_integrity_level(id, level)?)),
        None => Ok(Value::from(true)),
    }
}

fn freeze(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    set_level(ctx, args, IntegrityLevel::Frozen)
}

fn seal(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    set_level(ctx, args, IntegrityLevel::Sealed)
}

fn is_frozen(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    test_level(ctx, args, IntegrityLevel::Frozen)
}

fn is_sealed(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    test_level(ctx, args, IntegrityLevel::Sealed)
}

/// `Object.prototype.hasOwnProperty(V)`: key first, then `this`
fn has_own_property(ctx: &mut Context, this: &Value, args: &[Value]) -> JsResult<Value> {
    let key = ctx.to_property_key(&arg(args, 0))?;
    let id = ctx.to_object(this)?;
    Ok(Value::from(ctx.has_own_property(id, key)?))
}

fn property_is_enumerable(ctx: &mut Context, this: &Value, args: &[Value]) -> JsResult<Value> {
    let key = ctx.to_property_key(&arg(args, 0))?;
    let id = ctx.to_object(this)?;
    let enumerable = ctx.get_own_property(id, &key)?.is_some_and(|p| p.enumerable);
    Ok(Value::from(enumerable))
}

fn is_prototype_of(ctx: &mut Context, this: &Value, args: &[Value]) -> JsResult<Value> {
    let Some(mut current) = arg(args, 0).as_object() else {
        return Ok(Value::from(false));
    };
    let id = ctx.to_object(this)?;
    let mut steps = 0;
    while let Some(proto) = ctx.get_prototype_of(current)? {
        if proto == id {
            return Ok(Value::from(true));
        }
        steps += 1;
        if steps > ctx.config().max_prototype_chain {
            return Err(JsError::range_error("prototype chain too long"));
        }
        current = proto;
    }
    Ok(Value::from(false))
}

/// `Object.prototype.toString()`
pub fn to_string(ctx: &mut Context, this: &Value, _args: &[Value]) -> JsResult<Value> {
    let tag = match this {
        Value::Undefined => "Undefined",
        Value::Null => "Null",
        _ => {
            let id = ctx.to_object(this)?;
            if ctx.is_array(&Value::Object(id))? {
                "Array"
            } else if ctx.is_callable(&Value::Object(id)) {
                "Function"
            } else {
                match ctx.object(id).kind {
                    ObjectKind::Error => "Error",
                    ObjectKind::Boolean(_) => "Boolean",
                    ObjectKind::Number(_) => "Number",
                    ObjectKind::String(_) => "String",
                    _ => "Object",
                }
            }
        }
    };
    Ok(Value::from(format!("[object {}]", tag)))
}

/// `Object.prototype.toLocaleString()`: `this.toString()` with `this` kept
/// as the primitive receiver
fn to_locale_string(ctx: &mut Context, this: &Value, _args: &[Value]) -> JsResult<Value> {
    ctx.require_object_coercible(this)?;
    ctx.invoke(this, "toString", &[])
}

fn value_of(ctx: &mut Context, this: &Value, _args: &[Value]) -> JsResult<Value> {
    Ok(Value::Object(ctx.to_object(this)?))
}

pub(crate) fn install(ctx: &mut Context) {
    let proto = ctx.intrinsics().object_prototype;
    let ctor = ctx.new_constructor("Object", 1, object_call, object_construct, proto);

    define_method(ctx, ctor, "defineProperty", 3, define_property);
    define_method(ctx, ctor, "defineProperties", 2, define_properties_fn);
    define_method(ctx, ctor, "getOwnPropertyDescriptor", 2, get_own_property_descriptor);
    define_method(ctx, ctor, "getOwnPropertyNames", 1, get_own_property_names);
    define_method(ctx, ctor, "getOwnPropertySymbols", 1, get_own_property_symbols);
    define_method(ctx, ctor, "keys", 1, keys);
    define_method(ctx, ctor, "getPrototypeOf", 1, get_prototype_of);
    define_method(ctx, ctor, "setPrototypeOf", 2, set_prototype_of);
    define_method(ctx, ctor, "create", 2, create);
    define_method(ctx, ctor, "preventExtensions", 1, prevent_extensions);
    define_method(ctx, ctor, "isExtensible", 1, is_extensible);
    define_method(ctx, ctor, "freeze", 1, freeze);
    define_method(ctx, ctor, "isFrozen", 1, is_frozen);
    define_method(ctx, ctor, "seal", 1, seal);
    define_method(ctx, ctor, "isSealed", 1, is_sealed);

    define_method(ctx, proto, "hasOwnProperty", 1, has_own_property);
    define_method(ctx, proto, "propertyIsEnumerable", 1, property_is_enumerable);
    define_method(ctx, proto, "isPrototypeOf", 1, is_prototype_of);
    define_method(ctx, proto, "toString", 0, to_string);
    define_method(ctx, proto, "toLocaleString", 0, to_locale_string);
    define_method(ctx, proto, "valueOf", 0, value_of);

    let global = ctx.global_object();
    crate::builtins::define_hidden(ctx, global, "Object", Value::Object(ctor));
}
