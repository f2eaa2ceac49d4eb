//! Symbol function and Symbol.prototype

use crate::builtins::{arg, define_constant, define_hidden, define_method};
use crate::context::Context;
use crate::error::{JsError, JsResult};
use crate::runtime::object::ObjectKind;
use crate::runtime::property::Property;
use crate::value::{Symbol, Value};

/// `Symbol(description)`
fn symbol_call(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    let description = match arg(args, 0) {
        Value::Undefined => None,
        desc => Some(ctx.to_string(&desc)?),
    };
    Ok(Value::from(Symbol::new(description)))
}

/// `Symbol.for(key)`
fn symbol_for(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    let key = ctx.to_string(&arg(args, 0))?;
    Ok(Value::from(ctx.symbol_registry_mut().for_key(&key)))
}

/// `Symbol.keyFor(sym)`
fn key_for(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    let value = arg(args, 0);
    let Some(sym) = value.as_symbol() else {
        return Err(JsError::type_error(format!(
            "{} is not a symbol",
            ctx.describe(&value)
        )));
    };
    Ok(match ctx.symbol_registry().key_for(sym) {
        Some(key) => Value::String(key),
        None => Value::undefined(),
    })
}

/// `thisSymbolValue(value)`
fn this_symbol_value(ctx: &Context, this: &Value) -> JsResult<Symbol> {
    match this {
        Value::Symbol(sym) => return Ok(sym.clone()),
        Value::Object(id) => {
            if let ObjectKind::Symbol(sym) = &ctx.object(*id).kind {
                return Ok(sym.clone());
            }
        }
        _ => {}
    }
    Err(JsError::type_error("'this' is not a Symbol"))
}

fn to_string(ctx: &mut Context, this: &Value, _args: &[Value]) -> JsResult<Value> {
    Ok(Value::String(this_symbol_value(ctx, this)?.descriptive_string()))
}

/// Also installed as `Symbol.prototype[Symbol.toPrimitive]`
fn value_of(ctx: &mut Context, this: &Value, _args: &[Value]) -> JsResult<Value> {
    Ok(Value::from(this_symbol_value(ctx, this)?))
}

fn description(ctx: &mut Context, this: &Value, _args: &[Value]) -> JsResult<Value> {
    let sym = this_symbol_value(ctx, this)?;
    Ok(match sym.description() {
        Some(desc) => Value::String(desc.clone()),
        None => Value::undefined(),
    })
}

pub(crate) fn install(ctx: &mut Context) {
    let proto = ctx.intrinsics().symbol_prototype;
    let ctor = ctx.new_function("Symbol", 0, symbol_call);
    ctx.link_constructor(ctor, proto, false);

    define_method(ctx, ctor, "for", 1, symbol_for);
    define_method(ctx, ctor, "keyFor", 1, key_for);
    let well_known = ctx.well_known_symbols().clone();
    define_constant(ctx, ctor, "toPrimitive", Value::from(well_known.to_primitive.clone()));
    define_constant(
        ctx,
        ctor,
        "isConcatSpreadable",
        Value::from(well_known.is_concat_spreadable),
    );

    define_method(ctx, proto, "toString", 0, to_string);
    define_method(ctx, proto, "valueOf", 0, value_of);
    let getter = ctx.new_function("get description", 0, description);
    ctx.object_mut(proto).properties.insert(
        "description".into(),
        Property::accessor(Value::Object(getter), Value::undefined(), false, true),
    );
    let to_primitive = ctx.new_function("[Symbol.toPrimitive]", 1, value_of);
    ctx.object_mut(proto).properties.insert(
        well_known.to_primitive.into(),
        Property::data(Value::Object(to_primitive), false, false, true),
    );

    let global = ctx.global_object();
    define_hidden(ctx, global, "Symbol", Value::Object(ctor));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::runtime::property::PropertyKey;

    fn symbol_fn(ctx: &mut Context, name: &str, args: &[Value]) -> JsResult<Value> {
        let symbol = ctx.global("Symbol").unwrap();
        ctx.invoke(&symbol, name, args)
    }

    #[test]
    fn test_symbol_identity() {
        let mut ctx = Context::new();
        let symbol = ctx.global("Symbol").unwrap();
        let a = ctx.call(&symbol, &Value::undefined(), &[Value::from("x")]).unwrap();
        let b = ctx.call(&symbol, &Value::undefined(), &[Value::from("x")]).unwrap();
        assert!(!ctx.strict_equals(&a, &b));

        let c = symbol_fn(&mut ctx, "for", &[Value::from("x")]).unwrap();
        let d = symbol_fn(&mut ctx, "for", &[Value::from("x")]).unwrap();
        assert!(ctx.strict_equals(&c, &d));
        assert!(!ctx.strict_equals(&a, &c));
    }

    #[test]
    fn test_key_for() {
        let mut ctx = Context::new();
        let registered = symbol_fn(&mut ctx, "for", &[Value::from("k")]).unwrap();
        assert_eq!(symbol_fn(&mut ctx, "keyFor", &[registered]).unwrap(), Value::from("k"));
        let local = Value::from(Symbol::new(None));
        assert_eq!(symbol_fn(&mut ctx, "keyFor", &[local]).unwrap(), Value::undefined());
        let err = symbol_fn(&mut ctx, "keyFor", &[Value::from("k")]).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::TypeError));
    }

    #[test]
    fn test_not_a_constructor() {
        let mut ctx = Context::new();
        let symbol = ctx.global("Symbol").unwrap();
        assert!(!ctx.is_constructor(&symbol));
        let err = ctx.construct(&symbol, &[], None).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::TypeError));
    }

    #[test]
    fn test_prototype_methods() {
        let mut ctx = Context::new();
        let sym = Value::from(Symbol::new(Some("d".into())));
        assert_eq!(ctx.invoke(&sym, "toString", &[]).unwrap(), Value::from("Symbol(d)"));
        assert_eq!(ctx.get_v(&sym, "description").unwrap(), Value::from("d"));
        let anonymous = Value::from(Symbol::new(None));
        assert_eq!(ctx.get_v(&anonymous, "description").unwrap(), Value::undefined());
        assert_eq!(ctx.invoke(&anonymous, "toString", &[]).unwrap(), Value::from("Symbol()"));
    }

    #[test]
    fn test_wrapped_symbol_as_key() {
        let mut ctx = Context::new();
        let sym = Symbol::new(Some("k".into()));
        let wrapper = Value::Object(ctx.to_object(&Value::from(sym.clone())).unwrap());
        let key = ctx.to_property_key(&wrapper).unwrap();
        assert_eq!(key, PropertyKey::from(sym));
        let err = ctx.to_string(&wrapper).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::TypeError));
    }
}
