//! Error constructors and Error.prototype

use crate::builtins::{arg, define_hidden, define_method};
use crate::context::Context;
use crate::error::{ErrorKind, JsError, JsResult};
use crate::runtime::object::{JsObject, ObjectKind};
use crate::runtime::property::Property;
use crate::runtime::string::JsString;
use crate::value::{ObjectId, Value};

/// Allocate an error instance, storing `message` unless it is undefined
fn create_error(ctx: &mut Context, proto: ObjectId, message: &Value) -> JsResult<Value> {
    let message = match message {
        Value::Undefined => None,
        m => Some(ctx.to_string(m)?),
    };
    let mut object = JsObject::new(ObjectKind::Error, Some(proto));
    if let Some(message) = message {
        object
            .properties
            .insert("message".into(), Property::hidden(Value::String(message)));
    }
    Ok(Value::Object(ctx.alloc(object)))
}

macro_rules! error_constructor {
    ($call:ident, $construct:ident, $kind:expr) => {
        fn $call(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
            let proto = ctx.intrinsics().error_prototype_for($kind);
            create_error(ctx, proto, &arg(args, 0))
        }

        fn $construct(ctx: &mut Context, args: &[Value], new_target: ObjectId) -> JsResult<Value> {
            let fallback = ctx.intrinsics().error_prototype_for($kind);
            let proto = ctx.get_prototype_from_constructor(new_target, fallback)?;
            create_error(ctx, proto, &arg(args, 0))
        }
    };
}

error_constructor!(error_call, error_construct, ErrorKind::Error);
error_constructor!(type_error_call, type_error_construct, ErrorKind::TypeError);
error_constructor!(range_error_call, range_error_construct, ErrorKind::RangeError);
error_constructor!(reference_error_call, reference_error_construct, ErrorKind::ReferenceError);
error_constructor!(syntax_error_call, syntax_error_construct, ErrorKind::SyntaxError);

/// `Error.prototype.toString()`
fn to_string(ctx: &mut Context, this: &Value, _args: &[Value]) -> JsResult<Value> {
    let Some(id) = this.as_object() else {
        return Err(JsError::type_error(
            "Error.prototype.toString called on non-object",
        ));
    };
    let name = match ctx.get(id, "name")? {
        Value::Undefined => JsString::from("Error"),
        name => ctx.to_string(&name)?,
    };
    let message = match ctx.get(id, "message")? {
        Value::Undefined => JsString::default(),
        message => ctx.to_string(&message)?,
    };
    if name.is_empty() {
        return Ok(Value::String(message));
    }
    if message.is_empty() {
        return Ok(Value::String(name));
    }
    Ok(Value::String(name.concat(&JsString::from(": ")).concat(&message)))
}

pub(crate) fn install(ctx: &mut Context) {
    let intrinsics = *ctx.intrinsics();
    let base = ctx.new_constructor(
        "Error",
        1,
        error_call,
        error_construct,
        intrinsics.error_prototype,
    );
    define_method(ctx, intrinsics.error_prototype, "toString", 0, to_string);

    let natives = [
        (ErrorKind::Error, base),
        (
            ErrorKind::TypeError,
            ctx.new_constructor(
                "TypeError",
                1,
                type_error_call,
                type_error_construct,
                intrinsics.type_error_prototype,
            ),
        ),
        (
            ErrorKind::RangeError,
            ctx.new_constructor(
                "RangeError",
                1,
                range_error_call,
                range_error_construct,
                intrinsics.range_error_prototype,
            ),
        ),
        (
            ErrorKind::ReferenceError,
            ctx.new_constructor(
                "ReferenceError",
                1,
                reference_error_call,
                reference_error_construct,
                intrinsics.reference_error_prototype,
            ),
        ),
        (
            ErrorKind::SyntaxError,
            ctx.new_constructor(
                "SyntaxError",
                1,
                syntax_error_call,
                syntax_error_construct,
                intrinsics.syntax_error_prototype,
            ),
        ),
    ];

    let global = ctx.global_object();
    for (kind, ctor) in natives {
        let proto = intrinsics.error_prototype_for(kind);
        define_hidden(ctx, proto, "name", Value::from(kind.name()));
        define_hidden(ctx, proto, "message", Value::from(""));
        if kind != ErrorKind::Error {
            ctx.object_mut(ctor).proto = Some(base);
        }
        define_hidden(ctx, global, kind.name(), Value::Object(ctor));
    }
}
