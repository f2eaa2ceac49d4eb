//! JavaScript function types
//!
//! Functions are objects of kind [`ObjectKind::Function`]. Their behavior is
//! either a native Rust function pointer or a host closure:
//! - [`NativeFn`] backs the built-in library
//! - [`HostClosure`] lets embedders and tests create functions that capture
//!   Rust state, such as log buffers standing in for `print`
//!
//! `[[Call]]` and `[[Construct]]` dispatch live here as well, including
//! forwarding to proxy traps for callable proxies.

use std::fmt;
use std::rc::Rc;

use crate::context::Context;
use crate::error::{JsError, JsResult};
use crate::runtime::object::{JsObject, ObjectKind};
use crate::runtime::property::{Property, PropertyKey};
use crate::runtime::string::JsString;
use crate::value::{ObjectId, Value};

/// Native function signature: context, this value, arguments
pub type NativeFn = fn(&mut Context, &Value, &[Value]) -> JsResult<Value>;

/// Native `[[Construct]]` behavior: context, arguments, new target
pub type NativeCtor = fn(&mut Context, &[Value], ObjectId) -> JsResult<Value>;

/// Host closure that may capture Rust state
pub type HostClosure = Rc<dyn Fn(&mut Context, &Value, &[Value]) -> JsResult<Value>>;

/// `[[Call]]` behavior
#[derive(Clone)]
pub enum Callable {
    Native(NativeFn),
    Closure(HostClosure),
}

impl Callable {
    #[inline]
    pub fn invoke(&self, ctx: &mut Context, this: &Value, args: &[Value]) -> JsResult<Value> {
        match self {
            Callable::Native(f) => f(ctx, this, args),
            Callable::Closure(f) => f(ctx, this, args),
        }
    }
}

/// `[[Construct]]` behavior
#[derive(Clone, Copy)]
pub enum ConstructorKind {
    /// Allocate `this` from the new target's `prototype` and call the function
    Base,
    /// Dedicated native constructor
    Native(NativeCtor),
}

/// Function internal slots
#[derive(Clone)]
pub struct FunctionData {
    pub call: Callable,
    /// `None` for functions without `[[Construct]]`
    pub constructor: Option<ConstructorKind>,
}

impl FunctionData {
    pub fn native(f: NativeFn) -> Self {
        FunctionData {
            call: Callable::Native(f),
            constructor: None,
        }
    }

    pub fn closure(f: HostClosure) -> Self {
        FunctionData {
            call: Callable::Closure(f),
            constructor: None,
        }
    }

    pub fn with_constructor(mut self, kind: ConstructorKind) -> Self {
        self.constructor = Some(kind);
        self
    }

    #[inline]
    pub fn is_constructor(&self) -> bool {
        self.constructor.is_some()
    }
}

impl fmt::Debug for FunctionData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let call = match self.call {
            Callable::Native(_) => "native",
            Callable::Closure(_) => "closure",
        };
        f.debug_struct("FunctionData")
            .field("call", &call)
            .field("constructor", &self.constructor.is_some())
            .finish()
    }
}

impl Context {
    /// Allocate a function object with `length` and `name` properties
    fn alloc_function(&mut self, name: &str, length: u32, data: FunctionData) -> ObjectId {
        let proto = self.intrinsics().function_prototype;
        let mut object = JsObject::new(ObjectKind::Function(data), Some(proto));
        object.properties.insert(
            "length".into(),
            Property::data(Value::from(length), false, false, true),
        );
        object.properties.insert(
            "name".into(),
            Property::data(Value::from(name), false, false, true),
        );
        self.alloc(object)
    }

    /// Create a native function without `[[Construct]]`
    pub fn new_function(&mut self, name: &str, length: u32, f: NativeFn) -> ObjectId {
        self.alloc_function(name, length, FunctionData::native(f))
    }

    /// Create a native constructor linked with its prototype object
    pub fn new_constructor(
        &mut self,
        name: &str,
        length: u32,
        call: NativeFn,
        construct: NativeCtor,
        prototype: ObjectId,
    ) -> ObjectId {
        let ctor = self.new_native_constructor(name, length, call, construct);
        self.link_constructor(ctor, prototype, false);
        ctor
    }

    /// Create a native constructor without a `prototype` property
    pub fn new_native_constructor(
        &mut self,
        name: &str,
        length: u32,
        call: NativeFn,
        construct: NativeCtor,
    ) -> ObjectId {
        let data =
            FunctionData::native(call).with_constructor(ConstructorKind::Native(construct));
        self.alloc_function(name, length, data)
    }

    /// Create a constructible function backed by a host closure
    ///
    /// When invoked with `new`, `this` is a fresh object inheriting from the
    /// function's `prototype` property.
    pub fn new_closure<F>(&mut self, name: &str, length: u32, f: F) -> ObjectId
    where
        F: Fn(&mut Context, &Value, &[Value]) -> JsResult<Value> + 'static,
    {
        let data = FunctionData::closure(Rc::new(f)).with_constructor(ConstructorKind::Base);
        let func = self.alloc_function(name, length, data);
        let object_proto = self.intrinsics().object_prototype;
        let prototype = self.alloc(JsObject::ordinary(Some(object_proto)));
        self.link_constructor(func, prototype, true);
        func
    }

    /// Create a host closure without `[[Construct]]`
    pub fn new_host_function<F>(&mut self, name: &str, length: u32, f: F) -> ObjectId
    where
        F: Fn(&mut Context, &Value, &[Value]) -> JsResult<Value> + 'static,
    {
        self.alloc_function(name, length, FunctionData::closure(Rc::new(f)))
    }

    pub(crate) fn link_constructor(&mut self, ctor: ObjectId, prototype: ObjectId, writable: bool) {
        self.object_mut(ctor).properties.insert(
            "prototype".into(),
            Property::data(Value::Object(prototype), writable, false, false),
        );
        self.object_mut(prototype)
            .properties
            .insert("constructor".into(), Property::hidden(Value::Object(ctor)));
    }

    /// `IsCallable`
    pub fn is_callable(&self, value: &Value) -> bool {
        let Some(id) = value.as_object() else {
            return false;
        };
        match &self.object(id).kind {
            ObjectKind::Function(_) => true,
            ObjectKind::Proxy(p) => self.is_callable(&Value::Object(p.target)),
            _ => false,
        }
    }

    /// `IsConstructor`
    pub fn is_constructor(&self, value: &Value) -> bool {
        let Some(id) = value.as_object() else {
            return false;
        };
        match &self.object(id).kind {
            ObjectKind::Function(data) => data.is_constructor(),
            ObjectKind::Proxy(p) => self.is_constructor(&Value::Object(p.target)),
            _ => false,
        }
    }

    /// `Call(F, V, argumentsList)`
    pub fn call(&mut self, f: &Value, this: &Value, args: &[Value]) -> JsResult<Value> {
        let Some(id) = f.as_object().filter(|_| self.is_callable(f)) else {
            return Err(JsError::type_error(format!(
                "{} is not a function",
                self.describe(f)
            )));
        };
        self.with_call_depth(|ctx| match ctx.object(id).kind.clone() {
            ObjectKind::Function(data) => data.call.invoke(ctx, this, args),
            ObjectKind::Proxy(_) => ctx.proxy_call(id, this, args),
            _ => Err(JsError::type_error("not a function")),
        })
    }

    /// `Construct(F, argumentsList, newTarget)`
    pub fn construct(
        &mut self,
        f: &Value,
        args: &[Value],
        new_target: Option<&Value>,
    ) -> JsResult<Value> {
        let Some(id) = f.as_object().filter(|_| self.is_constructor(f)) else {
            return Err(JsError::type_error(format!(
                "{} is not a constructor",
                self.describe(f)
            )));
        };
        let new_target = match new_target {
            Some(nt) => nt.as_object().ok_or_else(|| {
                JsError::type_error("new target is not a constructor")
            })?,
            None => id,
        };
        self.with_call_depth(|ctx| match ctx.object(id).kind.clone() {
            ObjectKind::Function(FunctionData {
                constructor: Some(ConstructorKind::Native(ctor)),
                ..
            }) => ctor(ctx, args, new_target),
            ObjectKind::Function(FunctionData {
                call,
                constructor: Some(ConstructorKind::Base),
            }) => {
                let fallback = ctx.intrinsics().object_prototype;
                let proto = ctx.get_prototype_from_constructor(new_target, fallback)?;
                let this = Value::Object(ctx.alloc(JsObject::ordinary(Some(proto))));
                let result = call.invoke(ctx, &this, args)?;
                Ok(if result.is_object() { result } else { this })
            }
            ObjectKind::Proxy(_) => ctx.proxy_construct(id, args, new_target),
            _ => Err(JsError::type_error("not a constructor")),
        })
    }

    /// `GetPrototypeFromConstructor`
    pub fn get_prototype_from_constructor(
        &mut self,
        constructor: ObjectId,
        fallback: ObjectId,
    ) -> JsResult<ObjectId> {
        let proto = self.get(constructor, "prototype")?;
        Ok(proto.as_object().unwrap_or(fallback))
    }

    /// Function name for diagnostics
    pub(crate) fn function_name(&self, id: ObjectId) -> Option<JsString> {
        let key = PropertyKey::from("name");
        self.object(id)
            .properties
            .get(&key)
            .and_then(|p| p.value())
            .and_then(|v| v.as_string().cloned())
    }
}
