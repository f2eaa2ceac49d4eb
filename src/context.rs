//! JavaScript execution context
//!
//! The Context is the main entry point for the runtime core. It owns the
//! object arena, the intrinsic prototypes, the global object, the
//! `Symbol.for` registry and the call-depth counter, and exposes the entry
//! points an interpreter would call for property access, coercion, equality
//! and invocation.

use tracing::debug;

use crate::builtins;
use crate::error::{ErrorKind, JsError, JsResult};
use crate::heap::{Heap, HeapStats};
use crate::runtime::function::FunctionData;
use crate::runtime::object::{JsObject, ObjectKind};
use crate::runtime::property::{Property, PropertyKey};
use crate::runtime::string::JsString;
use crate::runtime::symbol::SymbolRegistry;
use crate::value::{ObjectId, Symbol, Value};

/// Default maximum nesting of calls, constructs and proxy forwarding
pub const DEFAULT_MAX_CALL_DEPTH: usize = 512;

/// Default bound on prototype chain walks
pub const DEFAULT_MAX_PROTOTYPE_CHAIN: usize = 10_000;

/// Default bound on lists materialized from array-likes
pub const DEFAULT_MAX_LIST_LENGTH: usize = 1 << 20;

/// Runtime limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextConfig {
    /// Exceeding this depth throws RangeError
    pub max_call_depth: usize,
    /// Longest prototype chain that lookups and cycle checks will walk
    pub max_prototype_chain: usize,
    /// Longest array-like that `apply`, `Reflect.apply` and `JSON` will
    /// walk element by element; longer ones throw RangeError
    pub max_list_length: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        ContextConfig {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            max_prototype_chain: DEFAULT_MAX_PROTOTYPE_CHAIN,
            max_list_length: DEFAULT_MAX_LIST_LENGTH,
        }
    }
}

/// Prototype objects created before any built-in is installed
#[derive(Debug, Clone, Copy)]
pub struct Intrinsics {
    pub object_prototype: ObjectId,
    pub function_prototype: ObjectId,
    pub array_prototype: ObjectId,
    pub string_prototype: ObjectId,
    pub number_prototype: ObjectId,
    pub boolean_prototype: ObjectId,
    pub symbol_prototype: ObjectId,
    pub error_prototype: ObjectId,
    pub type_error_prototype: ObjectId,
    pub range_error_prototype: ObjectId,
    pub reference_error_prototype: ObjectId,
    pub syntax_error_prototype: ObjectId,
}

impl Intrinsics {
    fn allocate(heap: &mut Heap) -> Self {
        let object_prototype = heap.alloc(JsObject::ordinary(None));
        let proto = Some(object_prototype);

        let function_prototype = heap.alloc(JsObject::new(
            ObjectKind::Function(FunctionData::native(builtins::function::prototype_call)),
            proto,
        ));

        let mut array = JsObject::new(ObjectKind::Array, proto);
        array.properties.insert(
            "length".into(),
            Property::data(Value::from(0), true, false, false),
        );
        let array_prototype = heap.alloc(array);

        let mut string = JsObject::new(ObjectKind::String(JsString::default()), proto);
        string.properties.insert(
            "length".into(),
            Property::data(Value::from(0), false, false, false),
        );
        let string_prototype = heap.alloc(string);

        let number_prototype = heap.alloc(JsObject::new(ObjectKind::Number(0.0), proto));
        let boolean_prototype = heap.alloc(JsObject::new(ObjectKind::Boolean(false), proto));
        let symbol_prototype = heap.alloc(JsObject::ordinary(proto));
        let error_prototype = heap.alloc(JsObject::ordinary(proto));
        let mut native_error = || heap.alloc(JsObject::ordinary(Some(error_prototype)));

        Intrinsics {
            object_prototype,
            function_prototype,
            array_prototype,
            string_prototype,
            number_prototype,
            boolean_prototype,
            symbol_prototype,
            error_prototype,
            type_error_prototype: native_error(),
            range_error_prototype: native_error(),
            reference_error_prototype: native_error(),
            syntax_error_prototype: native_error(),
        }
    }

    /// Prototype for instances of a native error kind
    pub fn error_prototype_for(&self, kind: ErrorKind) -> ObjectId {
        match kind {
            ErrorKind::Error => self.error_prototype,
            ErrorKind::TypeError => self.type_error_prototype,
            ErrorKind::RangeError => self.range_error_prototype,
            ErrorKind::ReferenceError => self.reference_error_prototype,
            ErrorKind::SyntaxError => self.syntax_error_prototype,
        }
    }
}

/// Well-known symbols shared by all built-ins of a context
#[derive(Debug, Clone)]
pub struct WellKnownSymbols {
    pub to_primitive: Symbol,
    pub is_concat_spreadable: Symbol,
}

impl WellKnownSymbols {
    fn new() -> Self {
        WellKnownSymbols {
            to_primitive: Symbol::new(Some(JsString::from("Symbol.toPrimitive"))),
            is_concat_spreadable: Symbol::new(Some(JsString::from("Symbol.isConcatSpreadable"))),
        }
    }
}

/// JavaScript execution context
pub struct Context {
    /// Object arena
    heap: Heap,

    intrinsics: Intrinsics,

    well_known: WellKnownSymbols,

    /// `Symbol.for` registry
    registry: SymbolRegistry,

    global: ObjectId,

    config: ContextConfig,

    /// Current nesting of `[[Call]]`, `[[Construct]]` and proxy forwarding
    call_depth: usize,
}

impl Context {
    /// Create a context with default limits
    pub fn new() -> Self {
        Self::with_config(ContextConfig::default())
    }

    /// Create a context with custom limits
    pub fn with_config(config: ContextConfig) -> Self {
        let mut heap = Heap::new();
        let intrinsics = Intrinsics::allocate(&mut heap);
        let global = heap.alloc(JsObject::ordinary(Some(intrinsics.object_prototype)));

        let mut ctx = Context {
            heap,
            intrinsics,
            well_known: WellKnownSymbols::new(),
            registry: SymbolRegistry::new(),
            global,
            config,
            call_depth: 0,
        };
        builtins::install(&mut ctx);
        ctx
    }

    #[inline]
    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    #[inline]
    pub fn intrinsics(&self) -> &Intrinsics {
        &self.intrinsics
    }

    #[inline]
    pub fn well_known_symbols(&self) -> &WellKnownSymbols {
        &self.well_known
    }

    #[inline]
    pub fn symbol_registry(&self) -> &SymbolRegistry {
        &self.registry
    }

    #[inline]
    pub(crate) fn symbol_registry_mut(&mut self) -> &mut SymbolRegistry {
        &mut self.registry
    }

    #[inline]
    pub fn global_object(&self) -> ObjectId {
        self.global
    }

    /// Read a property of the global object
    pub fn global(&mut self, name: &str) -> JsResult<Value> {
        self.get(self.global, name)
    }

    /// Move an object into the heap
    #[inline]
    pub fn alloc(&mut self, object: JsObject) -> ObjectId {
        self.heap.alloc(object)
    }

    #[inline]
    pub fn object(&self, id: ObjectId) -> &JsObject {
        self.heap.get(id)
    }

    #[inline]
    pub fn object_mut(&mut self, id: ObjectId) -> &mut JsObject {
        self.heap.get_mut(id)
    }

    /// Create an empty plain object inheriting from `Object.prototype`
    pub fn new_object(&mut self) -> ObjectId {
        let proto = self.intrinsics.object_prototype;
        self.alloc(JsObject::ordinary(Some(proto)))
    }

    pub fn heap_stats(&self) -> HeapStats {
        self.heap.stats()
    }

    #[inline]
    pub fn call_depth(&self) -> usize {
        self.call_depth
    }

    /// Run `f` one call level deeper, failing once the limit is reached
    pub(crate) fn with_call_depth<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> JsResult<T>,
    ) -> JsResult<T> {
        if self.call_depth >= self.config.max_call_depth {
            debug!(depth = self.call_depth, "call depth limit reached");
            return Err(JsError::range_error("maximum call stack size exceeded"));
        }
        self.call_depth += 1;
        let result = f(self);
        self.call_depth -= 1;
        result
    }

    /// Create an error instance of the given kind
    pub fn new_error(&mut self, kind: ErrorKind, message: &str) -> ObjectId {
        let proto = self.intrinsics.error_prototype_for(kind);
        let mut object = JsObject::new(ObjectKind::Error, Some(proto));
        object
            .properties
            .insert("message".into(), Property::hidden(Value::from(message)));
        self.alloc(object)
    }

    /// Materialize an abrupt completion as the thrown language value
    pub fn error_to_value(&mut self, err: JsError) -> Value {
        match err {
            JsError::Native { kind, message } => Value::Object(self.new_error(kind, &message)),
            JsError::Thrown(value) => value,
        }
    }

    /// `name` of a thrown error, e.g. `"TypeError"`
    pub fn error_name(&mut self, err: &JsError) -> Option<String> {
        match err {
            JsError::Native { kind, .. } => Some(kind.name().to_string()),
            JsError::Thrown(value) => {
                let id = value.as_object()?;
                let name = self.get(id, "name").ok()?;
                name.as_string().map(JsString::to_std_string_lossy)
            }
        }
    }

    /// `typeof` operator
    pub fn type_of(&self, value: &Value) -> &'static str {
        match value {
            Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Object(_) if self.is_callable(value) => "function",
            Value::Object(_) => "object",
        }
    }

    /// Short description of a value for error messages, never calls user code
    pub(crate) fn describe(&self, value: &Value) -> String {
        match value {
            Value::String(s) => format!("'{}'", s),
            Value::Symbol(s) => s.descriptive_string().to_string(),
            Value::Number(n) => crate::util::dtoa::number_to_string(*n),
            Value::Bool(b) => b.to_string(),
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Object(id) => match self.function_name(*id) {
                Some(name) if !name.is_empty() => format!("function {}", name),
                _ => format!("[object {}]", self.object(*id).kind.class_name()),
            },
        }
    }

    /// `PutValue` for a property reference: `base[key] = value`
    ///
    /// Primitive bases are wrapped for the lookup but remain the receiver.
    /// A failed assignment throws only when `strict` is set.
    pub fn put(
        &mut self,
        base: &Value,
        key: impl Into<PropertyKey>,
        value: Value,
        strict: bool,
    ) -> JsResult<()> {
        let key = key.into();
        let object = self.to_object(base)?;
        let ok = self.set_with_receiver(object, &key, value, base)?;
        if !ok && strict {
            return Err(JsError::type_error(format!(
                "cannot assign to read only property {}",
                key
            )));
        }
        Ok(())
    }

    /// `delete base[key]`
    pub fn delete(&mut self, base: &Value, key: impl Into<PropertyKey>, strict: bool) -> JsResult<bool> {
        let key = key.into();
        let object = self.to_object(base)?;
        let ok = self.delete_property(object, &key)?;
        if !ok && strict {
            return Err(JsError::type_error(format!(
                "cannot delete property {}",
                key
            )));
        }
        Ok(ok)
    }

    /// `key in target`
    pub fn has(&mut self, target: &Value, key: &Value) -> JsResult<bool> {
        let Some(id) = target.as_object() else {
            return Err(JsError::type_error(format!(
                "cannot use 'in' operator on {}",
                self.describe(target)
            )));
        };
        let key = self.to_property_key(key)?;
        self.has_property(id, &key)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
