//! JavaScript object representation
//!
//! An object is a kind tag, a prototype link, an extensible flag and a
//! property table. The kind selects which internal methods are exotic:
//! arrays override `[[DefineOwnProperty]]`, string wrappers expose virtual
//! index properties and proxies forward everything to their handler.

use crate::runtime::function::FunctionData;
use crate::runtime::property::PropertyTable;
use crate::runtime::string::JsString;
use crate::value::{ObjectId, Symbol};

/// Proxy internal slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProxyData {
    pub target: ObjectId,
    pub handler: ObjectId,
    /// Set by the revoke function of `Proxy.revocable`
    pub revoked: bool,
}

/// Object kind and kind-specific internal slots
#[derive(Clone)]
pub enum ObjectKind {
    /// Plain object
    Ordinary,
    /// Array exotic object
    Array,
    /// Error instance
    Error,
    /// Boxed Boolean
    Boolean(bool),
    /// Boxed Number
    Number(f64),
    /// String exotic object
    String(JsString),
    /// Boxed Symbol
    Symbol(Symbol),
    /// Callable object
    Function(FunctionData),
    /// Proxy exotic object
    Proxy(ProxyData),
}

impl ObjectKind {
    /// Builtin tag used by `Object.prototype.toString`
    pub fn class_name(&self) -> &'static str {
        match self {
            ObjectKind::Ordinary | ObjectKind::Symbol(_) | ObjectKind::Proxy(_) => "Object",
            ObjectKind::Array => "Array",
            ObjectKind::Error => "Error",
            ObjectKind::Boolean(_) => "Boolean",
            ObjectKind::Number(_) => "Number",
            ObjectKind::String(_) => "String",
            ObjectKind::Function(_) => "Function",
        }
    }
}

/// A JavaScript object stored in the heap
#[derive(Clone)]
pub struct JsObject {
    pub kind: ObjectKind,
    pub proto: Option<ObjectId>,
    pub extensible: bool,
    pub properties: PropertyTable,
}

impl JsObject {
    /// Create an extensible object with no properties
    pub fn new(kind: ObjectKind, proto: Option<ObjectId>) -> Self {
        JsObject {
            kind,
            proto,
            extensible: true,
            properties: PropertyTable::new(),
        }
    }

    /// Create a plain object
    pub fn ordinary(proto: Option<ObjectId>) -> Self {
        Self::new(ObjectKind::Ordinary, proto)
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self.kind, ObjectKind::Array)
    }

    #[inline]
    pub fn is_proxy(&self) -> bool {
        matches!(self.kind, ObjectKind::Proxy(_))
    }

    #[inline]
    pub fn is_function(&self) -> bool {
        matches!(self.kind, ObjectKind::Function(_))
    }

    /// Proxy slots, if this is a proxy
    #[inline]
    pub fn proxy_data(&self) -> Option<ProxyData> {
        match &self.kind {
            ObjectKind::Proxy(data) => Some(*data),
            _ => None,
        }
    }

    /// Function slots, if this is a function
    pub fn function_data(&self) -> Option<&FunctionData> {
        match &self.kind {
            ObjectKind::Function(data) => Some(data),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_name() {
        assert_eq!(ObjectKind::Ordinary.class_name(), "Object");
        assert_eq!(ObjectKind::Array.class_name(), "Array");
        assert_eq!(ObjectKind::Number(1.0).class_name(), "Number");
        assert_eq!(ObjectKind::String(JsString::default()).class_name(), "String");
    }

    #[test]
    fn test_object_creation() {
        let obj = JsObject::ordinary(None);
        assert!(obj.extensible);
        assert!(obj.proto.is_none());
        assert!(obj.properties.is_empty());
        assert!(!obj.is_array());
        assert!(obj.proxy_data().is_none());

        let arr = JsObject::new(ObjectKind::Array, None);
        assert!(arr.is_array());
    }
}
