//! JavaScript value representation
//!
//! `Value` is a tagged union over the seven ECMAScript language types.
//! Objects are not stored inline: an object value is an [`ObjectId`] handle
//! into the context's heap arena, so copying a value never copies an object
//! and identity comparison is handle comparison.
//!
//! Strings are sequences of 16-bit code units ([`JsString`]) and may contain
//! lone surrogates. Symbols carry per-allocation identity.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::runtime::equality::same_value;
use crate::runtime::string::JsString;

/// Handle to an object stored in the heap arena
///
/// Handles are never reused, so two handles compare equal exactly when they
/// refer to the same object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u32);

impl ObjectId {
    /// Create a handle from an arena slot index
    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        ObjectId(index as u32)
    }

    /// Get the arena slot index
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
struct SymbolData {
    description: Option<JsString>,
}

/// A symbol value
///
/// Every call to [`Symbol::new`] produces a distinct identity, even for equal
/// descriptions. Interning for `Symbol.for` is handled by the context's
/// registry, not here.
#[derive(Clone)]
pub struct Symbol(Rc<SymbolData>);

impl Symbol {
    /// Create a new unique symbol
    pub fn new(description: Option<JsString>) -> Self {
        Symbol(Rc::new(SymbolData { description }))
    }

    /// Get the symbol description, if any
    #[inline]
    pub fn description(&self) -> Option<&JsString> {
        self.0.description.as_ref()
    }

    /// `SymbolDescriptiveString`: `"Symbol(" + description + ")"`
    pub fn descriptive_string(&self) -> JsString {
        let mut units: Vec<u16> = "Symbol(".encode_utf16().collect();
        if let Some(desc) = self.description() {
            units.extend_from_slice(desc.units());
        }
        units.push(u16::from(b')'));
        JsString::from_units(units)
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.0) as usize).hash(state);
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.descriptive_string())
    }
}

/// ECMAScript language type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Undefined,
    Null,
    Boolean,
    Number,
    String,
    Symbol,
    Object,
}

/// High-level JavaScript value type
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(JsString),
    Symbol(Symbol),
    Object(ObjectId),
}

impl Value {
    /// Create an undefined value
    #[inline]
    pub const fn undefined() -> Self {
        Value::Undefined
    }

    /// Create a null value
    #[inline]
    pub const fn null() -> Self {
        Value::Null
    }

    /// Create a number value
    #[inline]
    pub const fn number(n: f64) -> Self {
        Value::Number(n)
    }

    /// Get the language type of this value
    pub const fn type_of(&self) -> Type {
        match self {
            Value::Undefined => Type::Undefined,
            Value::Null => Type::Null,
            Value::Bool(_) => Type::Boolean,
            Value::Number(_) => Type::Number,
            Value::String(_) => Type::String,
            Value::Symbol(_) => Type::Symbol,
            Value::Object(_) => Type::Object,
        }
    }

    #[inline]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this is nullish (null or undefined)
    #[inline]
    pub const fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    #[inline]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    #[inline]
    pub const fn is_primitive(&self) -> bool {
        !self.is_object()
    }

    #[inline]
    pub const fn as_object(&self) -> Option<ObjectId> {
        match self {
            Value::Object(id) => Some(*id),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_string(&self) -> Option<&JsString> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Value::Symbol(s) => Some(s),
            _ => None,
        }
    }
}

/// Values compare with `SameValue` semantics: `NaN` equals itself and the
/// two zeros are distinct.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        same_value(self, other)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "Undefined"),
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Number(n) => write!(f, "Number({})", n),
            Value::String(s) => write!(f, "String({:?})", s),
            Value::Symbol(s) => write!(f, "{:?}", s),
            Value::Object(id) => write!(f, "Object({})", id),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(JsString::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(JsString::from(s.as_str()))
    }
}

impl From<JsString> for Value {
    fn from(s: JsString) -> Self {
        Value::String(s)
    }
}

impl From<Symbol> for Value {
    fn from(s: Symbol) -> Self {
        Value::Symbol(s)
    }
}

impl From<ObjectId> for Value {
    fn from(id: ObjectId) -> Self {
        Value::Object(id)
    }
}

impl From<Option<ObjectId>> for Value {
    fn from(id: Option<ObjectId>) -> Self {
        id.map_or(Value::Null, Value::Object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nullish() {
        assert!(Value::undefined().is_nullish());
        assert!(Value::null().is_nullish());
        assert!(!Value::from(false).is_nullish());
        assert!(!Value::from(0).is_nullish());
    }

    #[test]
    fn test_type_of() {
        assert_eq!(Value::undefined().type_of(), Type::Undefined);
        assert_eq!(Value::from("x").type_of(), Type::String);
        assert_eq!(Value::from(1.5).type_of(), Type::Number);
        assert_eq!(Value::from(Symbol::new(None)).type_of(), Type::Symbol);
    }

    #[test]
    fn test_symbol_identity() {
        let a = Symbol::new(Some(JsString::from("x")));
        let b = Symbol::new(Some(JsString::from("x")));
        assert_ne!(a, b);
        assert_eq!(a.clone(), a);
        assert_eq!(a.descriptive_string().to_string(), "Symbol(x)");
        assert_eq!(Symbol::new(None).descriptive_string().to_string(), "Symbol()");
    }

    #[test]
    fn test_value_eq_is_same_value() {
        assert_eq!(Value::from(f64::NAN), Value::from(f64::NAN));
        assert_ne!(Value::from(0.0), Value::from(-0.0));
        assert_eq!(Value::from("ab"), Value::from("ab"));
        assert_ne!(Value::from(1), Value::from("1"));
    }

    #[test]
    fn test_debug() {
        assert_eq!(format!("{:?}", Value::Null), "Null");
        assert_eq!(format!("{:?}", Value::from(true)), "Bool(true)");
        assert_eq!(format!("{:?}", Value::from(42)), "Number(42)");
    }
}
