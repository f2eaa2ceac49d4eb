//! Type conversion
//!
//! The coercion operations of the language. Every conversion that can reach
//! an object may run user code (`@@toPrimitive`, `valueOf`, `toString`,
//! getters, proxy traps); those calls happen at exactly the step the
//! algorithm names and their errors propagate unchanged.

use crate::context::Context;
use crate::error::{JsError, JsResult};
use crate::runtime::object::{JsObject, ObjectKind};
use crate::runtime::property::{PropertyDescriptor, PropertyKey};
use crate::runtime::string::JsString;
use crate::util::atof::string_to_number;
use crate::util::dtoa::number_to_string;
use crate::value::{ObjectId, Value};

/// Hint passed to `ToPrimitive`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferredType {
    Default,
    Number,
    String,
}

impl PreferredType {
    /// Hint string handed to `@@toPrimitive`
    pub const fn hint(self) -> &'static str {
        match self {
            PreferredType::Default => "default",
            PreferredType::Number => "number",
            PreferredType::String => "string",
        }
    }
}

/// `ToBoolean`
pub fn to_boolean(value: &Value) -> bool {
    match value {
        Value::Undefined | Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => !(*n == 0.0 || n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Symbol(_) | Value::Object(_) => true,
    }
}

/// Integer part of a number, with NaN mapped to +0
#[inline]
pub fn integer_part(n: f64) -> f64 {
    if n.is_nan() {
        return 0.0;
    }
    // Adding +0 folds -0 into +0
    n.trunc() + 0.0
}

/// Integer part of `n` reduced modulo 2^32
fn modulo_2_32(n: f64) -> f64 {
    if !n.is_finite() {
        return 0.0;
    }
    n.trunc().rem_euclid(4_294_967_296.0)
}

/// `ToUint32` on a number
pub fn f64_to_uint32(n: f64) -> u32 {
    modulo_2_32(n) as u32
}

/// `ToInt32` on a number
pub fn f64_to_int32(n: f64) -> i32 {
    modulo_2_32(n) as u32 as i32
}

/// `ToUint16` on a number
pub fn f64_to_uint16(n: f64) -> u16 {
    modulo_2_32(n) as u32 as u16
}

/// Largest length `ToLength` produces (2^53 - 1)
pub const MAX_SAFE_LENGTH: u64 = 9_007_199_254_740_991;

impl Context {
    /// `ToPrimitive(input, preferredType)`
    pub fn to_primitive(&mut self, input: &Value, preferred: PreferredType) -> JsResult<Value> {
        let Value::Object(id) = input else {
            return Ok(input.clone());
        };
        let to_primitive = self.well_known_symbols().to_primitive.clone();
        if let Some(exotic) = self.get_method(input, to_primitive)? {
            let result = self.call(&exotic, input, &[Value::from(preferred.hint())])?;
            if result.is_object() {
                return Err(JsError::type_error(
                    "Symbol.toPrimitive returned an object",
                ));
            }
            return Ok(result);
        }
        let preferred = if preferred == PreferredType::String {
            PreferredType::String
        } else {
            PreferredType::Number
        };
        self.ordinary_to_primitive(*id, preferred)
    }

    /// `OrdinaryToPrimitive(O, hint)`
    pub fn ordinary_to_primitive(&mut self, id: ObjectId, hint: PreferredType) -> JsResult<Value> {
        let names = if hint == PreferredType::String {
            ["toString", "valueOf"]
        } else {
            ["valueOf", "toString"]
        };
        let this = Value::Object(id);
        for name in names {
            let method = self.get(id, name)?;
            if self.is_callable(&method) {
                let result = self.call(&method, &this, &[])?;
                if !result.is_object() {
                    return Ok(result);
                }
            }
        }
        Err(JsError::type_error("cannot convert object to primitive value"))
    }

    /// `ToBoolean`
    #[inline]
    pub fn to_boolean(&self, value: &Value) -> bool {
        to_boolean(value)
    }

    /// `ToNumber`
    pub fn to_number(&mut self, value: &Value) -> JsResult<f64> {
        match value {
            Value::Undefined => Ok(f64::NAN),
            Value::Null => Ok(0.0),
            Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Value::Number(n) => Ok(*n),
            Value::String(s) => Ok(string_to_number(s.units())),
            Value::Symbol(_) => Err(JsError::type_error("cannot convert a Symbol value to a number")),
            Value::Object(_) => {
                let prim = self.to_primitive(value, PreferredType::Number)?;
                self.to_number(&prim)
            }
        }
    }

    /// `ToInteger`: truncated number, NaN as +0, infinities kept
    pub fn to_integer(&mut self, value: &Value) -> JsResult<f64> {
        Ok(integer_part(self.to_number(value)?))
    }

    /// `ToInt32`
    pub fn to_int32(&mut self, value: &Value) -> JsResult<i32> {
        Ok(f64_to_int32(self.to_number(value)?))
    }

    /// `ToUint32`
    pub fn to_uint32(&mut self, value: &Value) -> JsResult<u32> {
        Ok(f64_to_uint32(self.to_number(value)?))
    }

    /// `ToUint16`
    pub fn to_uint16(&mut self, value: &Value) -> JsResult<u16> {
        Ok(f64_to_uint16(self.to_number(value)?))
    }

    /// `ToLength`: integer clamped to `0..=2^53-1`
    pub fn to_length(&mut self, value: &Value) -> JsResult<u64> {
        let len = self.to_integer(value)?;
        if len <= 0.0 {
            return Ok(0);
        }
        Ok(len.min(MAX_SAFE_LENGTH as f64) as u64)
    }

    /// `ToString`
    pub fn to_string(&mut self, value: &Value) -> JsResult<JsString> {
        match value {
            Value::Undefined => Ok(JsString::from("undefined")),
            Value::Null => Ok(JsString::from("null")),
            Value::Bool(b) => Ok(JsString::from(if *b { "true" } else { "false" })),
            Value::Number(n) => Ok(JsString::from(number_to_string(*n))),
            Value::String(s) => Ok(s.clone()),
            Value::Symbol(_) => Err(JsError::type_error("cannot convert a Symbol value to a string")),
            Value::Object(_) => {
                let prim = self.to_primitive(value, PreferredType::String)?;
                self.to_string(&prim)
            }
        }
    }

    /// `ToObject`: wrap primitives, reject null and undefined
    pub fn to_object(&mut self, value: &Value) -> JsResult<ObjectId> {
        let intrinsics = *self.intrinsics();
        let (kind, proto) = match value {
            Value::Object(id) => return Ok(*id),
            Value::Undefined | Value::Null => {
                return Err(JsError::type_error(format!(
                    "cannot convert {} to object",
                    self.describe(value)
                )));
            }
            Value::String(s) => return Ok(self.string_create(s.clone(), intrinsics.string_prototype)),
            Value::Bool(b) => (ObjectKind::Boolean(*b), intrinsics.boolean_prototype),
            Value::Number(n) => (ObjectKind::Number(*n), intrinsics.number_prototype),
            Value::Symbol(s) => (ObjectKind::Symbol(s.clone()), intrinsics.symbol_prototype),
        };
        Ok(self.alloc(JsObject::new(kind, Some(proto))))
    }

    /// `RequireObjectCoercible`
    pub fn require_object_coercible(&self, value: &Value) -> JsResult<()> {
        if value.is_nullish() {
            return Err(JsError::type_error(format!(
                "{} is not object coercible",
                self.describe(value)
            )));
        }
        Ok(())
    }

    /// `ToPropertyKey`
    pub fn to_property_key(&mut self, value: &Value) -> JsResult<PropertyKey> {
        match self.to_primitive(value, PreferredType::String)? {
            Value::Symbol(sym) => Ok(PropertyKey::Symbol(sym)),
            prim => Ok(PropertyKey::String(self.to_string(&prim)?)),
        }
    }

    /// `ToPropertyDescriptor`
    ///
    /// Fields are read in the order enumerable, configurable, value,
    /// writable, get, set; each is checked with `[[HasProperty]]` first.
    pub fn to_property_descriptor(&mut self, value: &Value) -> JsResult<PropertyDescriptor> {
        let Some(obj) = value.as_object() else {
            return Err(JsError::type_error(format!(
                "property description must be an object: {}",
                self.describe(value)
            )));
        };
        let mut desc = PropertyDescriptor::default();
        if let Some(v) = self.get_if_present(obj, "enumerable")? {
            desc.enumerable = Some(to_boolean(&v));
        }
        if let Some(v) = self.get_if_present(obj, "configurable")? {
            desc.configurable = Some(to_boolean(&v));
        }
        desc.value = self.get_if_present(obj, "value")?;
        if let Some(v) = self.get_if_present(obj, "writable")? {
            desc.writable = Some(to_boolean(&v));
        }
        for (name, slot) in [("get", &mut desc.get), ("set", &mut desc.set)] {
            if let Some(f) = self.get_if_present(obj, name)? {
                if !f.is_undefined() && !self.is_callable(&f) {
                    return Err(JsError::type_error(format!(
                        "{} must be a function: {}",
                        if name == "get" { "getter" } else { "setter" },
                        self.describe(&f)
                    )));
                }
                *slot = Some(f);
            }
        }
        if desc.is_accessor_descriptor() && desc.is_data_descriptor() {
            return Err(JsError::type_error(
                "invalid property descriptor: cannot both specify accessors and a value or writable attribute",
            ));
        }
        Ok(desc)
    }

    fn get_if_present(&mut self, obj: ObjectId, name: &str) -> JsResult<Option<Value>> {
        let key = PropertyKey::from(name);
        if self.has_property(obj, &key)? {
            return Ok(Some(self.get(obj, key)?));
        }
        Ok(None)
    }

    /// `FromPropertyDescriptor`
    pub fn from_property_descriptor(&mut self, desc: Option<&PropertyDescriptor>) -> JsResult<Value> {
        let Some(desc) = desc else {
            return Ok(Value::undefined());
        };
        let obj = self.new_object();
        let fields = [
            ("value", desc.value.clone()),
            ("writable", desc.writable.map(Value::Bool)),
            ("get", desc.get.clone()),
            ("set", desc.set.clone()),
            ("enumerable", desc.enumerable.map(Value::Bool)),
            ("configurable", desc.configurable.map(Value::Bool)),
        ];
        for (name, field) in fields {
            if let Some(v) = field {
                self.create_data_property_or_throw(obj, name, v)?;
            }
        }
        Ok(Value::Object(obj))
    }
}
