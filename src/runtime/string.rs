//! JavaScript string representation
//!
//! Strings are immutable sequences of UTF-16 code units shared by reference
//! count. They are not required to be well-formed: lone surrogates are
//! preserved as-is.
//!
//! This module also implements the String exotic object, whose index
//! properties are virtual views onto the wrapped string.

use std::fmt;
use std::rc::Rc;

use crate::context::Context;
use crate::error::JsResult;
use crate::runtime::object::{JsObject, ObjectKind};
use crate::runtime::ordinary::is_compatible_property_descriptor;
use crate::runtime::property::{Property, PropertyDescriptor, PropertyKey};
use crate::value::{ObjectId, Value};

/// Largest valid array index (2^32 - 2)
pub const MAX_ARRAY_INDEX: u32 = u32::MAX - 1;

/// JavaScript string
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JsString(Rc<[u16]>);

impl JsString {
    /// Create a string from code units
    pub fn from_units(units: Vec<u16>) -> Self {
        JsString(Rc::from(units))
    }

    /// Get the code units
    #[inline]
    pub fn units(&self) -> &[u16] {
        &self.0
    }

    /// Length in code units
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn code_unit_at(&self, index: usize) -> Option<u16> {
        self.0.get(index).copied()
    }

    /// Concatenate two strings
    pub fn concat(&self, other: &JsString) -> JsString {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        let mut units = Vec::with_capacity(self.len() + other.len());
        units.extend_from_slice(self.units());
        units.extend_from_slice(other.units());
        JsString::from_units(units)
    }

    /// Substring over the code unit range `start..end`
    pub fn slice(&self, start: usize, end: usize) -> JsString {
        let end = end.min(self.len());
        let start = start.min(end);
        JsString::from_units(self.0[start..end].to_vec())
    }

    /// First occurrence of `needle` at or after `from`
    pub fn find(&self, needle: &JsString, from: usize) -> Option<usize> {
        let hay = self.units();
        let pat = needle.units();
        if from > hay.len() {
            return None;
        }
        if pat.is_empty() {
            return Some(from);
        }
        if pat.len() > hay.len() {
            return None;
        }
        (from..=hay.len() - pat.len()).find(|&i| &hay[i..i + pat.len()] == pat)
    }

    /// Last occurrence of `needle` starting at or before `from`
    pub fn rfind(&self, needle: &JsString, from: usize) -> Option<usize> {
        let hay = self.units();
        let pat = needle.units();
        if pat.len() > hay.len() {
            return None;
        }
        let last = from.min(hay.len() - pat.len());
        (0..=last).rev().find(|&i| &hay[i..i + pat.len()] == pat)
    }

    /// Check for equality against a Rust string
    pub fn eq_str(&self, s: &str) -> bool {
        self.units().iter().copied().eq(s.encode_utf16())
    }

    /// Convert to a Rust string, replacing lone surrogates
    pub fn to_std_string_lossy(&self) -> String {
        String::from_utf16_lossy(self.units())
    }

    /// Array index value if this is the canonical form of one
    pub fn as_array_index(&self) -> Option<u32> {
        is_array_index(self.units())
    }
}

impl Default for JsString {
    fn default() -> Self {
        JsString::from_units(Vec::new())
    }
}

impl From<&str> for JsString {
    fn from(s: &str) -> Self {
        JsString::from_units(s.encode_utf16().collect())
    }
}

impl From<String> for JsString {
    fn from(s: String) -> Self {
        JsString::from(s.as_str())
    }
}

impl fmt::Display for JsString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_std_string_lossy())
    }
}

impl fmt::Debug for JsString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_std_string_lossy())
    }
}

/// Check if code units spell a canonical array index (0..=2^32-2)
pub fn is_array_index(units: &[u16]) -> Option<u32> {
    if units.is_empty() || units.len() > 10 {
        return None;
    }

    // Leading zeros are not valid (except "0")
    if units.len() > 1 && units[0] == u16::from(b'0') {
        return None;
    }

    let mut n: u64 = 0;
    for &u in units {
        if !(u16::from(b'0')..=u16::from(b'9')).contains(&u) {
            return None;
        }
        n = n * 10 + u64::from(u - u16::from(b'0'));
    }
    u32::try_from(n).ok().filter(|&n| n <= MAX_ARRAY_INDEX)
}

impl Context {
    /// `StringCreate`: allocate a String exotic object
    pub fn string_create(&mut self, value: JsString, proto: ObjectId) -> ObjectId {
        let len = value.len() as f64;
        let mut object = JsObject::new(ObjectKind::String(value), Some(proto));
        object.properties.insert(
            "length".into(),
            Property::data(Value::from(len), false, false, false),
        );
        self.alloc(object)
    }

    /// Wrapped string of a String exotic object
    fn string_data(&self, id: ObjectId) -> Option<JsString> {
        match &self.object(id).kind {
            ObjectKind::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// Virtual property for an in-range index of the wrapped string
    fn string_index_property(&self, id: ObjectId, key: &PropertyKey) -> Option<Property> {
        let index = key.array_index()? as usize;
        let s = self.string_data(id)?;
        let unit = s.code_unit_at(index)?;
        Some(Property::data(
            Value::String(JsString::from_units(vec![unit])),
            false,
            true,
            false,
        ))
    }

    pub(crate) fn string_get_own_property(
        &self,
        id: ObjectId,
        key: &PropertyKey,
    ) -> Option<Property> {
        if let Some(prop) = self.object(id).properties.get(key) {
            return Some(prop.clone());
        }
        self.string_index_property(id, key)
    }

    pub(crate) fn string_define_own_property(
        &mut self,
        id: ObjectId,
        key: &PropertyKey,
        desc: &PropertyDescriptor,
    ) -> JsResult<bool> {
        if let Some(current) = self.string_index_property(id, key) {
            let extensible = self.object(id).extensible;
            return Ok(is_compatible_property_descriptor(
                extensible,
                desc,
                Some(&current),
            ));
        }
        Ok(self.ordinary_define_own_property(id, key, desc))
    }

    /// Index keys of the wrapped string, then the stored keys in order
    pub(crate) fn string_own_property_keys(&self, id: ObjectId) -> Vec<PropertyKey> {
        let len = self.string_data(id).map_or(0, |s| s.len());
        let mut keys: Vec<PropertyKey> = (0..len as u64).map(PropertyKey::from_index).collect();
        keys.extend(self.object(id).properties.ordered_keys());
        keys
    }
}
