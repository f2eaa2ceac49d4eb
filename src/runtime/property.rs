//! Property keys, property records and the per-object property table
//!
//! A [`Property`] is the complete attribute record stored on an object.
//! A [`PropertyDescriptor`] is the partial form passed to
//! `[[DefineOwnProperty]]`, where every field may be absent.
//!
//! The table preserves insertion order; [`PropertyTable::ordered_keys`]
//! produces the ordinary own-key order (array indices ascending, then other
//! strings in insertion order, then symbols in insertion order).

use std::fmt;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::runtime::string::JsString;
use crate::util::dtoa::number_to_string;
use crate::value::{Symbol, Value};

/// Property key: a string or a symbol
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    String(JsString),
    Symbol(Symbol),
}

impl PropertyKey {
    /// Key for an integer index
    pub fn from_index(index: u64) -> Self {
        PropertyKey::String(JsString::from(number_to_string(index as f64)))
    }

    /// Array index value if this is a canonical array index string
    #[inline]
    pub fn array_index(&self) -> Option<u32> {
        match self {
            PropertyKey::String(s) => s.as_array_index(),
            PropertyKey::Symbol(_) => None,
        }
    }

    #[inline]
    pub fn is_symbol(&self) -> bool {
        matches!(self, PropertyKey::Symbol(_))
    }

    #[inline]
    pub fn as_string(&self) -> Option<&JsString> {
        match self {
            PropertyKey::String(s) => Some(s),
            PropertyKey::Symbol(_) => None,
        }
    }

    /// Check for a specific string key
    pub fn is_str(&self, name: &str) -> bool {
        self.as_string().is_some_and(|s| s.eq_str(name))
    }

    /// Key as a language value
    pub fn to_value(&self) -> Value {
        match self {
            PropertyKey::String(s) => Value::String(s.clone()),
            PropertyKey::Symbol(s) => Value::Symbol(s.clone()),
        }
    }
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        PropertyKey::String(JsString::from(s))
    }
}

impl From<JsString> for PropertyKey {
    fn from(s: JsString) -> Self {
        PropertyKey::String(s)
    }
}

impl From<Symbol> for PropertyKey {
    fn from(s: Symbol) -> Self {
        PropertyKey::Symbol(s)
    }
}

impl From<u32> for PropertyKey {
    fn from(index: u32) -> Self {
        PropertyKey::from_index(u64::from(index))
    }
}

impl From<u64> for PropertyKey {
    fn from(index: u64) -> Self {
        PropertyKey::from_index(index)
    }
}

impl From<&PropertyKey> for PropertyKey {
    fn from(key: &PropertyKey) -> Self {
        key.clone()
    }
}

impl fmt::Debug for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKey::String(s) => write!(f, "{:?}", s),
            PropertyKey::Symbol(s) => write!(f, "{:?}", s),
        }
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKey::String(s) => write!(f, "{}", s),
            PropertyKey::Symbol(s) => write!(f, "{}", s.descriptive_string()),
        }
    }
}

/// Storage slot of a property
#[derive(Debug, Clone)]
pub enum Slot {
    Data { value: Value, writable: bool },
    /// `get` and `set` are each a callable object or undefined
    Accessor { get: Value, set: Value },
}

/// Complete property record
#[derive(Debug, Clone)]
pub struct Property {
    pub slot: Slot,
    pub enumerable: bool,
    pub configurable: bool,
}

impl Property {
    pub fn data(value: Value, writable: bool, enumerable: bool, configurable: bool) -> Self {
        Property {
            slot: Slot::Data { value, writable },
            enumerable,
            configurable,
        }
    }

    pub fn accessor(get: Value, set: Value, enumerable: bool, configurable: bool) -> Self {
        Property {
            slot: Slot::Accessor { get, set },
            enumerable,
            configurable,
        }
    }

    /// Writable, enumerable and configurable data property
    pub fn plain(value: Value) -> Self {
        Self::data(value, true, true, true)
    }

    /// Writable, non-enumerable, configurable data property (built-in methods)
    pub fn hidden(value: Value) -> Self {
        Self::data(value, true, false, true)
    }

    #[inline]
    pub fn is_data(&self) -> bool {
        matches!(self.slot, Slot::Data { .. })
    }

    #[inline]
    pub fn is_accessor(&self) -> bool {
        matches!(self.slot, Slot::Accessor { .. })
    }

    /// Stored value of a data property
    pub fn value(&self) -> Option<&Value> {
        match &self.slot {
            Slot::Data { value, .. } => Some(value),
            Slot::Accessor { .. } => None,
        }
    }

    /// Writable flag of a data property
    pub fn writable(&self) -> Option<bool> {
        match &self.slot {
            Slot::Data { writable, .. } => Some(*writable),
            Slot::Accessor { .. } => None,
        }
    }

    /// Fully populated descriptor for this property
    pub fn to_descriptor(&self) -> PropertyDescriptor {
        let mut desc = PropertyDescriptor {
            enumerable: Some(self.enumerable),
            configurable: Some(self.configurable),
            ..PropertyDescriptor::default()
        };
        match &self.slot {
            Slot::Data { value, writable } => {
                desc.value = Some(value.clone());
                desc.writable = Some(*writable);
            }
            Slot::Accessor { get, set } => {
                desc.get = Some(get.clone());
                desc.set = Some(set.clone());
            }
        }
        desc
    }

    /// Complete a descriptor with default attribute values
    pub fn from_descriptor(desc: &PropertyDescriptor) -> Self {
        let slot = if desc.is_accessor_descriptor() {
            Slot::Accessor {
                get: desc.get.clone().unwrap_or_default(),
                set: desc.set.clone().unwrap_or_default(),
            }
        } else {
            Slot::Data {
                value: desc.value.clone().unwrap_or_default(),
                writable: desc.writable.unwrap_or(false),
            }
        };
        Property {
            slot,
            enumerable: desc.enumerable.unwrap_or(false),
            configurable: desc.configurable.unwrap_or(false),
        }
    }
}

/// Partial property descriptor
#[derive(Debug, Clone, Default)]
pub struct PropertyDescriptor {
    pub value: Option<Value>,
    pub writable: Option<bool>,
    pub get: Option<Value>,
    pub set: Option<Value>,
    pub enumerable: Option<bool>,
    pub configurable: Option<bool>,
}

impl PropertyDescriptor {
    /// Descriptor carrying only a value
    pub fn value(value: Value) -> Self {
        PropertyDescriptor {
            value: Some(value),
            ..Self::default()
        }
    }

    /// Fully specified data descriptor
    pub fn data(value: Value, writable: bool, enumerable: bool, configurable: bool) -> Self {
        PropertyDescriptor {
            value: Some(value),
            writable: Some(writable),
            enumerable: Some(enumerable),
            configurable: Some(configurable),
            ..Self::default()
        }
    }

    #[inline]
    pub fn is_data_descriptor(&self) -> bool {
        self.value.is_some() || self.writable.is_some()
    }

    #[inline]
    pub fn is_accessor_descriptor(&self) -> bool {
        self.get.is_some() || self.set.is_some()
    }

    #[inline]
    pub fn is_generic_descriptor(&self) -> bool {
        !self.is_data_descriptor() && !self.is_accessor_descriptor()
    }

    /// True when no field is present
    pub fn is_empty(&self) -> bool {
        self.is_generic_descriptor() && self.enumerable.is_none() && self.configurable.is_none()
    }
}

/// Insertion-ordered property storage of one object
#[derive(Debug, Clone, Default)]
pub struct PropertyTable {
    entries: IndexMap<PropertyKey, Property, FxBuildHasher>,
}

impl PropertyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of properties
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn get(&self, key: &PropertyKey) -> Option<&Property> {
        self.entries.get(key)
    }

    #[inline]
    pub fn get_mut(&mut self, key: &PropertyKey) -> Option<&mut Property> {
        self.entries.get_mut(key)
    }

    #[inline]
    pub fn contains(&self, key: &PropertyKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or replace a property
    ///
    /// Replacing an existing key keeps its original position.
    pub fn insert(&mut self, key: PropertyKey, prop: Property) {
        self.entries.insert(key, prop);
    }

    /// Remove a property, preserving the order of the rest
    pub fn remove(&mut self, key: &PropertyKey) -> Option<Property> {
        self.entries.shift_remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PropertyKey, &Property)> {
        self.entries.iter()
    }

    /// Array indices stored in the table, unsorted
    pub fn index_keys(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.keys().filter_map(PropertyKey::array_index)
    }

    /// Keys in ordinary own-key order
    pub fn ordered_keys(&self) -> Vec<PropertyKey> {
        let mut indices: Vec<(u32, &PropertyKey)> = self
            .entries
            .keys()
            .filter_map(|k| k.array_index().map(|i| (i, k)))
            .collect();
        indices.sort_unstable_by_key(|&(i, _)| i);

        let mut keys: Vec<PropertyKey> = Vec::with_capacity(self.entries.len());
        keys.extend(indices.into_iter().map(|(_, k)| k.clone()));
        keys.extend(
            self.entries
                .keys()
                .filter(|k| !k.is_symbol() && k.array_index().is_none())
                .cloned(),
        );
        keys.extend(self.entries.keys().filter(|k| k.is_symbol()).cloned());
        keys
    }
}
