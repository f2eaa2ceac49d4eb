//! JavaScript Array implementation
//!
//! Arrays are sparse: elements are ordinary index-keyed properties in the
//! object's property table. What makes an array exotic is the coupling
//! between those keys and its non-configurable `length` property, enforced
//! by [`Context::array_define_own_property`].

use tracing::debug;

use crate::context::Context;
use crate::error::{JsError, JsResult};
use crate::runtime::object::{JsObject, ObjectKind};
use crate::runtime::property::{Property, PropertyDescriptor, PropertyKey, Slot};
use crate::value::{ObjectId, Value};

/// Maximum array length (2^32 - 1)
pub const MAX_ARRAY_LENGTH: u32 = u32::MAX;

impl Context {
    /// `ArrayCreate(length, proto)`
    pub fn array_create(&mut self, length: u64, proto: Option<ObjectId>) -> JsResult<ObjectId> {
        if length > u64::from(MAX_ARRAY_LENGTH) {
            return Err(JsError::range_error("invalid array length"));
        }
        let proto = proto.unwrap_or(self.intrinsics().array_prototype);
        let mut array = JsObject::new(ObjectKind::Array, Some(proto));
        array.properties.insert(
            "length".into(),
            Property::data(Value::from(length as f64), true, false, false),
        );
        Ok(self.alloc(array))
    }

    /// `CreateArrayFromList`
    pub fn create_array_from_list(&mut self, values: &[Value]) -> ObjectId {
        let proto = self.intrinsics().array_prototype;
        let mut array = JsObject::new(ObjectKind::Array, Some(proto));
        for (i, value) in values.iter().enumerate() {
            array
                .properties
                .insert(PropertyKey::from_index(i as u64), Property::plain(value.clone()));
        }
        array.properties.insert(
            "length".into(),
            Property::data(Value::from(values.len() as f64), true, false, false),
        );
        self.alloc(array)
    }

    /// Current `length` value and writability of an array
    fn array_length(&self, id: ObjectId) -> (u32, bool) {
        let key = PropertyKey::from("length");
        match self.object(id).properties.get(&key).map(|p| &p.slot) {
            Some(Slot::Data {
                value: Value::Number(n),
                writable,
            }) => (*n as u32, *writable),
            _ => (0, true),
        }
    }

    /// Overwrite the stored `length` slot without validation
    fn store_array_length(&mut self, id: ObjectId, len: u64, lock: bool) {
        let key = PropertyKey::from("length");
        if let Some(prop) = self.object_mut(id).properties.get_mut(&key) {
            if let Slot::Data { value, writable } = &mut prop.slot {
                *value = Value::from(len as f64);
                if lock {
                    *writable = false;
                }
            }
        }
    }

    /// Array exotic `[[DefineOwnProperty]]`
    pub(crate) fn array_define_own_property(
        &mut self,
        id: ObjectId,
        key: &PropertyKey,
        desc: &PropertyDescriptor,
    ) -> JsResult<bool> {
        if key.is_str("length") {
            return self.array_set_length(id, desc);
        }
        let Some(index) = key.array_index() else {
            return Ok(self.ordinary_define_own_property(id, key, desc));
        };
        let (old_len, length_writable) = self.array_length(id);
        if index >= old_len && !length_writable {
            return Ok(false);
        }
        if !self.ordinary_define_own_property(id, key, desc) {
            return Ok(false);
        }
        if index >= old_len {
            self.store_array_length(id, u64::from(index) + 1, false);
        }
        Ok(true)
    }

    /// `ArraySetLength`
    ///
    /// Shrinking deletes index properties from the highest down. A
    /// non-configurable element stops the deletion; length is left just
    /// above it and the define reports failure.
    fn array_set_length(&mut self, id: ObjectId, desc: &PropertyDescriptor) -> JsResult<bool> {
        let length_key = PropertyKey::from("length");
        let Some(value) = &desc.value else {
            return Ok(self.ordinary_define_own_property(id, &length_key, desc));
        };
        let new_len = self.to_uint32(value)?;
        let number_len = self.to_number(value)?;
        if f64::from(new_len) != number_len {
            return Err(JsError::range_error("invalid array length"));
        }

        let mut new_desc = desc.clone();
        new_desc.value = Some(Value::from(new_len));

        // Coercion may have run user code; read the current state afresh
        let (old_len, old_writable) = self.array_length(id);
        if new_len >= old_len {
            return Ok(self.ordinary_define_own_property(id, &length_key, &new_desc));
        }
        if !old_writable {
            return Ok(false);
        }
        let lock = new_desc.writable == Some(false);
        if lock {
            new_desc.writable = Some(true);
        }
        if !self.ordinary_define_own_property(id, &length_key, &new_desc) {
            return Ok(false);
        }

        let mut doomed: Vec<u32> = self
            .object(id)
            .properties
            .index_keys()
            .filter(|&i| i >= new_len)
            .collect();
        doomed.sort_unstable_by(|a, b| b.cmp(a));

        for index in doomed {
            let key = PropertyKey::from(index);
            let configurable = self
                .object(id)
                .properties
                .get(&key)
                .is_none_or(|p| p.configurable);
            if !configurable {
                debug!(array = %id, index, "length truncation blocked by non-configurable element");
                self.store_array_length(id, u64::from(index) + 1, lock);
                return Ok(false);
            }
            self.object_mut(id).properties.remove(&key);
        }
        if lock {
            self.store_array_length(id, u64::from(new_len), true);
        }
        Ok(true)
    }
}
