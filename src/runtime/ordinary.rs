//! Ordinary object internal methods
//!
//! These are the default behaviors every non-exotic object uses, and the
//! fallbacks exotic objects delegate to. Prototype chain walks are loops
//! bounded by `ContextConfig::max_prototype_chain`; a proxy found on the
//! chain takes over the rest of the lookup through its own internal method.
//!
//! No reference into the heap is held across a call into user code: getters
//! and setters are cloned out of the property table before they run.

use tracing::debug;

use crate::context::Context;
use crate::error::{JsError, JsResult};
use crate::runtime::equality::same_value;
use crate::runtime::property::{Property, PropertyDescriptor, PropertyKey, Slot};
use crate::value::{ObjectId, Value};

/// `ValidateAndApplyPropertyDescriptor` without the write
///
/// Returns the property that results from applying `desc` to `current`, or
/// `None` when the change is not allowed.
pub fn validate_and_apply_property_descriptor(
    extensible: bool,
    desc: &PropertyDescriptor,
    current: Option<&Property>,
) -> Option<Property> {
    let Some(current) = current else {
        return extensible.then(|| Property::from_descriptor(desc));
    };

    if !current.configurable {
        if desc.configurable == Some(true) {
            return None;
        }
        if desc.enumerable.is_some_and(|e| e != current.enumerable) {
            return None;
        }
    }

    let mut next = current.clone();
    if desc.is_generic_descriptor() {
        // attribute-only change
    } else if current.is_data() != desc.is_data_descriptor() {
        if !current.configurable {
            return None;
        }
        next.slot = if current.is_data() {
            Slot::Accessor {
                get: Value::undefined(),
                set: Value::undefined(),
            }
        } else {
            Slot::Data {
                value: Value::undefined(),
                writable: false,
            }
        };
    } else if !current.configurable {
        match &current.slot {
            Slot::Data {
                value,
                writable: false,
            } => {
                if desc.writable == Some(true) {
                    return None;
                }
                if desc.value.as_ref().is_some_and(|v| !same_value(v, value)) {
                    return None;
                }
            }
            Slot::Data { .. } => {}
            Slot::Accessor { get, set } => {
                if desc.get.as_ref().is_some_and(|g| !same_value(g, get)) {
                    return None;
                }
                if desc.set.as_ref().is_some_and(|s| !same_value(s, set)) {
                    return None;
                }
            }
        }
    }

    match &mut next.slot {
        Slot::Data { value, writable } => {
            if let Some(v) = &desc.value {
                *value = v.clone();
            }
            if let Some(w) = desc.writable {
                *writable = w;
            }
        }
        Slot::Accessor { get, set } => {
            if let Some(g) = &desc.get {
                *get = g.clone();
            }
            if let Some(s) = &desc.set {
                *set = s.clone();
            }
        }
    }
    if let Some(e) = desc.enumerable {
        next.enumerable = e;
    }
    if let Some(c) = desc.configurable {
        next.configurable = c;
    }
    Some(next)
}

/// `IsCompatiblePropertyDescriptor`
#[inline]
pub fn is_compatible_property_descriptor(
    extensible: bool,
    desc: &PropertyDescriptor,
    current: Option<&Property>,
) -> bool {
    validate_and_apply_property_descriptor(extensible, desc, current).is_some()
}

impl Context {
    /// `OrdinaryDefineOwnProperty`
    pub(crate) fn ordinary_define_own_property(
        &mut self,
        id: ObjectId,
        key: &PropertyKey,
        desc: &PropertyDescriptor,
    ) -> bool {
        let object = self.object_mut(id);
        let current = object.properties.get(key);
        match validate_and_apply_property_descriptor(object.extensible, desc, current) {
            Some(next) => {
                object.properties.insert(key.clone(), next);
                true
            }
            None => false,
        }
    }

    /// `OrdinarySetPrototypeOf`
    ///
    /// Walks the would-be chain looking for `id`; the walk stops at a proxy
    /// or after `max_prototype_chain` links, the latter counting as a cycle.
    pub(crate) fn ordinary_set_prototype_of(
        &mut self,
        id: ObjectId,
        proto: Option<ObjectId>,
    ) -> bool {
        let object = self.object(id);
        if object.proto == proto {
            return true;
        }
        if !object.extensible {
            return false;
        }
        let mut p = proto;
        let mut steps = 0;
        while let Some(current) = p {
            if current == id {
                debug!(object = %id, "rejected prototype cycle");
                return false;
            }
            if self.object(current).is_proxy() {
                break;
            }
            steps += 1;
            if steps > self.config().max_prototype_chain {
                debug!(object = %id, "prototype chain too long");
                return false;
            }
            p = self.object(current).proto;
        }
        self.object_mut(id).proto = proto;
        true
    }

    /// Prototype of the next object in a chain walk, bounded by the config
    fn next_in_chain(&mut self, current: ObjectId, steps: &mut usize) -> JsResult<Option<ObjectId>> {
        *steps += 1;
        if *steps > self.config().max_prototype_chain {
            return Err(JsError::range_error("prototype chain too long"));
        }
        self.get_prototype_of(current)
    }

    /// `OrdinaryHasProperty`
    pub(crate) fn ordinary_has_property(&mut self, id: ObjectId, key: &PropertyKey) -> JsResult<bool> {
        let mut current = id;
        let mut steps = 0;
        loop {
            if self.get_own_property(current, key)?.is_some() {
                return Ok(true);
            }
            match self.next_in_chain(current, &mut steps)? {
                None => return Ok(false),
                Some(parent) if self.object(parent).is_proxy() => {
                    return self.has_property(parent, key);
                }
                Some(parent) => current = parent,
            }
        }
    }

    /// `OrdinaryGet`
    pub(crate) fn ordinary_get(
        &mut self,
        id: ObjectId,
        key: &PropertyKey,
        receiver: &Value,
    ) -> JsResult<Value> {
        let mut current = id;
        let mut steps = 0;
        loop {
            if let Some(prop) = self.get_own_property(current, key)? {
                return match prop.slot {
                    Slot::Data { value, .. } => Ok(value),
                    Slot::Accessor { get, .. } if get.is_undefined() => Ok(Value::undefined()),
                    Slot::Accessor { get, .. } => self.call(&get, receiver, &[]),
                };
            }
            match self.next_in_chain(current, &mut steps)? {
                None => return Ok(Value::undefined()),
                Some(parent) if self.object(parent).is_proxy() => {
                    return self.get_with_receiver(parent, key, receiver);
                }
                Some(parent) => current = parent,
            }
        }
    }

    /// `OrdinarySet`
    pub(crate) fn ordinary_set(
        &mut self,
        id: ObjectId,
        key: &PropertyKey,
        value: Value,
        receiver: &Value,
    ) -> JsResult<bool> {
        let mut current = id;
        let mut steps = 0;
        let own = loop {
            if let Some(prop) = self.get_own_property(current, key)? {
                break prop;
            }
            match self.next_in_chain(current, &mut steps)? {
                None => break Property::plain(Value::undefined()),
                Some(parent) if self.object(parent).is_proxy() => {
                    return self.set_with_receiver(parent, key, value, receiver);
                }
                Some(parent) => current = parent,
            }
        };

        match own.slot {
            Slot::Data { writable: false, .. } => Ok(false),
            Slot::Data { .. } => {
                let Some(receiver_id) = receiver.as_object() else {
                    return Ok(false);
                };
                match self.get_own_property(receiver_id, key)? {
                    Some(existing) => {
                        if existing.is_accessor() || existing.writable() == Some(false) {
                            return Ok(false);
                        }
                        self.define_own_property(receiver_id, key, &PropertyDescriptor::value(value))
                    }
                    None => self.define_own_property(
                        receiver_id,
                        key,
                        &PropertyDescriptor::data(value, true, true, true),
                    ),
                }
            }
            Slot::Accessor { set, .. } => {
                if set.is_undefined() {
                    return Ok(false);
                }
                self.call(&set, receiver, &[value])?;
                Ok(true)
            }
        }
    }

    /// `OrdinaryDelete`
    pub(crate) fn ordinary_delete(&mut self, id: ObjectId, key: &PropertyKey) -> JsResult<bool> {
        match self.get_own_property(id, key)? {
            None => Ok(true),
            Some(prop) if prop.configurable => {
                self.object_mut(id).properties.remove(key);
                Ok(true)
            }
            Some(_) => Ok(false),
        }
    }
}
