//! Internal method dispatch
//!
//! Entry points for the essential internal methods. Each one selects the
//! ordinary algorithm or the exotic override for the object's kind.

use crate::context::Context;
use crate::error::JsResult;
use crate::runtime::object::ObjectKind;
use crate::runtime::property::{Property, PropertyDescriptor, PropertyKey};
use crate::value::{ObjectId, Value};

/// Which family of internal methods an object uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Behavior {
    Ordinary,
    Array,
    String,
    Proxy,
}

impl Context {
    fn behavior(&self, id: ObjectId) -> Behavior {
        match self.object(id).kind {
            ObjectKind::Array => Behavior::Array,
            ObjectKind::String(_) => Behavior::String,
            ObjectKind::Proxy(_) => Behavior::Proxy,
            _ => Behavior::Ordinary,
        }
    }

    /// `[[GetPrototypeOf]]`
    pub fn get_prototype_of(&mut self, id: ObjectId) -> JsResult<Option<ObjectId>> {
        match self.behavior(id) {
            Behavior::Proxy => self.proxy_get_prototype_of(id),
            _ => Ok(self.object(id).proto),
        }
    }

    /// `[[SetPrototypeOf]]`
    pub fn set_prototype_of(&mut self, id: ObjectId, proto: Option<ObjectId>) -> JsResult<bool> {
        match self.behavior(id) {
            Behavior::Proxy => self.proxy_set_prototype_of(id, proto),
            _ => Ok(self.ordinary_set_prototype_of(id, proto)),
        }
    }

    /// `[[IsExtensible]]`
    pub fn is_extensible(&mut self, id: ObjectId) -> JsResult<bool> {
        match self.behavior(id) {
            Behavior::Proxy => self.proxy_is_extensible(id),
            _ => Ok(self.object(id).extensible),
        }
    }

    /// `[[PreventExtensions]]`
    pub fn prevent_extensions(&mut self, id: ObjectId) -> JsResult<bool> {
        match self.behavior(id) {
            Behavior::Proxy => self.proxy_prevent_extensions(id),
            _ => {
                self.object_mut(id).extensible = false;
                Ok(true)
            }
        }
    }

    /// `[[GetOwnProperty]]`
    pub fn get_own_property(&mut self, id: ObjectId, key: &PropertyKey) -> JsResult<Option<Property>> {
        match self.behavior(id) {
            Behavior::Proxy => self.proxy_get_own_property(id, key),
            Behavior::String => Ok(self.string_get_own_property(id, key)),
            Behavior::Ordinary | Behavior::Array => {
                Ok(self.object(id).properties.get(key).cloned())
            }
        }
    }

    /// `[[DefineOwnProperty]]`
    pub fn define_own_property(
        &mut self,
        id: ObjectId,
        key: &PropertyKey,
        desc: &PropertyDescriptor,
    ) -> JsResult<bool> {
        match self.behavior(id) {
            Behavior::Proxy => self.proxy_define_own_property(id, key, desc),
            Behavior::Array => self.array_define_own_property(id, key, desc),
            Behavior::String => self.string_define_own_property(id, key, desc),
            Behavior::Ordinary => Ok(self.ordinary_define_own_property(id, key, desc)),
        }
    }

    /// `[[HasProperty]]`
    pub fn has_property(&mut self, id: ObjectId, key: &PropertyKey) -> JsResult<bool> {
        match self.behavior(id) {
            Behavior::Proxy => self.proxy_has(id, key),
            _ => self.ordinary_has_property(id, key),
        }
    }

    /// `[[Get]]`
    pub fn get_with_receiver(
        &mut self,
        id: ObjectId,
        key: &PropertyKey,
        receiver: &Value,
    ) -> JsResult<Value> {
        match self.behavior(id) {
            Behavior::Proxy => self.proxy_get(id, key, receiver),
            _ => self.ordinary_get(id, key, receiver),
        }
    }

    /// `[[Set]]`
    pub fn set_with_receiver(
        &mut self,
        id: ObjectId,
        key: &PropertyKey,
        value: Value,
        receiver: &Value,
    ) -> JsResult<bool> {
        match self.behavior(id) {
            Behavior::Proxy => self.proxy_set(id, key, value, receiver),
            _ => self.ordinary_set(id, key, value, receiver),
        }
    }

    /// `[[Delete]]`
    pub fn delete_property(&mut self, id: ObjectId, key: &PropertyKey) -> JsResult<bool> {
        match self.behavior(id) {
            Behavior::Proxy => self.proxy_delete(id, key),
            _ => self.ordinary_delete(id, key),
        }
    }

    /// `[[OwnPropertyKeys]]`
    pub fn own_property_keys(&mut self, id: ObjectId) -> JsResult<Vec<PropertyKey>> {
        match self.behavior(id) {
            Behavior::Proxy => self.proxy_own_keys(id),
            Behavior::String => Ok(self.string_own_property_keys(id)),
            Behavior::Ordinary | Behavior::Array => Ok(self.object(id).properties.ordered_keys()),
        }
    }
}
