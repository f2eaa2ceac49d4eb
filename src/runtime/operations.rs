//! Abstract operations on objects
//!
//! Thin compositions of the internal methods used by the built-ins and by
//! host code. The `_or_throw` variants turn a `false` from an internal
//! method into a TypeError.

use tracing::debug;

use crate::context::Context;
use crate::error::{JsError, JsResult};
use crate::runtime::property::{PropertyDescriptor, PropertyKey};
use crate::value::{ObjectId, Value};

/// Target of `SetIntegrityLevel` / `TestIntegrityLevel`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityLevel {
    Sealed,
    Frozen,
}

impl Context {
    /// `Get(O, P)`
    pub fn get(&mut self, id: ObjectId, key: impl Into<PropertyKey>) -> JsResult<Value> {
        let key = key.into();
        self.get_with_receiver(id, &key, &Value::Object(id))
    }

    /// `GetV(V, P)`: property lookup on any value, primitives through their
    /// wrapper prototype while staying the receiver
    pub fn get_v(&mut self, value: &Value, key: impl Into<PropertyKey>) -> JsResult<Value> {
        let key = key.into();
        let object = self.to_object(value)?;
        self.get_with_receiver(object, &key, value)
    }

    /// `GetMethod(V, P)`: `None` for undefined or null, TypeError if not callable
    pub fn get_method(&mut self, value: &Value, key: impl Into<PropertyKey>) -> JsResult<Option<Value>> {
        let key = key.into();
        let func = self.get_v(value, &key)?;
        if func.is_nullish() {
            return Ok(None);
        }
        if !self.is_callable(&func) {
            return Err(JsError::type_error(format!(
                "property {} is not a function: {}",
                key,
                self.describe(&func)
            )));
        }
        Ok(Some(func))
    }

    /// `Set(O, P, V, Throw)`
    pub fn set(
        &mut self,
        id: ObjectId,
        key: impl Into<PropertyKey>,
        value: Value,
        throw: bool,
    ) -> JsResult<bool> {
        let key = key.into();
        let ok = self.set_with_receiver(id, &key, value, &Value::Object(id))?;
        if !ok && throw {
            return Err(JsError::type_error(format!(
                "cannot assign to read only property {}",
                key
            )));
        }
        Ok(ok)
    }

    /// `CreateDataProperty(O, P, V)`
    pub fn create_data_property(
        &mut self,
        id: ObjectId,
        key: impl Into<PropertyKey>,
        value: Value,
    ) -> JsResult<bool> {
        let key = key.into();
        self.define_own_property(id, &key, &PropertyDescriptor::data(value, true, true, true))
    }

    /// `CreateDataPropertyOrThrow(O, P, V)`
    pub fn create_data_property_or_throw(
        &mut self,
        id: ObjectId,
        key: impl Into<PropertyKey>,
        value: Value,
    ) -> JsResult<()> {
        let key = key.into();
        if !self.create_data_property(id, &key, value)? {
            return Err(JsError::type_error(format!("cannot define property {}", key)));
        }
        Ok(())
    }

    /// `DefinePropertyOrThrow(O, P, Desc)`
    pub fn define_property_or_throw(
        &mut self,
        id: ObjectId,
        key: impl Into<PropertyKey>,
        desc: &PropertyDescriptor,
    ) -> JsResult<()> {
        let key = key.into();
        if !self.define_own_property(id, &key, desc)? {
            return Err(JsError::type_error(format!("cannot redefine property: {}", key)));
        }
        Ok(())
    }

    /// `DeletePropertyOrThrow(O, P)`
    pub fn delete_property_or_throw(&mut self, id: ObjectId, key: impl Into<PropertyKey>) -> JsResult<()> {
        let key = key.into();
        if !self.delete_property(id, &key)? {
            return Err(JsError::type_error(format!("cannot delete property {}", key)));
        }
        Ok(())
    }

    /// `HasOwnProperty(O, P)`
    pub fn has_own_property(&mut self, id: ObjectId, key: impl Into<PropertyKey>) -> JsResult<bool> {
        let key = key.into();
        Ok(self.get_own_property(id, &key)?.is_some())
    }

    /// `Invoke(V, P, args)`
    pub fn invoke(&mut self, value: &Value, key: impl Into<PropertyKey>, args: &[Value]) -> JsResult<Value> {
        let func = self.get_v(value, key)?;
        self.call(&func, value, args)
    }

    /// `LengthOfArrayLike(O)`
    ///
    /// The length is reduced with `ToUint32`, so `-4294967292` reads as 4.
    pub fn length_of_array_like(&mut self, id: ObjectId) -> JsResult<u32> {
        let len = self.get(id, "length")?;
        self.to_uint32(&len)
    }

    /// `CreateListFromArrayLike(obj)`
    pub fn create_list_from_array_like(&mut self, value: &Value) -> JsResult<Vec<Value>> {
        let Some(id) = value.as_object() else {
            return Err(JsError::type_error(format!(
                "{} is not an array-like object",
                self.describe(value)
            )));
        };
        let len = self.length_of_array_like(id)?;
        self.check_list_length(len)?;
        let mut list = Vec::with_capacity(len as usize);
        for index in 0..len {
            list.push(self.get(id, index)?);
        }
        Ok(list)
    }

    /// Reject array-likes too long to copy into a host list
    pub(crate) fn check_list_length(&self, len: u32) -> JsResult<()> {
        let limit = self.config().max_list_length;
        if len as usize > limit {
            debug!(len, limit, "array-like exceeds list length limit");
            return Err(JsError::range_error(format!(
                "array-like length {} exceeds the limit of {}",
                len, limit
            )));
        }
        Ok(())
    }

    /// `IsArray(argument)`, looking through proxies
    pub fn is_array(&self, value: &Value) -> JsResult<bool> {
        let Some(id) = value.as_object() else {
            return Ok(false);
        };
        let object = self.object(id);
        match object.proxy_data() {
            Some(p) if p.revoked => Err(JsError::type_error(
                "cannot perform 'IsArray' on a revoked proxy",
            )),
            Some(p) => Ok(self.object(p.target).is_array()),
            None => Ok(object.is_array()),
        }
    }

    /// `SetIntegrityLevel(O, level)`
    pub fn set_integrity_level(&mut self, id: ObjectId, level: IntegrityLevel) -> JsResult<bool> {
        if !self.prevent_extensions(id)? {
            return Ok(false);
        }
        let keys = self.own_property_keys(id)?;
        for key in keys {
            let desc = match level {
                IntegrityLevel::Sealed => PropertyDescriptor {
                    configurable: Some(false),
                    ..Default::default()
                },
                IntegrityLevel::Frozen => {
                    let Some(current) = self.get_own_property(id, &key)? else {
                        continue;
                    };
                    PropertyDescriptor {
                        configurable: Some(false),
                        writable: current.is_data().then_some(false),
                        ..Default::default()
                    }
                }
            };
            self.define_property_or_throw(id, &key, &desc)?;
        }
        Ok(true)
    }

    /// `TestIntegrityLevel(O, level)`
    pub fn test_integrity_level(&mut self, id: ObjectId, level: IntegrityLevel) -> JsResult<bool> {
        if self.is_extensible(id)? {
            return Ok(false);
        }
        for key in self.own_property_keys(id)? {
            if let Some(prop) = self.get_own_property(id, &key)? {
                if prop.configurable {
                    return Ok(false);
                }
                if level == IntegrityLevel::Frozen && prop.writable() == Some(true) {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    /// String keys of enumerable own properties, in canonical order
    pub fn enumerable_own_names(&mut self, id: ObjectId) -> JsResult<Vec<PropertyKey>> {
        let mut names = Vec::new();
        for key in self.own_property_keys(id)? {
            if key.is_symbol() {
                continue;
            }
            // A getter or trap may have removed it since the keys were read
            if let Some(prop) = self.get_own_property(id, &key)? {
                if prop.enumerable {
                    names.push(key);
                }
            }
        }
        Ok(names)
    }

    /// `OrdinaryHasInstance(C, O)`
    pub fn ordinary_has_instance(&mut self, ctor: &Value, value: &Value) -> JsResult<bool> {
        if !self.is_callable(ctor) {
            return Ok(false);
        }
        let (Some(ctor), Some(mut current)) = (ctor.as_object(), value.as_object()) else {
            return Ok(false);
        };
        let proto = self.get(ctor, "prototype")?;
        let Some(proto) = proto.as_object() else {
            return Err(JsError::type_error("function has non-object prototype in instanceof check"));
        };
        let mut steps = 0;
        while let Some(next) = self.get_prototype_of(current)? {
            if next == proto {
                return Ok(true);
            }
            steps += 1;
            if steps > self.config().max_prototype_chain {
                return Err(JsError::range_error("prototype chain too long"));
            }
            current = next;
        }
        Ok(false)
    }
}
