//! Proxy exotic objects
//!
//! Every internal method of a proxy looks up the matching trap on the
//! handler. A missing trap forwards the operation to the target unchanged;
//! a present trap is called with the handler as `this` and its result is
//! checked against the target's actual state before it is trusted.
//!
//! Neither target nor handler may itself be a proxy, so forwarding never
//! nests more than one level. Forwarding still counts against the call depth
//! limit because prototype chains can loop through a proxy.

use tracing::{debug, trace};

use crate::context::Context;
use crate::error::{JsError, JsResult};
use crate::runtime::conversion::to_boolean;
use crate::runtime::equality::same_value;
use crate::runtime::object::{JsObject, ObjectKind, ProxyData};
use crate::runtime::ordinary::is_compatible_property_descriptor;
use crate::runtime::property::{Property, PropertyDescriptor, PropertyKey, Slot};
use crate::value::{ObjectId, Value};

fn invariant_violation(trap: &str, detail: &str) -> JsError {
    debug!(trap, detail, "proxy invariant violation");
    JsError::type_error(format!(
        "proxy invariant violated by '{}' trap: {}",
        trap, detail
    ))
}

impl Context {
    /// `ProxyCreate(target, handler)`
    pub fn proxy_create(&mut self, target: &Value, handler: &Value) -> JsResult<ObjectId> {
        let (Some(target), Some(handler)) = (target.as_object(), handler.as_object()) else {
            return Err(JsError::type_error(
                "cannot create proxy with a non-object as target or handler",
            ));
        };
        if self.object(target).is_proxy() || self.object(handler).is_proxy() {
            return Err(JsError::type_error(
                "cannot create proxy with a proxy as target or handler",
            ));
        }
        let data = ProxyData {
            target,
            handler,
            revoked: false,
        };
        Ok(self.alloc(JsObject::new(ObjectKind::Proxy(data), None)))
    }

    /// Mark a proxy revoked; every later operation on it throws
    pub fn revoke_proxy(&mut self, id: ObjectId) {
        if let ObjectKind::Proxy(data) = &mut self.object_mut(id).kind {
            data.revoked = true;
        }
    }

    /// Target and handler of a live proxy
    fn proxy_parts(&self, id: ObjectId) -> JsResult<(ObjectId, ObjectId)> {
        match self.object(id).proxy_data() {
            Some(p) if !p.revoked => Ok((p.target, p.handler)),
            Some(_) => Err(JsError::type_error(
                "cannot perform operation on a revoked proxy",
            )),
            None => Err(JsError::type_error("object is not a proxy")),
        }
    }

    /// Target, handler and trap function (if the handler defines one)
    fn proxy_trap(&mut self, id: ObjectId, name: &str) -> JsResult<(ObjectId, ObjectId, Option<Value>)> {
        let (target, handler) = self.proxy_parts(id)?;
        let trap = self.get_method(&Value::Object(handler), name)?;
        if trap.is_some() {
            trace!(proxy = %id, trap = name, "invoking proxy trap");
        }
        Ok((target, handler, trap))
    }

    pub(crate) fn proxy_get_prototype_of(&mut self, id: ObjectId) -> JsResult<Option<ObjectId>> {
        self.with_call_depth(|ctx| {
            let (target, handler, trap) = ctx.proxy_trap(id, "getPrototypeOf")?;
            let Some(trap) = trap else {
                return ctx.get_prototype_of(target);
            };
            let result = ctx.call(&trap, &Value::Object(handler), &[Value::Object(target)])?;
            let proto = match result {
                Value::Object(p) => Some(p),
                Value::Null => None,
                _ => return Err(invariant_violation("getPrototypeOf", "result is neither an object nor null")),
            };
            if ctx.is_extensible(target)? {
                return Ok(proto);
            }
            if ctx.get_prototype_of(target)? != proto {
                return Err(invariant_violation(
                    "getPrototypeOf",
                    "non-extensible target has a different prototype",
                ));
            }
            Ok(proto)
        })
    }

    pub(crate) fn proxy_set_prototype_of(&mut self, id: ObjectId, proto: Option<ObjectId>) -> JsResult<bool> {
        self.with_call_depth(|ctx| {
            let (target, handler, trap) = ctx.proxy_trap(id, "setPrototypeOf")?;
            let Some(trap) = trap else {
                return ctx.set_prototype_of(target, proto);
            };
            let args = [Value::Object(target), Value::from(proto)];
            let result = ctx.call(&trap, &Value::Object(handler), &args)?;
            if !to_boolean(&result) {
                return Ok(false);
            }
            if ctx.is_extensible(target)? {
                return Ok(true);
            }
            if ctx.get_prototype_of(target)? != proto {
                return Err(invariant_violation(
                    "setPrototypeOf",
                    "non-extensible target has a different prototype",
                ));
            }
            Ok(true)
        })
    }

    pub(crate) fn proxy_is_extensible(&mut self, id: ObjectId) -> JsResult<bool> {
        self.with_call_depth(|ctx| {
            let (target, handler, trap) = ctx.proxy_trap(id, "isExtensible")?;
            let Some(trap) = trap else {
                return ctx.is_extensible(target);
            };
            let result = ctx.call(&trap, &Value::Object(handler), &[Value::Object(target)])?;
            let result = to_boolean(&result);
            if result != ctx.is_extensible(target)? {
                return Err(invariant_violation(
                    "isExtensible",
                    "result differs from target extensibility",
                ));
            }
            Ok(result)
        })
    }

    pub(crate) fn proxy_prevent_extensions(&mut self, id: ObjectId) -> JsResult<bool> {
        self.with_call_depth(|ctx| {
            let (target, handler, trap) = ctx.proxy_trap(id, "preventExtensions")?;
            let Some(trap) = trap else {
                return ctx.prevent_extensions(target);
            };
            let result = ctx.call(&trap, &Value::Object(handler), &[Value::Object(target)])?;
            let result = to_boolean(&result);
            if result && ctx.is_extensible(target)? {
                return Err(invariant_violation(
                    "preventExtensions",
                    "returned true but target is still extensible",
                ));
            }
            Ok(result)
        })
    }

    pub(crate) fn proxy_get_own_property(
        &mut self,
        id: ObjectId,
        key: &PropertyKey,
    ) -> JsResult<Option<Property>> {
        self.with_call_depth(|ctx| {
            let (target, handler, trap) = ctx.proxy_trap(id, "getOwnPropertyDescriptor")?;
            let Some(trap) = trap else {
                return ctx.get_own_property(target, key);
            };
            let args = [Value::Object(target), key.to_value()];
            let result = ctx.call(&trap, &Value::Object(handler), &args)?;
            if !result.is_object() && !result.is_undefined() {
                return Err(invariant_violation(
                    "getOwnPropertyDescriptor",
                    "result is neither an object nor undefined",
                ));
            }
            let target_desc = ctx.get_own_property(target, key)?;
            if result.is_undefined() {
                let Some(target_desc) = target_desc else {
                    return Ok(None);
                };
                if !target_desc.configurable {
                    return Err(invariant_violation(
                        "getOwnPropertyDescriptor",
                        "cannot report a non-configurable property as missing",
                    ));
                }
                if !ctx.is_extensible(target)? {
                    return Err(invariant_violation(
                        "getOwnPropertyDescriptor",
                        "cannot report an existing property of a non-extensible target as missing",
                    ));
                }
                return Ok(None);
            }
            let extensible = ctx.is_extensible(target)?;
            let desc = ctx.to_property_descriptor(&result)?;
            let reported = Property::from_descriptor(&desc);
            if !is_compatible_property_descriptor(extensible, &reported.to_descriptor(), target_desc.as_ref()) {
                return Err(invariant_violation(
                    "getOwnPropertyDescriptor",
                    "result is incompatible with the target property",
                ));
            }
            if !reported.configurable && target_desc.as_ref().is_none_or(|d| d.configurable) {
                return Err(invariant_violation(
                    "getOwnPropertyDescriptor",
                    "cannot report a configurable or missing property as non-configurable",
                ));
            }
            Ok(Some(reported))
        })
    }

    pub(crate) fn proxy_define_own_property(
        &mut self,
        id: ObjectId,
        key: &PropertyKey,
        desc: &PropertyDescriptor,
    ) -> JsResult<bool> {
        self.with_call_depth(|ctx| {
            let (target, handler, trap) = ctx.proxy_trap(id, "defineProperty")?;
            let Some(trap) = trap else {
                return ctx.define_own_property(target, key, desc);
            };
            let desc_obj = ctx.from_property_descriptor(Some(desc))?;
            let args = [Value::Object(target), key.to_value(), desc_obj];
            let result = ctx.call(&trap, &Value::Object(handler), &args)?;
            if !to_boolean(&result) {
                return Ok(false);
            }
            let target_desc = ctx.get_own_property(target, key)?;
            let extensible = ctx.is_extensible(target)?;
            let setting_config_false = desc.configurable == Some(false);
            match target_desc {
                None => {
                    if !extensible {
                        return Err(invariant_violation(
                            "defineProperty",
                            "cannot add a property to a non-extensible target",
                        ));
                    }
                    if setting_config_false {
                        return Err(invariant_violation(
                            "defineProperty",
                            "cannot define a non-configurable property missing on the target",
                        ));
                    }
                }
                Some(target_desc) => {
                    if !is_compatible_property_descriptor(extensible, desc, Some(&target_desc)) {
                        return Err(invariant_violation(
                            "defineProperty",
                            "descriptor is incompatible with the target property",
                        ));
                    }
                    if setting_config_false && target_desc.configurable {
                        return Err(invariant_violation(
                            "defineProperty",
                            "cannot define a configurable target property as non-configurable",
                        ));
                    }
                }
            }
            Ok(true)
        })
    }

    /// Proxy `[[HasProperty]]`
    ///
    /// A trap denying a non-configurable own property of the target is
    /// overridden: the property is reported present. Denying any existing
    /// property of a non-extensible target throws.
    pub(crate) fn proxy_has(&mut self, id: ObjectId, key: &PropertyKey) -> JsResult<bool> {
        self.with_call_depth(|ctx| {
            let (target, handler, trap) = ctx.proxy_trap(id, "has")?;
            let Some(trap) = trap else {
                return ctx.has_property(target, key);
            };
            let args = [Value::Object(target), key.to_value()];
            let result = ctx.call(&trap, &Value::Object(handler), &args)?;
            if to_boolean(&result) {
                return Ok(true);
            }
            if let Some(target_desc) = ctx.get_own_property(target, key)? {
                if !target_desc.configurable {
                    debug!(proxy = %id, key = %key, "'has' trap denied a non-configurable property; reporting it present");
                    return Ok(true);
                }
                if !ctx.is_extensible(target)? {
                    return Err(invariant_violation(
                        "has",
                        "cannot hide an existing property of a non-extensible target",
                    ));
                }
            }
            Ok(false)
        })
    }

    pub(crate) fn proxy_get(&mut self, id: ObjectId, key: &PropertyKey, receiver: &Value) -> JsResult<Value> {
        self.with_call_depth(|ctx| {
            let (target, handler, trap) = ctx.proxy_trap(id, "get")?;
            let Some(trap) = trap else {
                return ctx.get_with_receiver(target, key, receiver);
            };
            let args = [Value::Object(target), key.to_value(), receiver.clone()];
            let result = ctx.call(&trap, &Value::Object(handler), &args)?;
            if let Some(target_desc) = ctx.get_own_property(target, key)? {
                if !target_desc.configurable {
                    match &target_desc.slot {
                        Slot::Data {
                            value,
                            writable: false,
                        } if !same_value(&result, value) => {
                            return Err(invariant_violation(
                                "get",
                                "must report the value of a non-writable, non-configurable property",
                            ));
                        }
                        Slot::Accessor { get, .. } if get.is_undefined() && !result.is_undefined() => {
                            return Err(invariant_violation(
                                "get",
                                "must report undefined for a non-configurable accessor without getter",
                            ));
                        }
                        _ => {}
                    }
                }
            }
            Ok(result)
        })
    }

    pub(crate) fn proxy_set(
        &mut self,
        id: ObjectId,
        key: &PropertyKey,
        value: Value,
        receiver: &Value,
    ) -> JsResult<bool> {
        self.with_call_depth(|ctx| {
            let (target, handler, trap) = ctx.proxy_trap(id, "set")?;
            let Some(trap) = trap else {
                return ctx.set_with_receiver(target, key, value, receiver);
            };
            let args = [
                Value::Object(target),
                key.to_value(),
                value.clone(),
                receiver.clone(),
            ];
            let result = ctx.call(&trap, &Value::Object(handler), &args)?;
            if !to_boolean(&result) {
                return Ok(false);
            }
            if let Some(target_desc) = ctx.get_own_property(target, key)? {
                if !target_desc.configurable {
                    match &target_desc.slot {
                        Slot::Data {
                            value: current,
                            writable: false,
                        } if !same_value(&value, current) => {
                            return Err(invariant_violation(
                                "set",
                                "cannot change a non-writable, non-configurable property",
                            ));
                        }
                        Slot::Accessor { set, .. } if set.is_undefined() => {
                            return Err(invariant_violation(
                                "set",
                                "cannot set a non-configurable accessor without setter",
                            ));
                        }
                        _ => {}
                    }
                }
            }
            Ok(true)
        })
    }

    pub(crate) fn proxy_delete(&mut self, id: ObjectId, key: &PropertyKey) -> JsResult<bool> {
        self.with_call_depth(|ctx| {
            let (target, handler, trap) = ctx.proxy_trap(id, "deleteProperty")?;
            let Some(trap) = trap else {
                return ctx.delete_property(target, key);
            };
            let args = [Value::Object(target), key.to_value()];
            let result = ctx.call(&trap, &Value::Object(handler), &args)?;
            if !to_boolean(&result) {
                return Ok(false);
            }
            if let Some(target_desc) = ctx.get_own_property(target, key)? {
                if !target_desc.configurable {
                    return Err(invariant_violation(
                        "deleteProperty",
                        "cannot delete a non-configurable property",
                    ));
                }
            }
            Ok(true)
        })
    }

    pub(crate) fn proxy_own_keys(&mut self, id: ObjectId) -> JsResult<Vec<PropertyKey>> {
        self.with_call_depth(|ctx| {
            let (target, handler, trap) = ctx.proxy_trap(id, "ownKeys")?;
            let Some(trap) = trap else {
                return ctx.own_property_keys(target);
            };
            let result = ctx.call(&trap, &Value::Object(handler), &[Value::Object(target)])?;
            let mut keys: Vec<PropertyKey> = Vec::new();
            for element in ctx.create_list_from_array_like(&result)? {
                let key = match element {
                    Value::String(s) => PropertyKey::String(s),
                    Value::Symbol(s) => PropertyKey::Symbol(s),
                    _ => {
                        return Err(invariant_violation(
                            "ownKeys",
                            "result contains a value that is not a property key",
                        ));
                    }
                };
                if keys.contains(&key) {
                    return Err(invariant_violation("ownKeys", "result contains duplicate keys"));
                }
                keys.push(key);
            }

            let extensible = ctx.is_extensible(target)?;
            let mut configurable_keys = Vec::new();
            let mut fixed_keys = Vec::new();
            for key in ctx.own_property_keys(target)? {
                match ctx.get_own_property(target, &key)? {
                    Some(desc) if !desc.configurable => fixed_keys.push(key),
                    _ => configurable_keys.push(key),
                }
            }
            if extensible && fixed_keys.is_empty() {
                return Ok(keys);
            }

            let mut unchecked = keys.clone();
            for key in &fixed_keys {
                let Some(pos) = unchecked.iter().position(|k| k == key) else {
                    return Err(invariant_violation(
                        "ownKeys",
                        "result omits a non-configurable property of the target",
                    ));
                };
                unchecked.remove(pos);
            }
            if extensible {
                return Ok(keys);
            }
            for key in &configurable_keys {
                let Some(pos) = unchecked.iter().position(|k| k == key) else {
                    return Err(invariant_violation(
                        "ownKeys",
                        "result omits a property of a non-extensible target",
                    ));
                };
                unchecked.remove(pos);
            }
            if !unchecked.is_empty() {
                return Err(invariant_violation(
                    "ownKeys",
                    "result adds properties to a non-extensible target",
                ));
            }
            Ok(keys)
        })
    }

    /// Proxy `[[Call]]`
    pub(crate) fn proxy_call(&mut self, id: ObjectId, this: &Value, args: &[Value]) -> JsResult<Value> {
        let (target, handler, trap) = self.proxy_trap(id, "apply")?;
        let Some(trap) = trap else {
            return self.call(&Value::Object(target), this, args);
        };
        let arg_array = self.create_array_from_list(args);
        let trap_args = [Value::Object(target), this.clone(), Value::Object(arg_array)];
        self.call(&trap, &Value::Object(handler), &trap_args)
    }

    /// Proxy `[[Construct]]`
    pub(crate) fn proxy_construct(
        &mut self,
        id: ObjectId,
        args: &[Value],
        new_target: ObjectId,
    ) -> JsResult<Value> {
        let (target, handler, trap) = self.proxy_trap(id, "construct")?;
        let Some(trap) = trap else {
            return self.construct(&Value::Object(target), args, Some(&Value::Object(new_target)));
        };
        let arg_array = self.create_array_from_list(args);
        let trap_args = [
            Value::Object(target),
            Value::Object(arg_array),
            Value::Object(new_target),
        ];
        let result = self.call(&trap, &Value::Object(handler), &trap_args)?;
        if !result.is_object() {
            return Err(invariant_violation("construct", "result is not an object"));
        }
        Ok(result)
    }
}
