//! Prototype links

use crate::error::JsError;
use crate::heap::ObjectRef;
use crate::realm::{PrototypeIndex, Realm};
use crate::value::JsValue;

impl Realm {
    /// `[[GetPrototypeOf]]`; primitives report their wrapper prototype
    pub fn prototype_of(&self, value: &JsValue) -> Result<JsValue, JsError> {
        if let Some(idx) = PrototypeIndex::of_primitive(value) {
            return Ok(JsValue::Object(self.prototype(idx)));
        }
        match value {
            JsValue::Object(r) => Ok(self
                .object(*r)?
                .prototype
                .map_or(JsValue::Null, JsValue::Object)),
            _ => Ok(JsValue::Null),
        }
    }

    /// Change the prototype of `object`; false if that would close a cycle.
    pub fn set_prototype_of(
        &mut self,
        object: ObjectRef,
        proto: Option<ObjectRef>,
    ) -> Result<bool, JsError> {
        if self.object(object)?.prototype == proto {
            return Ok(true);
        }

        let mut level = proto;
        while let Some(current) = level {
            if current == object {
                tracing::debug!(object = object.index(), "prototype cycle rejected");
                return Ok(false);
            }
            level = self.object(current)?.prototype;
        }

        self.object_mut(object)?.prototype = proto;
        Ok(true)
    }

    /// Is `proto` anywhere on the chain of `value` (excluding `value` itself)?
    pub fn is_prototype_of(&self, proto: ObjectRef, value: &JsValue) -> Result<bool, JsError> {
        let JsValue::Object(r) = value else {
            return Ok(false);
        };
        let mut level = self.object(*r)?.prototype;
        while let Some(current) = level {
            if current == proto {
                return Ok(true);
            }
            level = self.object(current)?.prototype;
        }
        Ok(false)
    }
}
