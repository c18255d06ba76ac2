//! Object-level integrity: freeze, seal and the extensible gate.
//!
//! Only the receiver's own map is inspected or changed. Shared templates and
//! array elements keep their attributes.

use crate::error::JsError;
use crate::realm::Realm;
use crate::value::JsValue;

impl Realm {
    /// Non-objects are returned untouched
    pub fn freeze(&mut self, value: &JsValue) -> Result<(), JsError> {
        let Some(r) = value.as_object() else {
            return Ok(());
        };
        let obj = self.object_mut(r)?;
        obj.extensible = false;
        for prop in obj.own.iter_mut() {
            prop.attrs.writable = false;
            prop.attrs.configurable = false;
        }
        Ok(())
    }

    pub fn seal(&mut self, value: &JsValue) -> Result<(), JsError> {
        let Some(r) = value.as_object() else {
            return Ok(());
        };
        let obj = self.object_mut(r)?;
        obj.extensible = false;
        for prop in obj.own.iter_mut() {
            prop.attrs.configurable = false;
        }
        Ok(())
    }

    pub fn is_frozen(&self, value: &JsValue) -> Result<bool, JsError> {
        let Some(r) = value.as_object() else {
            return Ok(true);
        };
        let obj = self.object(r)?;
        Ok(!obj.extensible
            && obj
                .own
                .iter()
                .filter(|p| !p.is_tombstone())
                .all(|p| !p.attrs.writable && !p.attrs.configurable))
    }

    pub fn is_sealed(&self, value: &JsValue) -> Result<bool, JsError> {
        let Some(r) = value.as_object() else {
            return Ok(true);
        };
        let obj = self.object(r)?;
        Ok(!obj.extensible
            && obj
                .own
                .iter()
                .filter(|p| !p.is_tombstone())
                .all(|p| !p.attrs.configurable))
    }

    pub fn prevent_extensions(&mut self, value: &JsValue) -> Result<(), JsError> {
        if let Some(r) = value.as_object() {
            self.object_mut(r)?.extensible = false;
        }
        Ok(())
    }

    pub fn is_extensible(&self, value: &JsValue) -> Result<bool, JsError> {
        match value.as_object() {
            Some(r) => Ok(self.object(r)?.extensible),
            None => Ok(false),
        }
    }
}
