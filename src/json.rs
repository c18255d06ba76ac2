//! Conversion between engine values and `serde_json::Value`.
//!
//! Import stores members straight into own maps in document order. Export walks enumerable own properties; holes become `null`,
//! functions and `undefined` are skipped in objects and become `null` in arrays.

use serde_json::{Map, Number, Value};

use crate::enumerate::EnumKind;
use crate::error::JsError;
use crate::heap::ObjectRef;
use crate::object::ObjectKind;
use crate::prelude::FxHashSet;
use crate::property::Property;
use crate::realm::Realm;
use crate::value::{JsString, JsValue, number_to_js_string};

impl Realm {
    pub fn value_from_json(&mut self, json: &Value) -> Result<JsValue, JsError> {
        Ok(match json {
            Value::Null => JsValue::Null,
            Value::Bool(b) => JsValue::Boolean(*b),
            Value::Number(n) => JsValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => JsValue::from(s.as_str()),
            Value::Array(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.value_from_json(item)?);
                }
                JsValue::Object(self.alloc_array(values)?)
            }
            Value::Object(map) => {
                let object = self.alloc_object()?;
                for (key, item) in map {
                    let value = self.value_from_json(item)?;
                    // Members are plain data; `__proto__` and accessors are not consulted
                    self.object_mut(object)?
                        .own
                        .replace(Property::data(JsString::from(key.as_str()), value));
                }
                JsValue::Object(object)
            }
        })
    }

    pub fn value_to_json(&mut self, value: &JsValue) -> Result<Value, JsError> {
        let mut stack = FxHashSet::default();
        self.to_json_inner(value, &mut stack)
    }

    fn to_json_inner(
        &mut self,
        value: &JsValue,
        stack: &mut FxHashSet<ObjectRef>,
    ) -> Result<Value, JsError> {
        let r = match value {
            JsValue::Undefined | JsValue::Null | JsValue::External(_) => return Ok(Value::Null),
            JsValue::Boolean(b) => return Ok(Value::Bool(*b)),
            JsValue::Number(n) => return Ok(number_to_json(*n)),
            JsValue::String(s) => return Ok(Value::String(s.to_string())),
            JsValue::Object(r) => *r,
        };

        match &self.object(r)?.kind {
            ObjectKind::Boolean(b) => return Ok(Value::Bool(*b)),
            ObjectKind::Number(n) => return Ok(number_to_json(*n)),
            ObjectKind::String(s) => return Ok(Value::String(s.to_string())),
            ObjectKind::Date(t) => return Ok(Value::String(number_to_js_string(*t).to_string())),
            _ => {}
        }

        if !stack.insert(r) {
            return Err(JsError::type_error("Converting circular structure to JSON"));
        }
        let result = self.object_to_json(r, value, stack);
        stack.remove(&r);
        result
    }

    fn object_to_json(
        &mut self,
        r: ObjectRef,
        value: &JsValue,
        stack: &mut FxHashSet<ObjectRef>,
    ) -> Result<Value, JsError> {
        if let Some(data) = self.object(r)?.as_array() {
            let slots = data.slots.clone();
            let mut items = Vec::with_capacity(slots.len());
            for slot in slots {
                items.push(match slot {
                    Some(item) if !self.is_callable(&item) => self.to_json_inner(&item, stack)?,
                    _ => Value::Null,
                });
            }
            return Ok(Value::Array(items));
        }

        let mut map = Map::new();
        for key in self.enumerate(value, EnumKind::Keys, false)? {
            let item = self.get_property(value, &key)?;
            if matches!(item, JsValue::Undefined) || self.is_callable(&item) {
                continue;
            }
            let key: JsString = self.to_string(&key)?;
            let item = self.to_json_inner(&item, stack)?;
            map.insert(key.to_string(), item);
        }
        Ok(Value::Object(map))
    }
}

fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        return Value::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map_or(Value::Null, Value::Number)
}
