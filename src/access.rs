//! Script-level property access: `o[k]`, `o[k] = v`, `delete o[k]`, `k in o`.

use crate::error::JsError;
use crate::external::invoke_external;
use crate::heap::ObjectRef;
use crate::property::{Handler, Property, PropertyKind, SlotRef};
use crate::query::{FoundProperty, Location, PropertyQuery, QueryMode, QueryResult, property_query};
use crate::realm::Realm;
use crate::value::{JsString, JsValue};

impl Realm {
    /// Run a query, converting a non-primitive key and retrying when asked to
    pub fn query(
        &mut self,
        pq: &PropertyQuery,
        receiver: &JsValue,
        key: &JsValue,
    ) -> Result<QueryResult, JsError> {
        match property_query(self, pq, receiver, key)? {
            QueryResult::NeedsKeyCoercion => {
                let key = self.to_primitive(key)?;
                match property_query(self, pq, receiver, &key)? {
                    QueryResult::NeedsKeyCoercion => {
                        Err(JsError::internal_error("property key is not primitive"))
                    }
                    result => Ok(result),
                }
            }
            result => Ok(result),
        }
    }

    pub fn get_property(&mut self, object: &JsValue, key: &JsValue) -> Result<JsValue, JsError> {
        let receiver = object.clone();
        match self.query(&PropertyQuery::new(QueryMode::Get), &receiver, key)? {
            QueryResult::Found(found) => self.read_found(&receiver, found),
            _ => Ok(JsValue::Undefined),
        }
    }

    /// Convenience for string keys
    pub fn get(&mut self, object: &JsValue, key: &str) -> Result<JsValue, JsError> {
        self.get_property(object, &JsValue::from(key))
    }

    /// Value of a property if it exists anywhere on the chain
    pub(crate) fn get_if_present(
        &mut self,
        object: &JsValue,
        key: &str,
    ) -> Result<Option<JsValue>, JsError> {
        let receiver = object.clone();
        match self.query(
            &PropertyQuery::new(QueryMode::Get),
            &receiver,
            &JsValue::from(key),
        )? {
            QueryResult::Found(found) => Ok(Some(self.read_found(&receiver, found)?)),
            _ => Ok(None),
        }
    }

    /// Value of a found record, running handlers and privatizing shared methods
    pub(crate) fn read_found(
        &mut self,
        receiver: &JsValue,
        found: FoundProperty,
    ) -> Result<JsValue, JsError> {
        let FoundProperty { property, location } = found;
        match &property.kind {
            PropertyKind::Plain => Ok(property.value),
            PropertyKind::Method => match location {
                Location::Shared(holder) => Ok(self.privatize(holder, &property)?.value),
                _ => Ok(property.value),
            },
            PropertyKind::Reference(slot) => self.read_slot(*slot),
            PropertyKind::Handler(handler) => self.invoke_handler(handler, receiver, None),
            PropertyKind::Tombstone => Err(JsError::internal_error("unexpected property type")),
        }
    }

    pub fn set_property(
        &mut self,
        object: &JsValue,
        key: &JsValue,
        value: JsValue,
    ) -> Result<(), JsError> {
        if matches!(
            object,
            JsValue::Boolean(_) | JsValue::Number(_) | JsValue::String(_)
        ) {
            let name = self.to_string(key)?;
            return Err(JsError::type_error(format!(
                "Cannot create property \"{}\" on {}",
                name,
                object.type_name()
            )));
        }

        let receiver = object.clone();
        match self.query(&PropertyQuery::new(QueryMode::Set), &receiver, key)? {
            QueryResult::Found(found) => self.write_found(&receiver, found, value),
            QueryResult::NotFound { key, tombstone } => {
                let target = receiver.as_object().ok_or_else(|| {
                    JsError::type_error(format!("Cannot create property \"{}\"", key))
                })?;
                self.add_own_property(target, Property::data(key, value), tombstone.is_some())
            }
            QueryResult::NeedsKeyCoercion => {
                Err(JsError::internal_error("property key is not primitive"))
            }
        }
    }

    /// Convenience for string keys
    pub fn set(&mut self, object: &JsValue, key: &str, value: JsValue) -> Result<(), JsError> {
        self.set_property(object, &JsValue::from(key), value)
    }

    fn write_found(
        &mut self,
        receiver: &JsValue,
        found: FoundProperty,
        value: JsValue,
    ) -> Result<(), JsError> {
        let FoundProperty { property, location } = found;
        match &property.kind {
            PropertyKind::Handler(handler) => {
                if !property.attrs.writable {
                    return Err(read_only(&property.name));
                }
                self.invoke_handler(handler, receiver, Some(value))?;
                Ok(())
            }
            PropertyKind::Reference(slot) => self.write_slot(*slot, value),
            PropertyKind::Plain | PropertyKind::Method => {
                if !property.attrs.writable {
                    return Err(read_only(&property.name));
                }
                match location {
                    Location::Own(holder) => {
                        if let Some(prop) = self.object_mut(holder)?.own.find_mut(property.name.as_str()) {
                            prop.value = value;
                        }
                        Ok(())
                    }
                    Location::Shared(holder) => {
                        tracing::debug!(key = property.name.as_str(), "shared property privatized on write");
                        let private = Property {
                            name: property.name,
                            value,
                            kind: PropertyKind::Plain,
                            attrs: property.attrs,
                        };
                        self.object_mut(holder)?.own.replace(private);
                        Ok(())
                    }
                    Location::Synthesized => {
                        if let (JsValue::Object(r), "length") = (receiver, property.name.as_str()) {
                            if self.object(*r)?.is_array() {
                                self.set_array_length(*r, &value)?;
                                return Ok(());
                            }
                        }
                        Err(read_only(&property.name))
                    }
                }
            }
            PropertyKind::Tombstone => Err(JsError::internal_error("unexpected property type")),
        }
    }

    /// Append a new own property, or rewrite the tombstone left at its key
    pub(crate) fn add_own_property(
        &mut self,
        target: ObjectRef,
        property: Property,
        reuse_tombstone: bool,
    ) -> Result<(), JsError> {
        let obj = self.object_mut(target)?;
        if !obj.extensible {
            return Err(JsError::type_error(format!(
                "Cannot add property \"{}\", object is not extensible",
                property.name
            )));
        }
        if reuse_tombstone {
            obj.own.replace(property);
            Ok(())
        } else {
            obj.own.insert(property)
        }
    }

    /// `delete object[key]`; true when the property is gone afterwards
    pub fn delete_property(&mut self, object: &JsValue, key: &JsValue) -> Result<bool, JsError> {
        let receiver = object.clone();
        let result = self.query(&PropertyQuery::new(QueryMode::Delete), &receiver, key)?;

        // Deleting through a primitive never touches its prototype
        if matches!(
            object,
            JsValue::Boolean(_) | JsValue::Number(_) | JsValue::String(_)
        ) {
            return match result {
                QueryResult::Found(found)
                    if found.location == Location::Synthesized
                        && !found.property.attrs.configurable =>
                {
                    Err(cannot_delete(&found.property.name))
                }
                _ => Ok(true),
            };
        }

        let QueryResult::Found(FoundProperty { property, location }) = result else {
            return Ok(true);
        };

        match &property.kind {
            PropertyKind::Handler(handler) => {
                if !property.attrs.configurable {
                    return Err(cannot_delete(&property.name));
                }
                Ok(self.invoke_handler(handler, &receiver, None)?.to_boolean())
            }
            PropertyKind::Reference(slot) => {
                self.clear_slot(*slot)?;
                Ok(true)
            }
            PropertyKind::Plain | PropertyKind::Method => {
                if !property.attrs.configurable {
                    return Err(cannot_delete(&property.name));
                }
                match location {
                    Location::Own(holder) => {
                        if let Some(prop) = self.object_mut(holder)?.own.find_mut(property.name.as_str()) {
                            prop.erase();
                        }
                    }
                    Location::Shared(holder) => {
                        self.object_mut(holder)?
                            .own
                            .replace(Property::tombstone(property.name));
                    }
                    Location::Synthesized => {}
                }
                Ok(true)
            }
            PropertyKind::Tombstone => Err(JsError::internal_error("unexpected property type")),
        }
    }

    /// `key in object`
    pub fn has_property(&mut self, object: &JsValue, key: &JsValue) -> Result<bool, JsError> {
        if !object.is_object() && !object.is_external() {
            let name = self.to_string(key)?;
            return Err(JsError::type_error(format!(
                "cannot use 'in' operator to search for \"{}\" in {}",
                name,
                object.type_name()
            )));
        }
        let receiver = object.clone();
        Ok(matches!(
            self.query(&PropertyQuery::new(QueryMode::Get), &receiver, key)?,
            QueryResult::Found(_)
        ))
    }

    /// Own property lookup used by `hasOwnProperty` and friends
    pub fn own_property(
        &mut self,
        object: &JsValue,
        key: &JsValue,
    ) -> Result<Option<FoundProperty>, JsError> {
        let receiver = object.clone();
        match self.query(&PropertyQuery::own(QueryMode::Get), &receiver, key)? {
            QueryResult::Found(found) => Ok(Some(found)),
            _ => Ok(None),
        }
    }

    pub fn invoke_handler(
        &mut self,
        handler: &Handler,
        receiver: &JsValue,
        value: Option<JsValue>,
    ) -> Result<JsValue, JsError> {
        match handler {
            Handler::Native(f) => f(self, receiver, value),
            Handler::External(request) => invoke_external(self, request, value),
        }
    }

    /// Copy a shared record into the holder's own map.
    ///
    /// Template functions are cloned so the private copy has its own identity.
    pub(crate) fn privatize(
        &mut self,
        holder: ObjectRef,
        shared: &Property,
    ) -> Result<Property, JsError> {
        let mut private = shared.clone();
        if let PropertyKind::Method = shared.kind {
            if let JsValue::Object(function) = &shared.value {
                let copy = self.clone_function(*function)?;
                private.value = JsValue::Object(copy);
            }
            private.kind = PropertyKind::Plain;
        }
        tracing::debug!(key = shared.name.as_str(), holder = holder.index(), "shared property privatized");
        self.object_mut(holder)?.own.replace(private.clone());
        Ok(private)
    }

    fn read_slot(&self, slot: SlotRef) -> Result<JsValue, JsError> {
        let obj = self.object(slot.array)?;
        Ok(obj
            .as_array()
            .and_then(|data| data.get(slot.index))
            .cloned()
            .unwrap_or_default())
    }

    pub(crate) fn write_slot(&mut self, slot: SlotRef, value: JsValue) -> Result<(), JsError> {
        let data = self
            .object_mut(slot.array)?
            .as_array_mut()
            .ok_or_else(|| JsError::internal_error("slot reference to non-array"))?;
        match data.slots.get_mut(slot.index as usize) {
            Some(cell) => {
                *cell = Some(value);
                Ok(())
            }
            None => Err(JsError::internal_error("slot reference out of range")),
        }
    }

    fn clear_slot(&mut self, slot: SlotRef) -> Result<(), JsError> {
        if let Some(cell) = self
            .object_mut(slot.array)?
            .as_array_mut()
            .and_then(|data| data.slots.get_mut(slot.index as usize))
        {
            *cell = None;
        }
        Ok(())
    }
}

fn read_only(name: &JsString) -> JsError {
    JsError::type_error(format!("Cannot assign to read-only property \"{}\"", name))
}

fn cannot_delete(name: &JsString) -> JsError {
    JsError::type_error(format!("Cannot delete property \"{}\"", name))
}
