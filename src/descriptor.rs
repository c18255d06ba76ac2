//! Property descriptors: `defineProperty` and `getOwnPropertyDescriptor`.

use crate::enumerate::EnumKind;
use crate::error::JsError;
use crate::heap::ObjectRef;
use crate::property::{Attributes, Property, PropertyKind};
use crate::query::{FoundProperty, Location, PropertyQuery, QueryMode, QueryResult};
use crate::realm::Realm;
use crate::value::{JsString, JsValue};

/// Descriptor flag that may be left out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tristate {
    True,
    False,
    #[default]
    Unset,
}

impl Tristate {
    pub fn is_true(self) -> bool {
        self == Tristate::True
    }

    pub fn is_set(self) -> bool {
        self != Tristate::Unset
    }

    /// Differs from `current` only when explicitly set
    fn conflicts_with(self, current: bool) -> bool {
        match self {
            Tristate::True => !current,
            Tristate::False => current,
            Tristate::Unset => false,
        }
    }

    fn apply_to(self, current: &mut bool) {
        match self {
            Tristate::True => *current = true,
            Tristate::False => *current = false,
            Tristate::Unset => {}
        }
    }
}

impl From<bool> for Tristate {
    fn from(b: bool) -> Self {
        if b { Tristate::True } else { Tristate::False }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PropertyDescriptor {
    pub value: Option<JsValue>,
    pub writable: Tristate,
    pub enumerable: Tristate,
    pub configurable: Tristate,
}

impl PropertyDescriptor {
    pub fn data(value: JsValue) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }

    pub fn writable(mut self, flag: bool) -> Self {
        self.writable = flag.into();
        self
    }

    pub fn enumerable(mut self, flag: bool) -> Self {
        self.enumerable = flag.into();
        self
    }

    pub fn configurable(mut self, flag: bool) -> Self {
        self.configurable = flag.into();
        self
    }
}

impl Realm {
    /// Read a descriptor record from a script object
    pub fn to_property_descriptor(&mut self, value: &JsValue) -> Result<PropertyDescriptor, JsError> {
        if !value.is_object() {
            return Err(JsError::type_error("descriptor is not an object"));
        }
        let flag = |realm: &mut Realm, name: &str| -> Result<Tristate, JsError> {
            Ok(match realm.get_if_present(value, name)? {
                Some(v) => v.to_boolean().into(),
                None => Tristate::Unset,
            })
        };
        Ok(PropertyDescriptor {
            configurable: flag(self, "configurable")?,
            enumerable: flag(self, "enumerable")?,
            writable: flag(self, "writable")?,
            value: self.get_if_present(value, "value")?,
        })
    }

    pub fn define_property(
        &mut self,
        object: ObjectRef,
        key: &JsValue,
        desc: &PropertyDescriptor,
    ) -> Result<(), JsError> {
        let receiver = JsValue::Object(object);
        let result = self.query(&PropertyQuery::own(QueryMode::Set), &receiver, key)?;

        let FoundProperty { property, location } = match result {
            QueryResult::Found(found) => found,
            QueryResult::NotFound { key, tombstone } => {
                let property = Property::with_attrs(
                    key,
                    desc.value.clone().unwrap_or_default(),
                    Attributes {
                        writable: desc.writable.is_true(),
                        enumerable: desc.enumerable.is_true(),
                        configurable: desc.configurable.is_true(),
                    },
                );
                return self.add_own_property(object, property, tombstone.is_some());
            }
            QueryResult::NeedsKeyCoercion => {
                return Err(JsError::internal_error("property key is not primitive"));
            }
        };

        match &property.kind {
            PropertyKind::Reference(slot) => {
                if let Some(value) = &desc.value {
                    self.write_slot(*slot, value.clone())?;
                }
                Ok(())
            }
            PropertyKind::Handler(handler) => {
                if let (true, Some(value)) = (property.attrs.writable, &desc.value) {
                    self.invoke_handler(handler, &receiver, Some(value.clone()))?;
                }
                Ok(())
            }
            PropertyKind::Plain | PropertyKind::Method => {
                validate_redefinition(&property, desc)?;

                let mut updated = match location {
                    Location::Shared(holder) => self.privatize(holder, &property)?,
                    _ => property.clone(),
                };
                if let Some(value) = &desc.value {
                    updated.value = value.clone();
                }
                desc.writable.apply_to(&mut updated.attrs.writable);
                desc.enumerable.apply_to(&mut updated.attrs.enumerable);
                desc.configurable.apply_to(&mut updated.attrs.configurable);

                match location {
                    Location::Own(holder) | Location::Shared(holder) => {
                        self.object_mut(holder)?.own.replace(updated);
                    }
                    Location::Synthesized => {
                        if let (Some(value), "length") = (&desc.value, property.name.as_str()) {
                            if self.object(object)?.is_array() {
                                self.set_array_length(object, value)?;
                            }
                        }
                    }
                }
                Ok(())
            }
            PropertyKind::Tombstone => Err(JsError::internal_error(format!(
                "unexpected property type \"tombstone\" while defining \"{}\"",
                property.name
            ))),
        }
    }

    /// `Object.defineProperties` body
    pub fn define_properties(&mut self, object: ObjectRef, properties: &JsValue) -> Result<(), JsError> {
        if !properties.is_object() {
            return Err(JsError::type_error("descriptor is not an object"));
        }
        let keys = self.enumerate(properties, EnumKind::Keys, false)?;
        for key in keys {
            let descriptor = self.get_property(properties, &key)?;
            let desc = self.to_property_descriptor(&descriptor)?;
            self.define_property(object, &key, &desc)?;
        }
        Ok(())
    }

    /// Own property descriptor as a native record
    pub fn own_property_descriptor(
        &mut self,
        object: &JsValue,
        key: &JsValue,
    ) -> Result<Option<(JsValue, Attributes)>, JsError> {
        let receiver = object.clone();
        let result = self.query(&PropertyQuery::own(QueryMode::Get), &receiver, key)?;
        let QueryResult::Found(FoundProperty { property, location }) = result else {
            return Ok(None);
        };

        let value = match &property.kind {
            PropertyKind::Plain => property.value.clone(),
            PropertyKind::Method => match location {
                Location::Shared(holder) => self.privatize(holder, &property)?.value,
                _ => property.value.clone(),
            },
            PropertyKind::Reference(_) | PropertyKind::Handler(_) => {
                let found = FoundProperty {
                    property: property.clone(),
                    location,
                };
                self.read_found(&receiver, found)?
            }
            PropertyKind::Tombstone => {
                return Err(JsError::internal_error("unexpected property type"));
            }
        };
        Ok(Some((value, property.attrs)))
    }

    /// `Object.getOwnPropertyDescriptor` body: a fresh descriptor object or undefined
    pub fn get_own_property_descriptor(
        &mut self,
        object: &JsValue,
        key: &JsValue,
    ) -> Result<JsValue, JsError> {
        let Some((value, attrs)) = self.own_property_descriptor(object, key)? else {
            return Ok(JsValue::Undefined);
        };
        let desc = self.alloc_object()?;
        let entries = [
            ("value", value),
            ("configurable", JsValue::Boolean(attrs.configurable)),
            ("enumerable", JsValue::Boolean(attrs.enumerable)),
            ("writable", JsValue::Boolean(attrs.writable)),
        ];
        let own = &mut self.object_mut(desc)?.own;
        for (name, value) in entries {
            own.insert(Property::data(JsString::from(name), value))?;
        }
        Ok(JsValue::Object(desc))
    }

    /// `Object.getOwnPropertyDescriptors` body
    pub fn get_own_property_descriptors(&mut self, object: &JsValue) -> Result<JsValue, JsError> {
        let keys = self.enumerate(object, EnumKind::Keys, true)?;
        let result = self.alloc_object()?;
        for key in keys {
            let desc = self.get_own_property_descriptor(object, &key)?;
            if matches!(desc, JsValue::Undefined) {
                continue;
            }
            let name = self.to_string(&key)?;
            self.object_mut(result)?.own.replace(Property::data(name, desc));
        }
        Ok(JsValue::Object(result))
    }
}

/// Rules for changing a non-configurable data property
fn validate_redefinition(current: &Property, desc: &PropertyDescriptor) -> Result<(), JsError> {
    if current.attrs.configurable {
        return Ok(());
    }

    let mut rejected = desc.configurable.is_true() || desc.enumerable.conflicts_with(current.attrs.enumerable);

    if !current.attrs.writable {
        rejected |= desc.writable.is_true();
        if let Some(value) = &desc.value {
            rejected |= !value.strict_equals(&current.value);
        }
    }

    if rejected {
        return Err(JsError::type_error(format!(
            "Cannot redefine property: \"{}\"",
            current.name
        )));
    }
    Ok(())
}
