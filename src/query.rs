//! Property resolution.
//!
//! `property_query` decides, for a receiver value and a primitive key, which
//! property record a get, set or delete operates on. It dispatches on the
//! receiver kind (primitives, strings, arrays, functions, host objects), then
//! walks own and shared maps along the prototype chain.
//!
//! The returned record is a copy. Callers mutate through the reported
//! `Location`; a record found in a shared map must be copied into an own map
//! before it is changed.

use crate::error::JsError;
use crate::external::external_query;
use crate::heap::ObjectRef;
use crate::object::{JsObject, ObjectKind};
use crate::property::{Attributes, Property, PropertyKind, SlotRef};
use crate::realm::{PrototypeIndex, Realm};
use crate::string;
use crate::value::{CheapClone, JsString, JsValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    Get,
    Set,
    Delete,
}

#[derive(Debug, Clone, Copy)]
pub struct PropertyQuery {
    pub mode: QueryMode,
    /// Only the receiver's own and shared maps are consulted
    pub own_only: bool,
}

impl PropertyQuery {
    pub fn new(mode: QueryMode) -> Self {
        Self {
            mode,
            own_only: false,
        }
    }

    pub fn own(mode: QueryMode) -> Self {
        Self {
            mode,
            own_only: true,
        }
    }
}

/// Where a found record lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Own map of the given object
    Own(ObjectRef),
    /// Shared map of the given object
    Shared(ObjectRef),
    /// Built on the fly (array elements, string characters, host properties)
    Synthesized,
}

#[derive(Debug, Clone)]
pub struct FoundProperty {
    pub property: Property,
    pub location: Location,
}

impl FoundProperty {
    pub fn is_shared(&self) -> bool {
        matches!(self.location, Location::Shared(_))
    }
}

#[derive(Debug, Clone)]
pub enum QueryResult {
    Found(FoundProperty),
    /// `tombstone` names the receiver whose own map holds a deleted entry
    /// for the key, so a new property can reuse the slot in place.
    NotFound {
        key: JsString,
        tombstone: Option<ObjectRef>,
    },
    /// The key is not primitive; convert it and query again
    NeedsKeyCoercion,
}

impl QueryResult {
    fn not_found(key: JsString) -> Self {
        QueryResult::NotFound {
            key,
            tombstone: None,
        }
    }

    fn synthesized(property: Property) -> Self {
        QueryResult::Found(FoundProperty {
            property,
            location: Location::Synthesized,
        })
    }
}

/// Resolve `key` on `object`.
///
/// Template functions are only reachable through shared maps; reads hand out
/// private copies, so a template receiver is an engine bug.
pub fn property_query(
    realm: &mut Realm,
    pq: &PropertyQuery,
    object: &JsValue,
    key: &JsValue,
) -> Result<QueryResult, JsError> {
    if !key.is_primitive() {
        return Ok(QueryResult::NeedsKeyCoercion);
    }
    let Some(name) = key.to_property_key() else {
        return Ok(QueryResult::NeedsKeyCoercion);
    };
    let index = key.to_array_index();

    tracing::trace!(key = name.as_str(), mode = ?pq.mode, own = pq.own_only, "property query");

    let start = match object {
        JsValue::Undefined | JsValue::Null => {
            return Err(JsError::type_error(format!(
                "cannot get property \"{}\" of {}",
                name,
                object.type_name()
            )));
        }
        JsValue::Boolean(_) => realm.prototype(PrototypeIndex::Boolean),
        JsValue::Number(_) => realm.prototype(PrototypeIndex::Number),
        JsValue::String(s) => {
            if let Some(i) = index {
                if let Some(found) = string_index_query(s, i, &name) {
                    return Ok(found);
                }
            }
            realm.prototype(PrototypeIndex::String)
        }
        JsValue::External(ext) => {
            return external_query(realm, pq.mode, *ext, name);
        }
        JsValue::Object(r) => {
            if realm.object(*r)?.template {
                return Err(JsError::internal_error(
                    "function template used outside its shared map",
                ));
            }
            let receiver = *r;
            if let Some(i) = index {
                match &realm.object(receiver)?.kind {
                    ObjectKind::Array(_) => {
                        return array_query(realm, pq.mode, receiver, i, name);
                    }
                    ObjectKind::String(s) => {
                        if let Some(found) = string_index_query(s, i, &name) {
                            return Ok(found);
                        }
                    }
                    _ => {}
                }
            }
            receiver
        }
    };

    object_query(realm, pq, start, name, index)
}

/// Character of a string at a codepoint index
fn string_index_query(s: &JsString, index: u32, name: &JsString) -> Option<QueryResult> {
    let ch = string::char_at(s.as_str(), index as usize)?;
    Some(QueryResult::synthesized(Property::with_attrs(
        name.cheap_clone(),
        JsValue::from(ch),
        Attributes {
            writable: false,
            enumerable: true,
            configurable: false,
        },
    )))
}

fn array_query(
    realm: &mut Realm,
    mode: QueryMode,
    array: ObjectRef,
    index: u32,
    name: JsString,
) -> Result<QueryResult, JsError> {
    let len = realm
        .object(array)?
        .as_array()
        .map(|data| data.len())
        .ok_or_else(|| JsError::internal_error("array query on non-array"))?;

    if index >= len {
        if mode != QueryMode::Set {
            return Ok(QueryResult::not_found(name));
        }
        realm.checked_array_length(index as f64 + 1.0)?;
        tracing::debug!(array = array.index(), from = len, to = index + 1, "array expanded");
        if let Some(data) = realm.object_mut(array)?.as_array_mut() {
            data.expand_to(index);
        }
    }

    if mode == QueryMode::Get {
        let value = realm.object(array)?.as_array().and_then(|data| data.get(index)).cloned();
        return Ok(match value {
            Some(value) => QueryResult::synthesized(Property::data(name, value)),
            None => QueryResult::not_found(name),
        });
    }

    Ok(QueryResult::synthesized(Property {
        name,
        value: JsValue::Undefined,
        kind: PropertyKind::Reference(SlotRef { array, index }),
        attrs: Attributes::ALL,
    }))
}

/// First handler for `name` in the shared maps along the chain, or only in
/// the receiver's shared map when `own_only`
fn find_shared_handler(
    realm: &Realm,
    start: ObjectRef,
    name: &str,
    own_only: bool,
) -> Result<Option<FoundProperty>, JsError> {
    let mut level = Some(start);
    while let Some(current) = level {
        let obj = realm.object(current)?;
        if let Some(prop) = obj.shared.find(name) {
            if prop.is_handler() {
                return Ok(Some(FoundProperty {
                    property: prop.clone(),
                    location: Location::Shared(current),
                }));
            }
        }
        if own_only {
            break;
        }
        level = obj.prototype;
    }
    Ok(None)
}

fn object_query(
    realm: &mut Realm,
    pq: &PropertyQuery,
    start: ObjectRef,
    name: JsString,
    index: Option<u32>,
) -> Result<QueryResult, JsError> {
    if pq.mode == QueryMode::Set {
        if let Some(found) = find_shared_handler(realm, start, name.as_str(), pq.own_only)? {
            return Ok(QueryResult::Found(found));
        }
    }

    let mut tombstone = None;
    let mut level = Some(start);

    while let Some(current) = level {
        let obj = realm.object(current)?;
        let is_receiver = current == start;

        if let Some(prop) = obj.own.find(name.as_str()) {
            if !prop.is_tombstone() {
                return Ok(QueryResult::Found(FoundProperty {
                    property: prop.clone(),
                    location: Location::Own(current),
                }));
            }
            if is_receiver {
                tombstone = Some(current);
            }
        } else if !is_receiver {
            // Inherited exotic levels answer only for indexes they hold
            if let Some(i) = index {
                match &obj.kind {
                    ObjectKind::Array(data) if i < data.len() => {
                        return Ok(match data.get(i) {
                            Some(value) => QueryResult::synthesized(Property::data(
                                name.cheap_clone(),
                                value.clone(),
                            )),
                            None => QueryResult::not_found(name),
                        });
                    }
                    ObjectKind::String(s) => {
                        if let Some(found) = string_index_query(s, i, &name) {
                            return Ok(found);
                        }
                    }
                    _ => {}
                }
            }
        }

        // Assignment reaches array length through the Array.prototype handler
        if is_receiver && (pq.mode != QueryMode::Set || pq.own_only) && name.as_str() == "length" {
            if let Some(length) = own_length(obj, name.cheap_clone()) {
                return Ok(QueryResult::synthesized(length));
            }
        }

        if let Some(prop) = obj.shared.find(name.as_str()) {
            return Ok(QueryResult::Found(FoundProperty {
                property: prop.clone(),
                location: Location::Shared(current),
            }));
        }

        if pq.mode != QueryMode::Get || pq.own_only {
            break;
        }
        level = obj.prototype;
    }

    Ok(QueryResult::NotFound {
        key: name,
        tombstone,
    })
}

/// The own `length` of arrays and boxed strings
fn own_length(obj: &JsObject, name: JsString) -> Option<Property> {
    let (len, writable) = match (obj.as_array(), obj.boxed_string()) {
        (Some(data), _) => (data.len(), true),
        (None, Some(s)) => (s.char_length() as u32, false),
        (None, None) => return None,
    };
    Some(Property::with_attrs(
        name,
        JsValue::from(len),
        Attributes {
            writable,
            enumerable: false,
            configurable: false,
        },
    ))
}
