//! Property records and the per-object property maps.
//!
//! Every object carries two maps: an own map it may mutate freely, and a
//! shared map that is a template common to every object built from the same
//! bootstrap description. Shared maps are behind an `Rc` and are never
//! mutated; a write against a shared record first copies it into the own map.

use std::rc::Rc;

use crate::error::JsError;
use crate::external::ExternalRequest;
use crate::heap::ObjectRef;
use crate::prelude::{IndexMap, index_map_new};
use crate::realm::Realm;
use crate::value::{CheapClone, JsString, JsValue};

/// Native accessor: `(realm, receiver, value_to_set)`.
///
/// With `None` the handler reads and returns the current value; with
/// `Some(v)` it writes `v` and returns the stored result.
pub type PropHandlerFn = fn(&mut Realm, &JsValue, Option<JsValue>) -> Result<JsValue, JsError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attributes {
    pub writable: bool,
    pub enumerable: bool,
    pub configurable: bool,
}

impl Attributes {
    pub const ALL: Attributes = Attributes {
        writable: true,
        enumerable: true,
        configurable: true,
    };

    pub const NONE: Attributes = Attributes {
        writable: false,
        enumerable: false,
        configurable: false,
    };

    /// Attributes of built-in methods: writable and configurable, hidden from enumeration
    pub const HIDDEN: Attributes = Attributes {
        writable: true,
        enumerable: false,
        configurable: true,
    };
}

impl Default for Attributes {
    fn default() -> Self {
        Attributes::ALL
    }
}

/// Direct alias of an array slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRef {
    pub array: ObjectRef,
    pub index: u32,
}

#[derive(Debug, Clone)]
pub enum Handler {
    Native(PropHandlerFn),
    /// Pending host operation produced by an external query
    External(ExternalRequest),
}

#[derive(Debug, Clone)]
pub enum PropertyKind {
    /// Ordinary data property
    Plain,
    /// Data property whose value is a template native function
    Method,
    /// Live alias of an array element; attributes are not consulted
    Reference(SlotRef),
    /// Computed property; reads and writes go through the handler
    Handler(Handler),
    /// Deleted entry kept in place
    Tombstone,
}

#[derive(Debug, Clone)]
pub struct Property {
    pub name: JsString,
    pub value: JsValue,
    pub kind: PropertyKind,
    pub attrs: Attributes,
}

impl Property {
    /// Writable, enumerable, configurable data property
    pub fn data(name: JsString, value: JsValue) -> Self {
        Self::with_attrs(name, value, Attributes::ALL)
    }

    pub fn with_attrs(name: JsString, value: JsValue, attrs: Attributes) -> Self {
        Self {
            name,
            value,
            kind: PropertyKind::Plain,
            attrs,
        }
    }

    pub fn method(name: JsString, function: ObjectRef) -> Self {
        Self {
            name,
            value: JsValue::Object(function),
            kind: PropertyKind::Method,
            attrs: Attributes::HIDDEN,
        }
    }

    pub fn handler(name: JsString, handler: Handler, writable: bool) -> Self {
        Self {
            name,
            value: JsValue::Undefined,
            kind: PropertyKind::Handler(handler),
            attrs: Attributes {
                writable,
                enumerable: false,
                configurable: false,
            },
        }
    }

    pub fn tombstone(name: JsString) -> Self {
        Self {
            name,
            value: JsValue::Undefined,
            kind: PropertyKind::Tombstone,
            attrs: Attributes::NONE,
        }
    }

    pub fn is_tombstone(&self) -> bool {
        matches!(self.kind, PropertyKind::Tombstone)
    }

    pub fn is_handler(&self) -> bool {
        matches!(self.kind, PropertyKind::Handler(_))
    }

    /// Turn this record into a tombstone in place
    pub fn erase(&mut self) {
        self.value = JsValue::Undefined;
        self.kind = PropertyKind::Tombstone;
        self.attrs = Attributes::NONE;
    }
}

/// Insertion-ordered map from key to property record.
///
/// Entries are never physically removed; deletion leaves a tombstone so
/// iteration order and shadowing of shared records stay stable.
#[derive(Debug, Clone)]
pub struct PropertyMap {
    entries: IndexMap<JsString, Property>,
}

impl Default for PropertyMap {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyMap {
    pub fn new() -> Self {
        Self {
            entries: index_map_new(),
        }
    }

    pub fn find(&self, key: &str) -> Option<&Property> {
        self.entries.get(key)
    }

    pub fn find_mut(&mut self, key: &str) -> Option<&mut Property> {
        self.entries.get_mut(key)
    }

    /// Insert a new record; the key must not be present yet.
    pub fn insert(&mut self, prop: Property) -> Result<(), JsError> {
        if self.entries.contains_key(prop.name.as_str()) {
            return Err(JsError::internal_error("property map insert failed"));
        }
        self.entries.insert(prop.name.cheap_clone(), prop);
        Ok(())
    }

    /// Insert or overwrite, keeping the position of an existing entry
    pub fn replace(&mut self, prop: Property) {
        self.entries.insert(prop.name.cheap_clone(), prop);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Has a non-tombstone entry
    pub fn contains_live(&self, key: &str) -> bool {
        self.find(key).is_some_and(|p| !p.is_tombstone())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.entries.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Property> {
        self.entries.values_mut()
    }

    /// Number of entries, tombstones included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Immutable template map shared by every object built from the same description
pub type SharedMap = Rc<PropertyMap>;
