//! Ordered key/value enumeration for `Object.keys`, `values`, `entries` and
//! `getOwnPropertyNames`.
//!
//! Order: array elements by index (holes skipped), string characters by
//! index, a synthetic `length` (only with `all`, for arrays, strings and
//! embedder functions), own map entries in insertion order, then shared map
//! entries (only with `all`).

use crate::error::JsError;
use crate::object::ObjectKind;
use crate::prelude::FxHashSet;
use crate::property::{Property, PropertyKind};
use crate::query::{FoundProperty, Location};
use crate::realm::Realm;
use crate::value::{CheapClone, JsString, JsValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumKind {
    Keys,
    Values,
    /// `[key, value]` pairs
    Both,
}

/// One enumerated entry before packing
enum Entry {
    Ready(JsString, JsValue),
    Stored(Property, Location),
}

impl Entry {
    fn name(&self) -> JsString {
        match self {
            Entry::Ready(name, _) => name.cheap_clone(),
            Entry::Stored(prop, _) => prop.name.cheap_clone(),
        }
    }
}

impl Realm {
    /// Enumerate `value`; `all` includes non-enumerable and shared properties
    pub fn enumerate(
        &mut self,
        value: &JsValue,
        kind: EnumKind,
        all: bool,
    ) -> Result<Vec<JsValue>, JsError> {
        let entries = self.collect_entries(value, all)?;
        let mut out = Vec::with_capacity(entries.len());

        for entry in entries {
            let (key, val) = match entry {
                Entry::Ready(key, val) => (key, val),
                Entry::Stored(property, location) => {
                    let key = property.name.cheap_clone();
                    if kind == EnumKind::Keys {
                        (key, JsValue::Undefined)
                    } else {
                        let val = self.read_found(value, FoundProperty { property, location })?;
                        (key, val)
                    }
                }
            };
            out.push(match kind {
                EnumKind::Keys => JsValue::String(key),
                EnumKind::Values => val,
                EnumKind::Both => {
                    let pair = self.alloc_array(vec![JsValue::String(key), val])?;
                    JsValue::Object(pair)
                }
            });
        }
        Ok(out)
    }

    fn collect_entries(&self, value: &JsValue, all: bool) -> Result<Vec<Entry>, JsError> {
        let mut entries = Vec::new();

        let r = match value {
            JsValue::String(s) => {
                push_chars(&mut entries, s);
                if all {
                    entries.push(length_entry(s.char_length() as u32));
                }
                return Ok(entries);
            }
            JsValue::Object(r) => *r,
            _ => return Ok(entries),
        };
        let obj = self.object(r)?;

        match &obj.kind {
            ObjectKind::Array(data) => {
                for (index, slot) in data.slots.iter().enumerate() {
                    if let Some(v) = slot {
                        entries.push(Entry::Ready(JsString::from(index.to_string()), v.clone()));
                    }
                }
                if all {
                    entries.push(length_entry(data.len()));
                }
            }
            ObjectKind::String(s) => {
                push_chars(&mut entries, s);
                if all {
                    entries.push(length_entry(s.char_length() as u32));
                }
            }
            ObjectKind::Function(data) if all && !data.is_native() => {
                entries.push(length_entry(data.arity()));
            }
            _ => {}
        }

        for prop in obj.own.iter() {
            if prop.is_tombstone() || !(all || prop.attrs.enumerable) {
                continue;
            }
            entries.push(Entry::Stored(prop.clone(), Location::Own(r)));
        }

        if all {
            let emitted: FxHashSet<JsString> = entries.iter().map(Entry::name).collect();
            for prop in obj.shared.iter() {
                if matches!(prop.kind, PropertyKind::Tombstone) || emitted.contains(&prop.name) {
                    continue;
                }
                entries.push(Entry::Stored(prop.clone(), Location::Shared(r)));
            }
        }

        Ok(entries)
    }
}

fn push_chars(entries: &mut Vec<Entry>, s: &JsString) {
    for (index, ch) in s.as_str().chars().enumerate() {
        entries.push(Entry::Ready(
            JsString::from(index.to_string()),
            JsValue::from(ch.to_string()),
        ));
    }
}

fn length_entry(len: u32) -> Entry {
    Entry::Ready(JsString::from("length"), JsValue::from(len))
}
