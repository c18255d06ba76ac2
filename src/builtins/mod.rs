//! Built-in prototypes and constructors
//!
//! Every entry of the prototype table gets a shared property map on its
//! prototype object and a constructor function carrying `name`, `length` and
//! a lazily materializing `prototype`.

pub mod intrinsics;
pub mod object;

use std::rc::Rc;

use crate::error::JsError;
use crate::heap::ObjectRef;
use crate::object::NativeFn;
use crate::property::{Attributes, Handler, PropHandlerFn, Property, PropertyKind, PropertyMap};
use crate::realm::{PrototypeIndex, Realm};
use crate::value::{JsString, JsValue};

/// Attributes of a constructor's `name` and `length`
const FUNCTION_META: Attributes = Attributes {
    writable: false,
    enumerable: false,
    configurable: true,
};

/// Collects the entries of a shared map in declaration order
pub(crate) struct SharedMapBuilder<'r> {
    realm: &'r mut Realm,
    map: PropertyMap,
}

impl<'r> SharedMapBuilder<'r> {
    pub fn new(realm: &'r mut Realm) -> Self {
        Self {
            realm,
            map: PropertyMap::new(),
        }
    }

    pub fn method(&mut self, name: &str, func: NativeFn, arity: u32) -> Result<(), JsError> {
        let function = self.realm.alloc_template_function(name, func, arity)?;
        self.map.insert(Property::method(JsString::from(name), function))
    }

    pub fn handler(&mut self, name: &str, func: PropHandlerFn, writable: bool) -> Result<(), JsError> {
        self.map.insert(Property::handler(
            JsString::from(name),
            Handler::Native(func),
            writable,
        ))
    }

    pub fn value(&mut self, name: &str, value: JsValue, attrs: Attributes) -> Result<(), JsError> {
        self.map
            .insert(Property::with_attrs(JsString::from(name), value, attrs))
    }

    pub fn build(self) -> PropertyMap {
        self.map
    }
}

/// Shared map of the prototype object at `idx`
pub(crate) fn prototype_properties(realm: &mut Realm, idx: PrototypeIndex) -> Result<PropertyMap, JsError> {
    let mut props = SharedMapBuilder::new(realm);
    match idx {
        PrototypeIndex::Object => object::init_object_prototype(&mut props)?,
        PrototypeIndex::Array => intrinsics::init_array_prototype(&mut props)?,
        PrototypeIndex::String => intrinsics::init_string_prototype(&mut props)?,
        PrototypeIndex::Function => intrinsics::init_function_prototype(&mut props)?,
        _ if idx.error_kind().is_some() => intrinsics::init_error_prototype(&mut props, idx)?,
        _ => props.handler("constructor", object::prototype_constructor, true)?,
    }
    Ok(props.build())
}

/// Constructor function for the table entry at `idx`
pub(crate) fn create_constructor(realm: &mut Realm, idx: PrototypeIndex) -> Result<ObjectRef, JsError> {
    let (func, arity) = intrinsics::constructor_fn(idx);

    let mut props = SharedMapBuilder::new(realm);
    props.value("name", JsValue::from(idx.name()), FUNCTION_META)?;
    props.value("length", JsValue::from(arity), FUNCTION_META)?;
    props.handler("prototype", object::constructor_prototype, false)?;
    if idx == PrototypeIndex::Object {
        object::init_object_constructor(&mut props)?;
    }
    let shared = props.build();

    let constructor = realm.alloc_native_function(idx.name(), func, arity)?;
    realm.object_mut(constructor)?.shared = Rc::new(shared);
    Ok(constructor)
}

/// Argument at `index`, undefined when missing
pub(crate) fn arg(args: &[JsValue], index: usize) -> JsValue {
    args.get(index).cloned().unwrap_or_default()
}

/// Assignment through an accessor that stores a plain own property on `receiver`.
///
/// An existing own record keeps its attributes and must be writable.
pub(crate) fn assign_own_data(
    realm: &mut Realm,
    receiver: &JsValue,
    name: &str,
    value: JsValue,
) -> Result<JsValue, JsError> {
    let JsValue::Object(r) = receiver else {
        return Ok(value);
    };
    let obj = realm.object_mut(*r)?;
    if let Some(prop) = obj.own.find_mut(name).filter(|prop| !prop.is_tombstone()) {
        if !prop.attrs.writable {
            return Err(JsError::type_error(format!(
                "Cannot assign to read-only property \"{}\"",
                name
            )));
        }
        prop.value = value.clone();
        prop.kind = PropertyKind::Plain;
        return Ok(value);
    }
    if !obj.extensible {
        return Err(JsError::type_error(format!(
            "Cannot add property \"{}\", object is not extensible",
            name
        )));
    }
    obj.own
        .replace(Property::data(JsString::from(name), value.clone()));
    Ok(value)
}

/// Store the value of a lazily created built-in property in `holder`'s own map
pub(crate) fn materialize_own(
    realm: &mut Realm,
    holder: &JsValue,
    name: &str,
    value: JsValue,
    attrs: Attributes,
) -> Result<JsValue, JsError> {
    let JsValue::Object(r) = holder else {
        return Ok(value);
    };
    let own = &mut realm.object_mut(*r)?.own;
    if let Some(existing) = own.find(name).filter(|prop| !prop.is_tombstone()) {
        return Ok(existing.value.clone());
    }
    own.replace(Property::with_attrs(JsString::from(name), value.clone(), attrs));
    Ok(value)
}
