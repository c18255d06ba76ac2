//! Object built-in methods

use crate::builtins::{SharedMapBuilder, arg, assign_own_data, materialize_own};
use crate::enumerate::EnumKind;
use crate::error::JsError;
use crate::heap::ObjectRef;
use crate::property::Attributes;
use crate::realm::{PrototypeIndex, Realm};
use crate::value::{CheapClone, JsValue};

/// Object.prototype: `__proto__` and `constructor` accessors plus the methods
pub(crate) fn init_object_prototype(props: &mut SharedMapBuilder<'_>) -> Result<(), JsError> {
    props.handler("__proto__", object_prototype_proto, true)?;
    props.handler("constructor", prototype_constructor, true)?;

    props.method("valueOf", object_value_of, 0)?;
    props.method("toString", object_to_string, 0)?;
    props.method("hasOwnProperty", object_has_own_property, 1)?;
    props.method("propertyIsEnumerable", object_property_is_enumerable, 1)?;
    props.method("isPrototypeOf", object_is_prototype_of, 1)?;
    Ok(())
}

/// Object constructor statics
pub(crate) fn init_object_constructor(props: &mut SharedMapBuilder<'_>) -> Result<(), JsError> {
    props.method("create", object_create, 2)?;

    // Property enumeration
    props.method("keys", object_keys, 1)?;
    props.method("values", object_values, 1)?;
    props.method("entries", object_entries, 1)?;

    // Property descriptors
    props.method("defineProperty", object_define_property, 3)?;
    props.method("defineProperties", object_define_properties, 2)?;
    props.method("getOwnPropertyDescriptor", object_get_own_property_descriptor, 2)?;
    props.method("getOwnPropertyDescriptors", object_get_own_property_descriptors, 1)?;
    props.method("getOwnPropertyNames", object_get_own_property_names, 1)?;
    props.method("getPrototypeOf", object_get_prototype_of, 1)?;

    // Freezing/sealing/extensibility
    props.method("freeze", object_freeze, 1)?;
    props.method("isFrozen", object_is_frozen, 1)?;
    props.method("seal", object_seal, 1)?;
    props.method("isSealed", object_is_sealed, 1)?;
    props.method("preventExtensions", object_prevent_extensions, 1)?;
    props.method("isExtensible", object_is_extensible, 1)?;
    Ok(())
}

fn cannot_convert(value: &JsValue) -> JsError {
    JsError::type_error(format!(
        "cannot convert {} argument to object",
        value.type_name()
    ))
}

/// Argument that must not be null or undefined
fn object_coercible(args: &[JsValue]) -> Result<JsValue, JsError> {
    let value = arg(args, 0);
    if value.is_null_or_undefined() {
        return Err(cannot_convert(&value));
    }
    Ok(value)
}

/// Argument that must be an object
fn object_arg(args: &[JsValue]) -> Result<ObjectRef, JsError> {
    let value = arg(args, 0);
    value.as_object().ok_or_else(|| cannot_convert(&value))
}

fn array_value(realm: &mut Realm, values: Vec<JsValue>) -> Result<JsValue, JsError> {
    Ok(JsValue::Object(realm.alloc_array(values)?))
}

/// Object(value): a new object for null/undefined, a wrapper for primitives,
/// the argument itself otherwise
pub fn object_constructor(realm: &mut Realm, _this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
    let value = arg(args, 0);
    match value {
        JsValue::Undefined | JsValue::Null => Ok(JsValue::Object(realm.alloc_object()?)),
        JsValue::Boolean(_) | JsValue::Number(_) | JsValue::String(_) => {
            Ok(JsValue::Object(realm.alloc_boxed(&value)?))
        }
        JsValue::Object(_) | JsValue::External(_) => Ok(value),
    }
}

pub fn object_create(realm: &mut Realm, _this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
    let proto = match arg(args, 0) {
        JsValue::Object(r) => Some(r),
        JsValue::Null => None,
        other => {
            return Err(JsError::type_error(format!(
                "prototype may only be an object or null: {}",
                other.type_name()
            )));
        }
    };
    let object = realm.alloc_object_with_proto(proto)?;

    let properties = arg(args, 1);
    if !matches!(properties, JsValue::Undefined) {
        realm.define_properties(object, &properties)?;
    }
    Ok(JsValue::Object(object))
}

pub fn object_keys(realm: &mut Realm, _this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
    let value = object_coercible(args)?;
    let keys = realm.enumerate(&value, EnumKind::Keys, false)?;
    array_value(realm, keys)
}

pub fn object_values(realm: &mut Realm, _this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
    let value = object_coercible(args)?;
    let values = realm.enumerate(&value, EnumKind::Values, false)?;
    array_value(realm, values)
}

pub fn object_entries(realm: &mut Realm, _this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
    let value = object_coercible(args)?;
    let entries = realm.enumerate(&value, EnumKind::Both, false)?;
    array_value(realm, entries)
}

pub fn object_define_property(
    realm: &mut Realm,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let object = object_arg(args)?;
    let desc = realm.to_property_descriptor(&arg(args, 2))?;
    realm.define_property(object, &arg(args, 1), &desc)?;
    Ok(JsValue::Object(object))
}

pub fn object_define_properties(
    realm: &mut Realm,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let object = object_arg(args)?;
    realm.define_properties(object, &arg(args, 1))?;
    Ok(JsValue::Object(object))
}

pub fn object_get_own_property_descriptor(
    realm: &mut Realm,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let value = object_coercible(args)?;
    realm.get_own_property_descriptor(&value, &arg(args, 1))
}

pub fn object_get_own_property_descriptors(
    realm: &mut Realm,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let value = object_coercible(args)?;
    realm.get_own_property_descriptors(&value)
}

pub fn object_get_own_property_names(
    realm: &mut Realm,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let value = object_coercible(args)?;
    let names = realm.enumerate(&value, EnumKind::Keys, true)?;
    array_value(realm, names)
}

pub fn object_get_prototype_of(
    realm: &mut Realm,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let value = object_coercible(args)?;
    realm.prototype_of(&value)
}

pub fn object_freeze(realm: &mut Realm, _this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
    let value = arg(args, 0);
    realm.freeze(&value)?;
    Ok(value)
}

pub fn object_is_frozen(realm: &mut Realm, _this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(JsValue::Boolean(realm.is_frozen(&arg(args, 0))?))
}

pub fn object_seal(realm: &mut Realm, _this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
    let value = arg(args, 0);
    realm.seal(&value)?;
    Ok(value)
}

pub fn object_is_sealed(realm: &mut Realm, _this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(JsValue::Boolean(realm.is_sealed(&arg(args, 0))?))
}

pub fn object_prevent_extensions(
    realm: &mut Realm,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    let value = arg(args, 0);
    realm.prevent_extensions(&value)?;
    Ok(value)
}

pub fn object_is_extensible(
    realm: &mut Realm,
    _this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    Ok(JsValue::Boolean(realm.is_extensible(&arg(args, 0))?))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Object.prototype
// ═══════════════════════════════════════════════════════════════════════════════

pub fn object_value_of(_realm: &mut Realm, this: JsValue, _args: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(this)
}

pub fn object_to_string(realm: &mut Realm, this: JsValue, _args: &[JsValue]) -> Result<JsValue, JsError> {
    let kind = realm.value_kind(&this)?;
    Ok(JsValue::from(format!("[object {}]", kind.class_name())))
}

fn this_coercible(this: &JsValue, method: &str) -> Result<(), JsError> {
    if this.is_null_or_undefined() {
        return Err(JsError::type_error(format!(
            "Object.prototype.{} called on {}",
            method,
            this.type_name()
        )));
    }
    Ok(())
}

pub fn object_has_own_property(
    realm: &mut Realm,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    this_coercible(&this, "hasOwnProperty")?;
    let found = realm.own_property(&this, &arg(args, 0))?;
    Ok(JsValue::Boolean(found.is_some()))
}

pub fn object_property_is_enumerable(
    realm: &mut Realm,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    this_coercible(&this, "propertyIsEnumerable")?;
    let found = realm.own_property(&this, &arg(args, 0))?;
    Ok(JsValue::Boolean(
        found.is_some_and(|f| f.property.attrs.enumerable),
    ))
}

pub fn object_is_prototype_of(
    realm: &mut Realm,
    this: JsValue,
    args: &[JsValue],
) -> Result<JsValue, JsError> {
    this_coercible(&this, "isPrototypeOf")?;
    let Some(proto) = this.as_object() else {
        return Ok(JsValue::Boolean(false));
    };
    Ok(JsValue::Boolean(realm.is_prototype_of(proto, &arg(args, 0))?))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Accessors
// ═══════════════════════════════════════════════════════════════════════════════

/// `__proto__`: reads the prototype; writes accept objects or null and reject cycles
pub fn object_prototype_proto(
    realm: &mut Realm,
    receiver: &JsValue,
    value: Option<JsValue>,
) -> Result<JsValue, JsError> {
    let Some(value) = value else {
        return realm.prototype_of(receiver);
    };
    let Some(object) = receiver.as_object() else {
        return Ok(receiver.clone());
    };
    let proto = match value {
        JsValue::Object(r) => Some(r),
        JsValue::Null => None,
        _ => return Ok(JsValue::Undefined),
    };
    if !realm.set_prototype_of(object, proto)? {
        return Err(JsError::type_error("Cyclic __proto__ value"));
    }
    Ok(JsValue::Undefined)
}

/// `constructor` on prototypes: materialized on first read in the own map of
/// the nearest table prototype. Assignment stores an own property on the receiver.
pub fn prototype_constructor(
    realm: &mut Realm,
    receiver: &JsValue,
    value: Option<JsValue>,
) -> Result<JsValue, JsError> {
    if let Some(value) = value {
        return assign_own_data(realm, receiver, "constructor", value);
    }

    let idx = match receiver {
        JsValue::Object(r) => {
            let mut level = Some(*r);
            let mut found = None;
            while let Some(current) = level {
                if let Some(idx) = realm.prototype_index_of(current) {
                    found = Some(idx);
                    break;
                }
                level = realm.object(current)?.prototype;
            }
            found
        }
        other => PrototypeIndex::of_primitive(other),
    };
    let Some(idx) = idx else {
        return Ok(JsValue::Undefined);
    };

    let holder = JsValue::Object(realm.prototype(idx));
    let constructor = JsValue::Object(realm.constructor(idx));
    materialize_own(realm, &holder, "constructor", constructor.cheap_clone(), Attributes::HIDDEN)
}

/// `prototype` on constructors: materialized on first read in the constructor's own map
pub fn constructor_prototype(
    realm: &mut Realm,
    receiver: &JsValue,
    _value: Option<JsValue>,
) -> Result<JsValue, JsError> {
    let Some(idx) = receiver.as_object().and_then(|r| realm.constructor_index_of(r)) else {
        return Ok(JsValue::Undefined);
    };
    let proto = JsValue::Object(realm.prototype(idx));
    materialize_own(realm, receiver, "prototype", proto, Attributes::NONE)
}
