//! Constructors and accessors for the remaining prototype table entries.
//!
//! Only construction is provided here; regular expression and date behavior
//! lives outside the object model.

use crate::builtins::{SharedMapBuilder, arg, assign_own_data};
use crate::error::JsError;
use crate::object::{ArrayData, NativeFn, ObjectKind};
use crate::property::Attributes;
use crate::realm::{PrototypeIndex, Realm};
use crate::value::{JsString, JsValue};

use super::object::prototype_constructor;

/// Callable body of Function.prototype itself
pub fn function_prototype_call(
    _realm: &mut Realm,
    _this: JsValue,
    _args: &[JsValue],
) -> Result<JsValue, JsError> {
    Ok(JsValue::Undefined)
}

pub(crate) fn init_array_prototype(props: &mut SharedMapBuilder<'_>) -> Result<(), JsError> {
    props.handler("constructor", prototype_constructor, true)?;
    props.handler("length", array_length, true)?;
    Ok(())
}

pub(crate) fn init_string_prototype(props: &mut SharedMapBuilder<'_>) -> Result<(), JsError> {
    props.handler("constructor", prototype_constructor, true)?;
    props.handler("length", string_length, false)?;
    Ok(())
}

pub(crate) fn init_function_prototype(props: &mut SharedMapBuilder<'_>) -> Result<(), JsError> {
    props.handler("constructor", prototype_constructor, true)?;
    props.handler("length", function_length, false)?;
    props.handler("name", function_name, false)?;
    Ok(())
}

pub(crate) fn init_error_prototype(
    props: &mut SharedMapBuilder<'_>,
    idx: PrototypeIndex,
) -> Result<(), JsError> {
    props.handler("constructor", prototype_constructor, true)?;
    props.value("name", JsValue::from(idx.name()), Attributes::HIDDEN)?;
    props.value("message", JsValue::from(""), Attributes::HIDDEN)?;
    Ok(())
}

/// Native body and declared arity of the constructor at `idx`
pub(crate) fn constructor_fn(idx: PrototypeIndex) -> (NativeFn, u32) {
    match idx {
        PrototypeIndex::Object => (super::object::object_constructor, 1),
        PrototypeIndex::Array => (array_constructor, 1),
        PrototypeIndex::Boolean => (boolean_constructor, 1),
        PrototypeIndex::Number => (number_constructor, 1),
        PrototypeIndex::String => (string_constructor, 1),
        PrototypeIndex::Function => (function_constructor, 1),
        PrototypeIndex::RegExp => (regexp_constructor, 2),
        PrototypeIndex::Date => (date_constructor, 1),
        PrototypeIndex::Error => (error_constructor, 1),
        PrototypeIndex::EvalError => (eval_error_constructor, 1),
        PrototypeIndex::InternalError => (internal_error_constructor, 1),
        PrototypeIndex::RangeError => (range_error_constructor, 1),
        PrototypeIndex::ReferenceError => (reference_error_constructor, 1),
        PrototypeIndex::SyntaxError => (syntax_error_constructor, 1),
        PrototypeIndex::TypeError => (type_error_constructor, 1),
        PrototypeIndex::UriError => (uri_error_constructor, 1),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Accessors
// ═══════════════════════════════════════════════════════════════════════════════

/// Array.prototype.length: element count; assignment truncates or extends
pub fn array_length(realm: &mut Realm, receiver: &JsValue, value: Option<JsValue>) -> Result<JsValue, JsError> {
    let array = match receiver {
        JsValue::Object(r) if realm.object(*r)?.is_array() => Some(*r),
        _ => None,
    };
    match (array, value) {
        (Some(r), Some(value)) => realm.set_array_length(r, &value),
        (Some(r), None) => Ok(JsValue::from(
            realm.object(r)?.as_array().map_or(0, ArrayData::len),
        )),
        (None, Some(value)) => assign_own_data(realm, receiver, "length", value),
        (None, None) => Ok(JsValue::from(0)),
    }
}

/// String.prototype.length: length in codepoints
pub fn string_length(realm: &mut Realm, receiver: &JsValue, _value: Option<JsValue>) -> Result<JsValue, JsError> {
    let len = match receiver {
        JsValue::String(s) => s.char_length(),
        JsValue::Object(r) => realm.object(*r)?.boxed_string().map_or(0, JsString::char_length),
        _ => 0,
    };
    Ok(JsValue::Number(len as f64))
}

pub fn function_length(realm: &mut Realm, receiver: &JsValue, _value: Option<JsValue>) -> Result<JsValue, JsError> {
    let arity = match receiver {
        JsValue::Object(r) => realm.object(*r)?.as_function().map_or(0, |f| f.arity()),
        _ => 0,
    };
    Ok(JsValue::from(arity))
}

pub fn function_name(realm: &mut Realm, receiver: &JsValue, _value: Option<JsValue>) -> Result<JsValue, JsError> {
    let name = match receiver {
        JsValue::Object(r) => realm.object(*r)?.as_function().map(|f| f.name().clone()),
        _ => None,
    };
    Ok(name.map_or_else(|| JsValue::from(""), JsValue::String))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constructors
// ═══════════════════════════════════════════════════════════════════════════════

/// Array(len) makes `len` holes; any other argument list becomes the elements
pub fn array_constructor(realm: &mut Realm, _this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
    if let [JsValue::Number(n)] = args {
        let len = realm.checked_array_length(*n)?;
        let array = realm.alloc_array(Vec::new())?;
        if let Some(data) = realm.object_mut(array)?.as_array_mut() {
            data.slots.resize(len as usize, None);
        }
        return Ok(JsValue::Object(array));
    }
    Ok(JsValue::Object(realm.alloc_array(args.to_vec())?))
}

pub fn boolean_constructor(_realm: &mut Realm, _this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(JsValue::Boolean(arg(args, 0).to_boolean()))
}

pub fn number_constructor(realm: &mut Realm, _this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
    match args.first() {
        Some(value) => Ok(JsValue::Number(realm.to_number(value)?)),
        None => Ok(JsValue::Number(0.0)),
    }
}

pub fn string_constructor(realm: &mut Realm, _this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
    match args.first() {
        Some(value) => Ok(JsValue::String(realm.to_string(value)?)),
        None => Ok(JsValue::from("")),
    }
}

pub fn function_constructor(_realm: &mut Realm, _this: JsValue, _args: &[JsValue]) -> Result<JsValue, JsError> {
    Err(JsError::type_error("Function constructor is not supported"))
}

pub fn regexp_constructor(realm: &mut Realm, _this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
    let source = match args.first() {
        Some(JsValue::Undefined) | None => JsString::from("(?:)"),
        Some(value) => realm.to_string(value)?,
    };
    let flags = match args.get(1) {
        Some(JsValue::Undefined) | None => JsString::from(""),
        Some(value) => realm.to_string(value)?,
    };
    alloc_instance(realm, ObjectKind::RegExp { source, flags }, PrototypeIndex::RegExp)
}

pub fn date_constructor(realm: &mut Realm, _this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
    let time = match args.first() {
        Some(value) => realm.to_number(value)?,
        None => f64::NAN,
    };
    alloc_instance(realm, ObjectKind::Date(time), PrototypeIndex::Date)
}

fn alloc_instance(realm: &mut Realm, kind: ObjectKind, idx: PrototypeIndex) -> Result<JsValue, JsError> {
    let proto = realm.prototype(idx);
    let object = realm.alloc_object_with_proto(Some(proto))?;
    realm.object_mut(object)?.kind = kind;
    Ok(JsValue::Object(object))
}

fn construct_error(realm: &mut Realm, idx: PrototypeIndex, args: &[JsValue]) -> Result<JsValue, JsError> {
    let kind = idx
        .error_kind()
        .ok_or_else(|| JsError::internal_error("not an error constructor"))?;
    let message = match args.first() {
        Some(JsValue::Undefined) | None => None,
        Some(value) => Some(realm.to_string(value)?),
    };
    Ok(JsValue::Object(realm.alloc_error(kind, message)?))
}

macro_rules! error_constructor {
    ($name:ident, $idx:ident) => {
        pub fn $name(realm: &mut Realm, _this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
            construct_error(realm, PrototypeIndex::$idx, args)
        }
    };
}

error_constructor!(error_constructor, Error);
error_constructor!(eval_error_constructor, EvalError);
error_constructor!(internal_error_constructor, InternalError);
error_constructor!(range_error_constructor, RangeError);
error_constructor!(reference_error_constructor, ReferenceError);
error_constructor!(syntax_error_constructor, SyntaxError);
error_constructor!(type_error_constructor, TypeError);
error_constructor!(uri_error_constructor, UriError);
