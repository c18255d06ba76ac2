//! JavaScript value representation
//!
//! The core JsValue type and the predicates the property engine dispatches on.

use std::fmt;
use std::rc::Rc;

use crate::external::ExternalValue;
use crate::heap::ObjectRef;

/// Largest valid array index (2^32 - 2).
pub const MAX_ARRAY_INDEX: u32 = u32::MAX - 1;

/// Trait for types that have cheap (O(1), reference-counted) clones.
///
/// This makes it explicit when a clone is cheap (just incrementing a reference
/// count or copying a handle) vs when it might copy data.
pub trait CheapClone: Clone {
    /// Create a cheap clone of this value.
    fn cheap_clone(&self) -> Self {
        self.clone()
    }
}

impl<T: ?Sized> CheapClone for Rc<T> {}

impl CheapClone for ObjectRef {}

/// A JavaScript value
///
/// Composite kinds (arrays, functions, boxed primitives, regexps, dates,
/// errors) are all `Object` handles; the record's `ObjectKind` tells them
/// apart. Host values are `External` and are not objects.
#[derive(Clone, Default)]
pub enum JsValue {
    #[default]
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(JsString),
    Object(ObjectRef),
    External(ExternalValue),
}

// Every payload is either Copy or an Rc
impl CheapClone for JsValue {}

impl JsValue {
    /// Check if this value is null or undefined
    pub fn is_null_or_undefined(&self) -> bool {
        matches!(self, JsValue::Null | JsValue::Undefined)
    }

    /// Undefined, null, booleans, numbers and strings
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            JsValue::Undefined
                | JsValue::Null
                | JsValue::Boolean(_)
                | JsValue::Number(_)
                | JsValue::String(_)
        )
    }

    pub fn is_object(&self) -> bool {
        matches!(self, JsValue::Object(_))
    }

    pub fn is_external(&self) -> bool {
        matches!(self, JsValue::External(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, JsValue::String(_))
    }

    pub fn as_object(&self) -> Option<ObjectRef> {
        match self {
            JsValue::Object(obj) => Some(*obj),
            _ => None,
        }
    }

    /// Convert to boolean (ToBoolean)
    pub fn to_boolean(&self) -> bool {
        match self {
            JsValue::Undefined | JsValue::Null => false,
            JsValue::Boolean(b) => *b,
            JsValue::Number(n) => *n != 0.0 && !n.is_nan(),
            JsValue::String(s) => !s.is_empty(),
            JsValue::Object(_) | JsValue::External(_) => true,
        }
    }

    /// Convert a primitive to number (ToNumber). Objects need ToPrimitive first.
    pub fn to_number(&self) -> f64 {
        match self {
            JsValue::Undefined => f64::NAN,
            JsValue::Null => 0.0,
            JsValue::Boolean(true) => 1.0,
            JsValue::Boolean(false) => 0.0,
            JsValue::Number(n) => *n,
            JsValue::String(s) => {
                let trimmed = s.as_str().trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse::<f64>().unwrap_or(f64::NAN)
                }
            }
            JsValue::Object(_) | JsValue::External(_) => f64::NAN,
        }
    }

    /// The string form of a property key, if the value may be used as one
    /// without coercion. Objects and externals need ToPrimitive first.
    pub fn to_property_key(&self) -> Option<JsString> {
        match self {
            JsValue::Undefined => Some(JsString::from("undefined")),
            JsValue::Null => Some(JsString::from("null")),
            JsValue::Boolean(true) => Some(JsString::from("true")),
            JsValue::Boolean(false) => Some(JsString::from("false")),
            JsValue::Number(n) => Some(number_to_js_string(*n)),
            JsValue::String(s) => Some(s.cheap_clone()),
            JsValue::Object(_) | JsValue::External(_) => None,
        }
    }

    /// Array index denoted by this key, if any.
    ///
    /// Null, undefined and booleans are never indexes; strings are indexes only
    /// in their canonical decimal form ("01" and "+1" are ordinary keys).
    pub fn to_array_index(&self) -> Option<u32> {
        match self {
            JsValue::Number(n) => {
                if n.fract() == 0.0 && *n >= 0.0 && *n <= MAX_ARRAY_INDEX as f64 {
                    Some(*n as u32)
                } else {
                    None
                }
            }
            JsValue::String(s) => parse_array_index(s.as_str()),
            _ => None,
        }
    }

    /// Strict equality (===)
    pub fn strict_equals(&self, other: &JsValue) -> bool {
        match (self, other) {
            (JsValue::Undefined, JsValue::Undefined) => true,
            (JsValue::Null, JsValue::Null) => true,
            (JsValue::Boolean(a), JsValue::Boolean(b)) => a == b,
            // NaN !== NaN, 0 === -0
            (JsValue::Number(a), JsValue::Number(b)) => a == b,
            (JsValue::String(a), JsValue::String(b)) => a == b,
            (JsValue::Object(a), JsValue::Object(b)) => a == b,
            (JsValue::External(a), JsValue::External(b)) => a == b,
            _ => false,
        }
    }

    /// Name used in "cannot convert X argument" style messages
    pub fn type_name(&self) -> &'static str {
        match self {
            JsValue::Undefined => "undefined",
            JsValue::Null => "null",
            JsValue::Boolean(_) => "boolean",
            JsValue::Number(_) => "number",
            JsValue::String(_) => "string",
            JsValue::Object(_) => "object",
            JsValue::External(_) => "external",
        }
    }
}

impl fmt::Debug for JsValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsValue::Undefined => write!(f, "undefined"),
            JsValue::Null => write!(f, "null"),
            JsValue::Boolean(b) => write!(f, "{}", b),
            JsValue::Number(n) => write!(f, "{}", n),
            JsValue::String(s) => write!(f, "\"{}\"", s.as_str()),
            JsValue::Object(obj) => write!(f, "[object #{}]", obj.index()),
            JsValue::External(ext) => write!(f, "[external {}:{}]", ext.class.index(), ext.index),
        }
    }
}

impl PartialEq for JsValue {
    fn eq(&self, other: &Self) -> bool {
        self.strict_equals(other)
    }
}

// Conversions from Rust types

impl From<bool> for JsValue {
    fn from(b: bool) -> Self {
        JsValue::Boolean(b)
    }
}

impl From<f64> for JsValue {
    fn from(n: f64) -> Self {
        JsValue::Number(n)
    }
}

impl From<i32> for JsValue {
    fn from(n: i32) -> Self {
        JsValue::Number(n as f64)
    }
}

impl From<u32> for JsValue {
    fn from(n: u32) -> Self {
        JsValue::Number(n as f64)
    }
}

impl From<&str> for JsValue {
    fn from(s: &str) -> Self {
        JsValue::String(JsString::from(s))
    }
}

impl From<String> for JsValue {
    fn from(s: String) -> Self {
        JsValue::String(JsString::from(s))
    }
}

impl From<JsString> for JsValue {
    fn from(s: JsString) -> Self {
        JsValue::String(s)
    }
}

impl From<ObjectRef> for JsValue {
    fn from(obj: ObjectRef) -> Self {
        JsValue::Object(obj)
    }
}

/// Value kind tag, one per kind the engine distinguishes.
///
/// Resolved by `Realm::value_kind`, since composite kinds live in the heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Undefined,
    Null,
    Boolean,
    Number,
    String,
    External,
    Object,
    Array,
    ObjectBoolean,
    ObjectNumber,
    ObjectString,
    Function,
    RegExp,
    Date,
    Error,
}

impl ValueKind {
    /// Class tag reported by Object.prototype.toString
    pub fn class_name(self) -> &'static str {
        match self {
            ValueKind::Undefined => "Undefined",
            ValueKind::Null => "Null",
            ValueKind::Boolean | ValueKind::ObjectBoolean => "Boolean",
            ValueKind::Number | ValueKind::ObjectNumber => "Number",
            ValueKind::String | ValueKind::ObjectString => "String",
            ValueKind::External => "External",
            ValueKind::Object => "Object",
            ValueKind::Array => "Array",
            ValueKind::Function => "Function",
            ValueKind::RegExp => "RegExp",
            ValueKind::Date => "Date",
            ValueKind::Error => "Error",
        }
    }
}

/// Reference-counted string; equality and hashing are byte-exact.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JsString(Rc<str>);

impl CheapClone for JsString {}

impl JsString {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Length in codepoints
    pub fn char_length(&self) -> usize {
        crate::string::char_length(&self.0)
    }
}

impl AsRef<str> for JsString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for JsString {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for JsString {
    fn eq(&self, other: &str) -> bool {
        self.0.as_ref() == other
    }
}

impl PartialEq<&str> for JsString {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_ref() == *other
    }
}

impl From<&str> for JsString {
    fn from(s: &str) -> Self {
        JsString(s.into())
    }
}

impl From<String> for JsString {
    fn from(s: String) -> Self {
        JsString(s.into())
    }
}

impl fmt::Debug for JsString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0)
    }
}

impl fmt::Display for JsString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number to string conversion for keys and ToString
pub fn number_to_js_string(n: f64) -> JsString {
    if n.is_nan() {
        JsString::from("NaN")
    } else if n.is_infinite() {
        if n > 0.0 {
            JsString::from("Infinity")
        } else {
            JsString::from("-Infinity")
        }
    } else if n == 0.0 {
        // Covers -0 as well
        JsString::from("0")
    } else {
        JsString::from(n.to_string())
    }
}

/// Parse a canonical array index: decimal digits, no sign, no leading zeros.
pub fn parse_array_index(s: &str) -> Option<u32> {
    let bytes = s.as_bytes();
    let first = *bytes.first()?;
    if !first.is_ascii_digit() || (first == b'0' && bytes.len() > 1) {
        return None;
    }
    if !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let n: u64 = s.parse().ok()?;
    if n <= MAX_ARRAY_INDEX as u64 {
        Some(n as u32)
    } else {
        None
    }
}
