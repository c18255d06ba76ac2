//! Object records stored in the heap

use std::fmt;
use std::rc::Rc;

use crate::error::JsError;
use crate::heap::{ObjectRef, Traceable};
use crate::property::{PropertyKind, PropertyMap, SharedMap};
use crate::realm::Realm;
use crate::value::{JsString, JsValue};

/// Native function signature: `(realm, this, args)`.
pub type NativeFn = fn(&mut Realm, JsValue, &[JsValue]) -> Result<JsValue, JsError>;

/// Embedder-implemented function body
pub type ClosureFn = Rc<dyn Fn(&mut Realm, JsValue, &[JsValue]) -> Result<JsValue, JsError>>;

#[derive(Clone)]
pub enum FunctionData {
    Native {
        name: JsString,
        func: NativeFn,
        arity: u32,
    },
    Closure {
        name: JsString,
        arity: u32,
        body: ClosureFn,
    },
}

impl FunctionData {
    pub fn name(&self) -> &JsString {
        match self {
            FunctionData::Native { name, .. } | FunctionData::Closure { name, .. } => name,
        }
    }

    pub fn arity(&self) -> u32 {
        match self {
            FunctionData::Native { arity, .. } | FunctionData::Closure { arity, .. } => *arity,
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, FunctionData::Native { .. })
    }
}

impl fmt::Debug for FunctionData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionData::Native { name, arity, .. } => {
                write!(f, "NativeFunction({}, {})", name, arity)
            }
            FunctionData::Closure { name, arity, .. } => write!(f, "Closure({}, {})", name, arity),
        }
    }
}

/// Array elements; `None` is a hole.
#[derive(Debug, Clone, Default)]
pub struct ArrayData {
    pub slots: Vec<Option<JsValue>>,
}

impl ArrayData {
    pub fn from_values(values: Vec<JsValue>) -> Self {
        Self {
            slots: values.into_iter().map(Some).collect(),
        }
    }

    pub fn len(&self) -> u32 {
        self.slots.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Element at `index`, `None` for holes and out-of-range indexes
    pub fn get(&self, index: u32) -> Option<&JsValue> {
        self.slots.get(index as usize).and_then(Option::as_ref)
    }

    /// Grow with holes so that `index` is in range
    pub fn expand_to(&mut self, index: u32) {
        let needed = index as usize + 1;
        if self.slots.len() < needed {
            self.slots.resize(needed, None);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Error,
    EvalError,
    InternalError,
    RangeError,
    ReferenceError,
    SyntaxError,
    TypeError,
    UriError,
}

impl ErrorKind {
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::Error => "Error",
            ErrorKind::EvalError => "EvalError",
            ErrorKind::InternalError => "InternalError",
            ErrorKind::RangeError => "RangeError",
            ErrorKind::ReferenceError => "ReferenceError",
            ErrorKind::SyntaxError => "SyntaxError",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::UriError => "URIError",
        }
    }
}

#[derive(Debug, Clone)]
pub enum ObjectKind {
    Ordinary,
    Array(ArrayData),
    Boolean(bool),
    Number(f64),
    String(JsString),
    Function(FunctionData),
    RegExp { source: JsString, flags: JsString },
    Date(f64),
    Error(ErrorKind),
}

#[derive(Debug, Clone)]
pub struct JsObject {
    pub own: PropertyMap,
    pub shared: SharedMap,
    pub prototype: Option<ObjectRef>,
    pub extensible: bool,
    /// Function record referenced from a shared map; cloned before any use
    pub template: bool,
    pub kind: ObjectKind,
}

impl JsObject {
    pub fn new(kind: ObjectKind, prototype: Option<ObjectRef>, shared: SharedMap) -> Self {
        Self {
            own: PropertyMap::new(),
            shared,
            prototype,
            extensible: true,
            template: false,
            kind,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayData> {
        match &self.kind {
            ObjectKind::Array(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut ArrayData> {
        match &mut self.kind {
            ObjectKind::Array(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionData> {
        match &self.kind {
            ObjectKind::Function(data) => Some(data),
            _ => None,
        }
    }

    /// Primitive string of a boxed String object
    pub fn boxed_string(&self) -> Option<&JsString> {
        match &self.kind {
            ObjectKind::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, ObjectKind::Array(_))
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, ObjectKind::Function(_))
    }
}

fn trace_value(value: &JsValue, visit: &mut dyn FnMut(ObjectRef)) {
    if let JsValue::Object(r) = value {
        visit(*r);
    }
}

fn trace_map(map: &PropertyMap, visit: &mut dyn FnMut(ObjectRef)) {
    for prop in map.iter() {
        trace_value(&prop.value, visit);
        if let PropertyKind::Reference(slot) = &prop.kind {
            visit(slot.array);
        }
    }
}

impl Traceable for JsObject {
    fn trace(&self, visit: &mut dyn FnMut(ObjectRef)) {
        if let Some(proto) = self.prototype {
            visit(proto);
        }
        trace_map(&self.own, visit);
        trace_map(&self.shared, visit);
        if let ObjectKind::Array(data) = &self.kind {
            for value in data.slots.iter().flatten() {
                trace_value(value, visit);
            }
        }
    }
}
