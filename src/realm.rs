//! Engine context.
//!
//! A `Realm` owns the object heap, the intrinsic prototype and constructor
//! tables, the external class registry and the configuration. Every engine
//! operation takes `&mut Realm`.

use std::rc::Rc;

use crate::builtins;
use crate::config::RealmConfig;
use crate::error::JsError;
use crate::external::ExternalRegistry;
use crate::heap::{Heap, HeapStats, ObjectRef};
use crate::object::{ArrayData, ErrorKind, FunctionData, JsObject, NativeFn, ObjectKind};
use crate::property::{Attributes, Property, PropertyMap, SharedMap};
use crate::value::{CheapClone, JsString, JsValue, ValueKind};

pub const PROTOTYPE_COUNT: usize = 16;

/// Index into the intrinsic prototype/constructor tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrototypeIndex {
    Object,
    Array,
    Boolean,
    Number,
    String,
    Function,
    RegExp,
    Date,
    Error,
    EvalError,
    InternalError,
    RangeError,
    ReferenceError,
    SyntaxError,
    TypeError,
    UriError,
}

impl PrototypeIndex {
    pub const ALL: [PrototypeIndex; PROTOTYPE_COUNT] = [
        PrototypeIndex::Object,
        PrototypeIndex::Array,
        PrototypeIndex::Boolean,
        PrototypeIndex::Number,
        PrototypeIndex::String,
        PrototypeIndex::Function,
        PrototypeIndex::RegExp,
        PrototypeIndex::Date,
        PrototypeIndex::Error,
        PrototypeIndex::EvalError,
        PrototypeIndex::InternalError,
        PrototypeIndex::RangeError,
        PrototypeIndex::ReferenceError,
        PrototypeIndex::SyntaxError,
        PrototypeIndex::TypeError,
        PrototypeIndex::UriError,
    ];

    /// Constructor name
    pub fn name(self) -> &'static str {
        match self.error_kind() {
            Some(kind) => kind.name(),
            None => match self {
                PrototypeIndex::Object => "Object",
                PrototypeIndex::Array => "Array",
                PrototypeIndex::Boolean => "Boolean",
                PrototypeIndex::Number => "Number",
                PrototypeIndex::String => "String",
                PrototypeIndex::Function => "Function",
                PrototypeIndex::RegExp => "RegExp",
                _ => "Date",
            },
        }
    }

    pub fn error_kind(self) -> Option<ErrorKind> {
        match self {
            PrototypeIndex::Error => Some(ErrorKind::Error),
            PrototypeIndex::EvalError => Some(ErrorKind::EvalError),
            PrototypeIndex::InternalError => Some(ErrorKind::InternalError),
            PrototypeIndex::RangeError => Some(ErrorKind::RangeError),
            PrototypeIndex::ReferenceError => Some(ErrorKind::ReferenceError),
            PrototypeIndex::SyntaxError => Some(ErrorKind::SyntaxError),
            PrototypeIndex::TypeError => Some(ErrorKind::TypeError),
            PrototypeIndex::UriError => Some(ErrorKind::UriError),
            _ => None,
        }
    }

    pub fn from_error_kind(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Error => PrototypeIndex::Error,
            ErrorKind::EvalError => PrototypeIndex::EvalError,
            ErrorKind::InternalError => PrototypeIndex::InternalError,
            ErrorKind::RangeError => PrototypeIndex::RangeError,
            ErrorKind::ReferenceError => PrototypeIndex::ReferenceError,
            ErrorKind::SyntaxError => PrototypeIndex::SyntaxError,
            ErrorKind::TypeError => PrototypeIndex::TypeError,
            ErrorKind::UriError => PrototypeIndex::UriError,
        }
    }

    /// Canonical prototype of a primitive value
    pub fn of_primitive(value: &JsValue) -> Option<Self> {
        match value {
            JsValue::Boolean(_) => Some(PrototypeIndex::Boolean),
            JsValue::Number(_) => Some(PrototypeIndex::Number),
            JsValue::String(_) => Some(PrototypeIndex::String),
            _ => None,
        }
    }
}

pub struct Realm {
    pub(crate) heap: Heap<JsObject>,
    prototypes: [ObjectRef; PROTOTYPE_COUNT],
    constructors: [ObjectRef; PROTOTYPE_COUNT],
    empty_shared: SharedMap,
    pub(crate) externals: ExternalRegistry,
    config: RealmConfig,
}

impl Realm {
    pub fn new() -> Result<Self, JsError> {
        Self::with_config(RealmConfig::default())
    }

    pub fn with_config(config: RealmConfig) -> Result<Self, JsError> {
        let mut heap = Heap::new(config.heap_limit);
        let empty_shared: SharedMap = Rc::new(PropertyMap::new());
        let object_prototype = heap.alloc(JsObject::new(
            ObjectKind::Ordinary,
            None,
            empty_shared.cheap_clone(),
        ))?;

        let mut realm = Realm {
            heap,
            prototypes: [object_prototype; PROTOTYPE_COUNT],
            constructors: [object_prototype; PROTOTYPE_COUNT],
            empty_shared,
            externals: ExternalRegistry::default(),
            config,
        };

        // Prototype objects first: method functions need Function.prototype
        for idx in PrototypeIndex::ALL.into_iter().skip(1) {
            let parent = if idx.error_kind().is_some() && idx != PrototypeIndex::Error {
                realm.prototype(PrototypeIndex::Error)
            } else {
                object_prototype
            };
            let kind = match idx {
                PrototypeIndex::Array => ObjectKind::Array(ArrayData::default()),
                PrototypeIndex::Boolean => ObjectKind::Boolean(false),
                PrototypeIndex::Number => ObjectKind::Number(0.0),
                PrototypeIndex::String => ObjectKind::String(JsString::from("")),
                PrototypeIndex::Function => ObjectKind::Function(FunctionData::Native {
                    name: JsString::from(""),
                    func: builtins::intrinsics::function_prototype_call,
                    arity: 0,
                }),
                _ => ObjectKind::Ordinary,
            };
            let proto = realm.alloc(JsObject::new(
                kind,
                Some(parent),
                realm.empty_shared.cheap_clone(),
            ))?;
            if let Some(slot) = realm.prototypes.get_mut(idx as usize) {
                *slot = proto;
            }
        }

        for idx in PrototypeIndex::ALL {
            let shared = builtins::prototype_properties(&mut realm, idx)?;
            let proto = realm.prototype(idx);
            realm.object_mut(proto)?.shared = Rc::new(shared);
        }

        for idx in PrototypeIndex::ALL {
            let constructor = builtins::create_constructor(&mut realm, idx)?;
            if let Some(slot) = realm.constructors.get_mut(idx as usize) {
                *slot = constructor;
            }
        }

        tracing::debug!(objects = realm.heap.live_count(), "realm initialized");
        Ok(realm)
    }

    pub fn config(&self) -> &RealmConfig {
        &self.config
    }

    pub fn prototype(&self, idx: PrototypeIndex) -> ObjectRef {
        let [first, ..] = self.prototypes;
        self.prototypes.get(idx as usize).copied().unwrap_or(first)
    }

    pub fn constructor(&self, idx: PrototypeIndex) -> ObjectRef {
        let [first, ..] = self.constructors;
        self.constructors.get(idx as usize).copied().unwrap_or(first)
    }

    /// Table entry whose prototype is `object`
    pub fn prototype_index_of(&self, object: ObjectRef) -> Option<PrototypeIndex> {
        PrototypeIndex::ALL
            .into_iter()
            .zip(self.prototypes)
            .find_map(|(idx, proto)| (proto == object).then_some(idx))
    }

    /// Table entry whose constructor is `object`
    pub fn constructor_index_of(&self, object: ObjectRef) -> Option<PrototypeIndex> {
        PrototypeIndex::ALL
            .into_iter()
            .zip(self.constructors)
            .find_map(|(idx, ctor)| (ctor == object).then_some(idx))
    }

    pub fn object(&self, r: ObjectRef) -> Result<&JsObject, JsError> {
        self.heap.get(r)
    }

    pub fn object_mut(&mut self, r: ObjectRef) -> Result<&mut JsObject, JsError> {
        self.heap.get_mut(r)
    }

    /// Number of live heap objects
    pub fn live_objects(&self) -> usize {
        self.heap.live_count()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Allocation
    // ═══════════════════════════════════════════════════════════════════════

    pub(crate) fn alloc(&mut self, object: JsObject) -> Result<ObjectRef, JsError> {
        self.heap.alloc(object)
    }

    fn alloc_kind(&mut self, kind: ObjectKind, idx: PrototypeIndex) -> Result<ObjectRef, JsError> {
        let proto = self.prototype(idx);
        self.alloc(JsObject::new(
            kind,
            Some(proto),
            self.empty_shared.cheap_clone(),
        ))
    }

    /// Plain object inheriting from Object.prototype
    pub fn alloc_object(&mut self) -> Result<ObjectRef, JsError> {
        self.alloc_kind(ObjectKind::Ordinary, PrototypeIndex::Object)
    }

    pub fn alloc_object_with_proto(
        &mut self,
        prototype: Option<ObjectRef>,
    ) -> Result<ObjectRef, JsError> {
        self.alloc(JsObject::new(
            ObjectKind::Ordinary,
            prototype,
            self.empty_shared.cheap_clone(),
        ))
    }

    pub fn alloc_array(&mut self, values: Vec<JsValue>) -> Result<ObjectRef, JsError> {
        self.alloc_kind(
            ObjectKind::Array(ArrayData::from_values(values)),
            PrototypeIndex::Array,
        )
    }

    /// Wrapper object for a boolean, number or string
    pub fn alloc_boxed(&mut self, value: &JsValue) -> Result<ObjectRef, JsError> {
        let (kind, idx) = match value {
            JsValue::Boolean(b) => (ObjectKind::Boolean(*b), PrototypeIndex::Boolean),
            JsValue::Number(n) => (ObjectKind::Number(*n), PrototypeIndex::Number),
            JsValue::String(s) => (ObjectKind::String(s.cheap_clone()), PrototypeIndex::String),
            other => {
                return Err(JsError::type_error(format!(
                    "cannot convert {} argument to object",
                    other.type_name()
                )));
            }
        };
        self.alloc_kind(kind, idx)
    }

    pub fn alloc_native_function(
        &mut self,
        name: &str,
        func: NativeFn,
        arity: u32,
    ) -> Result<ObjectRef, JsError> {
        self.alloc_kind(
            ObjectKind::Function(FunctionData::Native {
                name: JsString::from(name),
                func,
                arity,
            }),
            PrototypeIndex::Function,
        )
    }

    /// Function object referenced from a shared map
    pub(crate) fn alloc_template_function(
        &mut self,
        name: &str,
        func: NativeFn,
        arity: u32,
    ) -> Result<ObjectRef, JsError> {
        let function = self.alloc_native_function(name, func, arity)?;
        self.object_mut(function)?.template = true;
        Ok(function)
    }

    /// Register an embedder-implemented function
    pub fn create_closure<F>(&mut self, name: &str, arity: u32, body: F) -> Result<JsValue, JsError>
    where
        F: Fn(&mut Realm, JsValue, &[JsValue]) -> Result<JsValue, JsError> + 'static,
    {
        let function = self.alloc_kind(
            ObjectKind::Function(FunctionData::Closure {
                name: JsString::from(name),
                arity,
                body: Rc::new(body),
            }),
            PrototypeIndex::Function,
        )?;
        Ok(JsValue::Object(function))
    }

    pub fn alloc_error(&mut self, kind: ErrorKind, message: Option<JsString>) -> Result<ObjectRef, JsError> {
        let error = self.alloc_kind(ObjectKind::Error(kind), PrototypeIndex::from_error_kind(kind))?;
        if let Some(message) = message {
            self.object_mut(error)?.own.insert(Property::with_attrs(
                JsString::from("message"),
                JsValue::String(message),
                Attributes::HIDDEN,
            ))?;
        }
        Ok(error)
    }

    /// Script-visible error object for an engine error
    pub fn error_value(&mut self, err: &JsError) -> Result<JsValue, JsError> {
        let kind = match err {
            JsError::TypeError { .. } => ErrorKind::TypeError,
            JsError::RangeError { .. } => ErrorKind::RangeError,
            JsError::MemoryError { .. } | JsError::Internal { .. } => ErrorKind::InternalError,
        };
        let error = self.alloc_error(kind, Some(JsString::from(err.message())))?;
        Ok(JsValue::Object(error))
    }

    /// Private copy of a template function record
    pub(crate) fn clone_function(&mut self, function: ObjectRef) -> Result<ObjectRef, JsError> {
        let mut copy = self.object(function)?.clone();
        copy.template = false;
        let private = self.alloc(copy)?;
        tracing::debug!(
            template = function.index(),
            copy = private.index(),
            "function template privatized"
        );
        Ok(private)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Calls and conversions
    // ═══════════════════════════════════════════════════════════════════════

    pub fn is_callable(&self, value: &JsValue) -> bool {
        match value {
            JsValue::Object(r) => self.object(*r).is_ok_and(JsObject::is_function),
            _ => false,
        }
    }

    pub fn call(&mut self, func: &JsValue, this: JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
        let JsValue::Object(r) = func else {
            return Err(JsError::type_error(format!(
                "{} is not a function",
                func.type_name()
            )));
        };
        let data = match &self.object(*r)?.kind {
            ObjectKind::Function(data) => data.clone(),
            _ => return Err(JsError::type_error("object is not a function")),
        };
        match data {
            FunctionData::Native { func, .. } => func(self, this, args),
            FunctionData::Closure { body, .. } => body(self, this, args),
        }
    }

    /// ToPrimitive with string hint: `toString`, then `valueOf`
    pub fn to_primitive(&mut self, value: &JsValue) -> Result<JsValue, JsError> {
        match value {
            JsValue::Object(r) => {
                match &self.object(*r)?.kind {
                    ObjectKind::Boolean(b) => return Ok(JsValue::Boolean(*b)),
                    ObjectKind::Number(n) => return Ok(JsValue::Number(*n)),
                    ObjectKind::String(s) => return Ok(JsValue::String(s.cheap_clone())),
                    _ => {}
                }
                for name in ["toString", "valueOf"] {
                    let method = self.get_property(value, &JsValue::from(name))?;
                    if self.is_callable(&method) {
                        let result = self.call(&method, value.clone(), &[])?;
                        if result.is_primitive() {
                            return Ok(result);
                        }
                    }
                }
                Err(JsError::type_error("Cannot convert object to primitive value"))
            }
            JsValue::External(ext) => {
                let name = self.external_class_name(ext.class)?;
                Ok(JsValue::from(format!("[object {}]", name)))
            }
            _ => Ok(value.clone()),
        }
    }

    pub fn to_string(&mut self, value: &JsValue) -> Result<JsString, JsError> {
        if let Some(s) = value.to_property_key() {
            return Ok(s);
        }
        let primitive = self.to_primitive(value)?;
        primitive
            .to_property_key()
            .ok_or_else(|| JsError::internal_error("ToPrimitive returned an object"))
    }

    pub fn to_number(&mut self, value: &JsValue) -> Result<f64, JsError> {
        if value.is_primitive() {
            return Ok(value.to_number());
        }
        Ok(self.to_primitive(value)?.to_number())
    }

    pub fn value_kind(&self, value: &JsValue) -> Result<ValueKind, JsError> {
        Ok(match value {
            JsValue::Undefined => ValueKind::Undefined,
            JsValue::Null => ValueKind::Null,
            JsValue::Boolean(_) => ValueKind::Boolean,
            JsValue::Number(_) => ValueKind::Number,
            JsValue::String(_) => ValueKind::String,
            JsValue::External(_) => ValueKind::External,
            JsValue::Object(r) => match &self.object(*r)?.kind {
                ObjectKind::Ordinary => ValueKind::Object,
                ObjectKind::Array(_) => ValueKind::Array,
                ObjectKind::Boolean(_) => ValueKind::ObjectBoolean,
                ObjectKind::Number(_) => ValueKind::ObjectNumber,
                ObjectKind::String(_) => ValueKind::ObjectString,
                ObjectKind::Function(_) => ValueKind::Function,
                ObjectKind::RegExp { .. } => ValueKind::RegExp,
                ObjectKind::Date(_) => ValueKind::Date,
                ObjectKind::Error(_) => ValueKind::Error,
            },
        })
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Arrays
    // ═══════════════════════════════════════════════════════════════════════

    /// Validate a requested array length against the limits
    pub(crate) fn checked_array_length(&self, requested: f64) -> Result<u32, JsError> {
        if requested.fract() != 0.0 || requested < 0.0 || requested > u32::MAX as f64 {
            return Err(JsError::range_error("Invalid array length"));
        }
        let len = requested as u32;
        if len > self.config.max_array_length {
            tracing::warn!(len, max = self.config.max_array_length, "array length limit reached");
            return Err(JsError::memory_error(format!(
                "array length {} exceeds the limit of {}",
                len, self.config.max_array_length
            )));
        }
        Ok(len)
    }

    /// `array.length = value`: truncates or extends with holes
    pub fn set_array_length(&mut self, array: ObjectRef, value: &JsValue) -> Result<JsValue, JsError> {
        let requested = self.to_number(value)?;
        let len = self.checked_array_length(requested)?;
        let data = self
            .object_mut(array)?
            .as_array_mut()
            .ok_or_else(|| JsError::type_error("object is not an array"))?;
        data.slots.resize(len as usize, None);
        Ok(JsValue::Number(len as f64))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Garbage collection
    // ═══════════════════════════════════════════════════════════════════════

    /// Free every object not reachable from the intrinsics or `roots`
    pub fn collect_garbage(&mut self, roots: &[JsValue]) -> HeapStats {
        let mut all_roots: Vec<ObjectRef> = Vec::with_capacity(PROTOTYPE_COUNT * 2 + roots.len());
        all_roots.extend(self.prototypes);
        all_roots.extend(self.constructors);
        all_roots.extend(self.externals.function_roots());
        all_roots.extend(roots.iter().filter_map(JsValue::as_object));
        self.heap.collect(&all_roots)
    }
}
