//! Host object bridge.
//!
//! Embedders register external classes with optional `get`, `set` and `find`
//! callbacks and attach instances to the realm. Property reads on an external
//! value call `get` during the query; writes and deletes are two-phase: the
//! query yields a `Handler::External` carrying an `ExternalRequest`, and the
//! caller later invokes it. The request travels by value, so a callback may
//! re-enter the engine and start further external queries freely.

use std::any::Any;

use crate::error::JsError;
use crate::heap::ObjectRef;
use crate::object::NativeFn;
use crate::prelude::FxHashMap;
use crate::property::{Attributes, Handler, Property, PropertyKind};
use crate::query::{FoundProperty, Location, QueryMode, QueryResult};
use crate::realm::Realm;
use crate::value::{CheapClone, JsString, JsValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(u32);

impl ClassId {
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Script-visible handle to a host object: its class plus instance slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExternalValue {
    pub class: ClassId,
    pub index: u32,
}

#[derive(Debug, Clone, Copy)]
pub enum ExternalKind {
    /// Container of named members
    Object,
    /// Callable member, surfaced as a native function
    Method(NativeFn),
    /// Leaf value produced by `get`
    Value,
}

/// Per-call data handed to host callbacks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalData {
    /// Opaque token of a registered member
    Token(usize),
    /// Key of a property the class has no member for
    Key(JsString),
}

#[derive(Debug, Clone)]
pub struct ExternalCall {
    pub instance: u32,
    pub data: ExternalData,
}

pub type ExternalGetFn = fn(&mut Realm, &ExternalCall) -> Result<JsValue, JsError>;
pub type ExternalSetFn = fn(&mut Realm, &ExternalCall, &str) -> Result<(), JsError>;
/// `delete` is true when called for a delete operation
pub type ExternalFindFn = fn(&mut Realm, &ExternalCall, bool) -> Result<bool, JsError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalOp {
    Set,
    Delete,
}

/// Deferred host write or delete produced by a query
#[derive(Debug, Clone)]
pub struct ExternalRequest {
    pub op: ExternalOp,
    pub class: ClassId,
    pub call: ExternalCall,
}

pub struct ExternalClass {
    name: JsString,
    kind: ExternalKind,
    get: Option<ExternalGetFn>,
    set: Option<ExternalSetFn>,
    find: Option<ExternalFindFn>,
    data: usize,
    members: FxHashMap<JsString, ClassId>,
    function: Option<ObjectRef>,
}

impl ExternalClass {
    pub fn builder(name: &str, kind: ExternalKind) -> ExternalClassBuilder {
        ExternalClassBuilder {
            class: ExternalClass {
                name: JsString::from(name),
                kind,
                get: None,
                set: None,
                find: None,
                data: 0,
                members: FxHashMap::default(),
                function: None,
            },
        }
    }

    pub fn name(&self) -> &JsString {
        &self.name
    }
}

pub struct ExternalClassBuilder {
    class: ExternalClass,
}

impl ExternalClassBuilder {
    pub fn get(mut self, f: ExternalGetFn) -> Self {
        self.class.get = Some(f);
        self
    }

    pub fn set(mut self, f: ExternalSetFn) -> Self {
        self.class.set = Some(f);
        self
    }

    pub fn find(mut self, f: ExternalFindFn) -> Self {
        self.class.find = Some(f);
        self
    }

    pub fn data(mut self, token: usize) -> Self {
        self.class.data = token;
        self
    }

    /// Named member; the member class must already be registered
    pub fn member(mut self, name: &str, class: ClassId) -> Self {
        self.class.members.insert(JsString::from(name), class);
        self
    }
}

#[derive(Default)]
pub struct ExternalRegistry {
    classes: Vec<ExternalClass>,
    instances: Vec<Option<Box<dyn Any>>>,
}

impl ExternalRegistry {
    fn class(&self, id: ClassId) -> Result<&ExternalClass, JsError> {
        self.classes
            .get(id.0 as usize)
            .ok_or_else(|| JsError::internal_error("unknown external class"))
    }

    /// Function objects of method classes, kept alive across collections
    pub(crate) fn function_roots(&self) -> impl Iterator<Item = ObjectRef> + '_ {
        self.classes.iter().filter_map(|c| c.function)
    }
}

impl Realm {
    pub fn register_external_class(
        &mut self,
        builder: ExternalClassBuilder,
    ) -> Result<ClassId, JsError> {
        let mut class = builder.class;
        for member in class.members.values() {
            self.externals.class(*member)?;
        }
        if let ExternalKind::Method(func) = class.kind {
            let name = class.name.cheap_clone();
            let function = self.alloc_native_function(name.as_str(), func, 0)?;
            class.function = Some(function);
        }

        let id = u32::try_from(self.externals.classes.len())
            .map_err(|_| JsError::memory_error("too many external classes"))?;
        tracing::debug!(class = class.name.as_str(), id, "external class registered");
        self.externals.classes.push(class);
        Ok(ClassId(id))
    }

    /// Attach a host instance and return its script-visible value
    pub fn create_external<T: Any>(
        &mut self,
        class: ClassId,
        instance: T,
    ) -> Result<JsValue, JsError> {
        self.externals.class(class)?;
        let index = u32::try_from(self.externals.instances.len())
            .map_err(|_| JsError::memory_error("too many external instances"))?;
        self.externals.instances.push(Some(Box::new(instance)));
        Ok(JsValue::External(ExternalValue { class, index }))
    }

    pub fn external_instance<T: Any>(&self, index: u32) -> Result<&T, JsError> {
        self.externals
            .instances
            .get(index as usize)
            .and_then(|slot| slot.as_ref())
            .and_then(|boxed| boxed.downcast_ref::<T>())
            .ok_or_else(|| JsError::internal_error("external instance type mismatch"))
    }

    pub fn external_instance_mut<T: Any>(&mut self, index: u32) -> Result<&mut T, JsError> {
        self.externals
            .instances
            .get_mut(index as usize)
            .and_then(|slot| slot.as_mut())
            .and_then(|boxed| boxed.downcast_mut::<T>())
            .ok_or_else(|| JsError::internal_error("external instance type mismatch"))
    }

    /// Detach a host instance; later accesses through its value fail
    pub fn release_external(&mut self, value: &JsValue) -> Result<(), JsError> {
        let JsValue::External(ext) = value else {
            return Err(JsError::type_error("value is not external"));
        };
        match self.externals.instances.get_mut(ext.index as usize) {
            Some(slot) => {
                *slot = None;
                Ok(())
            }
            None => Err(JsError::internal_error("unknown external instance")),
        }
    }

    pub fn external_class_name(&self, class: ClassId) -> Result<JsString, JsError> {
        Ok(self.externals.class(class)?.name.cheap_clone())
    }
}

/// Query phase of the bridge
pub(crate) fn external_query(
    realm: &mut Realm,
    mode: QueryMode,
    object: ExternalValue,
    key: JsString,
) -> Result<QueryResult, JsError> {
    let mut class_id = object.class;
    let class = realm.externals.class(class_id)?;

    let mut value = JsValue::Undefined;
    let member = class.members.get(key.as_str()).copied();
    let data = match member {
        Some(member_id) => {
            class_id = member_id;
            value = JsValue::External(ExternalValue {
                class: member_id,
                index: object.index,
            });
            ExternalData::Token(realm.externals.class(member_id)?.data)
        }
        None => ExternalData::Key(key.cheap_clone()),
    };

    let class = realm.externals.class(class_id)?;
    let (get, has_set, has_find, kind, function) = (
        class.get,
        class.set.is_some(),
        class.find.is_some(),
        class.kind,
        class.function,
    );

    let attrs = Attributes {
        writable: false,
        enumerable: true,
        configurable: false,
    };
    let call = ExternalCall {
        instance: object.index,
        data,
    };

    let skip_get = member.is_some() && matches!(kind, ExternalKind::Object);
    if !skip_get {
        match mode {
            QueryMode::Get => {
                if let Some(get) = get {
                    value = get(realm, &call)?;
                }
            }
            QueryMode::Set | QueryMode::Delete => {
                let (op, attrs) = if mode == QueryMode::Set {
                    (
                        ExternalOp::Set,
                        Attributes {
                            writable: has_set,
                            ..attrs
                        },
                    )
                } else {
                    (
                        ExternalOp::Delete,
                        Attributes {
                            configurable: has_find,
                            ..attrs
                        },
                    )
                };
                let request = ExternalRequest {
                    op,
                    class: class_id,
                    call,
                };
                return Ok(QueryResult::Found(FoundProperty {
                    property: Property {
                        name: key,
                        value: JsValue::Undefined,
                        kind: PropertyKind::Handler(Handler::External(request)),
                        attrs,
                    },
                    location: Location::Synthesized,
                }));
            }
        }
    }

    if let (ExternalKind::Method(_), Some(function)) = (kind, function) {
        value = JsValue::Object(function);
    }

    Ok(QueryResult::Found(FoundProperty {
        property: Property {
            name: key,
            value,
            kind: PropertyKind::Plain,
            attrs,
        },
        location: Location::Synthesized,
    }))
}

/// Invocation phase of the bridge
pub(crate) fn invoke_external(
    realm: &mut Realm,
    request: &ExternalRequest,
    value: Option<JsValue>,
) -> Result<JsValue, JsError> {
    let class = realm.externals.class(request.class)?;
    tracing::debug!(
        class = class.name.as_str(),
        op = ?request.op,
        instance = request.call.instance,
        "external bridge invoked"
    );

    match request.op {
        ExternalOp::Set => {
            let Some(set) = class.set else {
                return Err(JsError::type_error(format!(
                    "Cannot assign to read-only property of \"{}\"",
                    class.name
                )));
            };
            let value = value.unwrap_or_default();
            let text = if value.is_null_or_undefined() {
                JsString::from("")
            } else {
                realm.to_string(&value)?
            };
            set(realm, &request.call, text.as_str())?;
            Ok(value)
        }
        ExternalOp::Delete => {
            let Some(find) = class.find else {
                return Ok(JsValue::Boolean(false));
            };
            Ok(JsValue::Boolean(find(realm, &request.call, true)?))
        }
    }
}
