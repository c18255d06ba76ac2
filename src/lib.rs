//! Object model and property-resolution engine for an embeddable ECMAScript runtime
//!
//! A [`Realm`] owns an arena of objects, the built-in prototypes and their
//! constructors. Property access goes through a single query routine that
//! walks own maps, shared template maps, array and string exotics, and the
//! prototype chain.
//!
//! # Example
//!
//! ```
//! use objcore::{JsValue, Realm};
//!
//! let mut realm = Realm::new().unwrap();
//! let obj = JsValue::Object(realm.alloc_object().unwrap());
//! realm.set(&obj, "answer", JsValue::from(42)).unwrap();
//! assert_eq!(realm.get(&obj, "answer").unwrap(), JsValue::Number(42.0));
//! ```

pub mod access;
pub mod builtins;
pub mod config;
pub mod descriptor;
pub mod enumerate;
pub mod error;
pub mod extensible;
pub mod external;
pub mod heap;
pub mod json;
pub mod object;
pub mod prelude;
pub mod property;
pub mod prototype;
pub mod query;
pub mod realm;
pub mod string;
pub mod value;

pub use config::RealmConfig;
pub use descriptor::{PropertyDescriptor, Tristate};
pub use enumerate::EnumKind;
pub use error::JsError;
pub use external::{
    ClassId, ExternalCall, ExternalClass, ExternalClassBuilder, ExternalData, ExternalKind,
    ExternalValue,
};
pub use heap::{HeapStats, ObjectRef};
pub use object::{ErrorKind, JsObject, ObjectKind};
pub use property::{Attributes, Property, PropertyKind};
pub use query::{PropertyQuery, QueryMode, QueryResult};
pub use realm::{PrototypeIndex, Realm};
pub use value::{CheapClone, JsString, JsValue, ValueKind};
