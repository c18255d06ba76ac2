//! Realm configuration

use serde::{Deserialize, Serialize};

use crate::error::JsError;

/// Default cap on live heap objects
pub const DEFAULT_HEAP_LIMIT: usize = 1 << 20;

/// Default cap on array length reachable through auto-expansion
pub const DEFAULT_MAX_ARRAY_LENGTH: u32 = 1 << 24;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RealmConfig {
    /// Maximum number of live objects
    pub heap_limit: usize,
    /// Largest array length an index write or `length` assignment may produce
    pub max_array_length: u32,
}

impl Default for RealmConfig {
    fn default() -> Self {
        Self {
            heap_limit: DEFAULT_HEAP_LIMIT,
            max_array_length: DEFAULT_MAX_ARRAY_LENGTH,
        }
    }
}

impl RealmConfig {
    pub fn from_json_str(json: &str) -> Result<Self, JsError> {
        serde_json::from_str(json)
            .map_err(|e| JsError::type_error(format!("invalid realm config: {}", e)))
    }

    pub fn with_heap_limit(mut self, limit: usize) -> Self {
        self.heap_limit = limit;
        self
    }

    pub fn with_max_array_length(mut self, len: u32) -> Self {
        self.max_array_length = len;
        self
    }
}
