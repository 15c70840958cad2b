//! Versioned state blob

use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Schema metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// Schema version of `data`
    pub version: u64,
}

/// Persisted extension state: controller name to controller state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionedData {
    /// Schema metadata
    pub meta: Meta,
    /// Controller states
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl VersionedData {
    /// Empty state at `version`
    pub fn new(version: u64) -> Self {
        Self {
            meta: Meta { version },
            data: Map::new(),
        }
    }

    /// Attach a controller state
    pub fn with_controller(mut self, name: impl Into<String>, state: Value) -> Self {
        self.data.insert(name.into(), state);
        self
    }

    /// Schema version
    pub fn version(&self) -> u64 {
        self.meta.version
    }

    /// Parse from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON text
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Type name of a JSON value, for anomaly reports
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
