//! Catalog DTOs.
//!
//! # Design
//! The countries API returns large, loosely structured objects. They are kept
//! as opaque JSON maps and only the display name is interpreted, so schema
//! changes upstream never break parsing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single country entry from the catalog.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Country(Map<String, Value>);

impl Country {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Best-effort display name: `name.common`, or `name` when it is a plain
    /// string.
    pub fn common_name(&self) -> Option<&str> {
        match self.0.get("name")? {
            Value::String(name) => Some(name),
            Value::Object(name) => name.get("common")?.as_str(),
            _ => None,
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}
