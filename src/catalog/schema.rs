//! Typed schema for the structured video data file
//!
//! The file is a JSON object: a reserved `version` string plus one key per
//! category holding an ordered list of entry objects. Every entry field is
//! optional; entries are validated one at a time so a bad entry never takes
//! its neighbours down with it.

use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved top-level key holding the file version
pub const VERSION_KEY: &str = "version";

/// Version assumed when the file does not declare one
pub const DEFAULT_VERSION: &str = "1.0";

/// One entry as written in the data file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EntryFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_override: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_override: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Why an entry could not be turned into [`EntryFields`]
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum EntryError {
    #[error("entry is not an object")]
    NotAnObject,

    #[error("invalid field: {0}")]
    InvalidField(String),
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl EntryFields {
    /// Validate a raw JSON entry
    pub fn from_value(value: Value) -> std::result::Result<Self, EntryError> {
        if !value.is_object() {
            return Err(EntryError::NotAnObject);
        }
        serde_json::from_value(value).map_err(|e| EntryError::InvalidField(e.to_string()))
    }

    pub fn id(&self) -> Option<&str> {
        non_empty(&self.id)
    }

    pub fn url(&self) -> Option<&str> {
        non_empty(&self.url)
    }

    pub fn thumbnail(&self) -> Option<&str> {
        non_empty(&self.thumbnail)
    }

    pub fn title_override(&self) -> Option<&str> {
        non_empty(&self.title_override)
    }

    pub fn description_override(&self) -> Option<&str> {
        non_empty(&self.description_override)
    }
}

/// One category key and its entries in file order
#[derive(Debug, Clone)]
pub struct CategorySection {
    pub name: String,
    pub entries: Vec<std::result::Result<EntryFields, EntryError>>,
}

/// Parsed data file
#[derive(Debug, Clone)]
pub struct DataDocument {
    pub version: String,
    pub categories: Vec<CategorySection>,
    /// Category keys whose value was not a list
    pub ignored_keys: Vec<String>,
}

impl DataDocument {
    /// Parse the data file contents. Only a syntactically broken file or a
    /// non-object top level is an error; bad entries are kept as
    /// per-entry validation failures.
    pub fn parse(text: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(text)?;
        match root {
            Value::Object(map) => Ok(Self::from_map(map)),
            _ => Err(CatalogError::InvalidEntry(
                "top-level value must be an object".to_string(),
            )),
        }
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        let mut version = DEFAULT_VERSION.to_string();
        let mut categories = Vec::new();
        let mut ignored_keys = Vec::new();

        for (key, value) in map {
            if key == VERSION_KEY {
                version = match value {
                    Value::String(s) => s,
                    Value::Null => DEFAULT_VERSION.to_string(),
                    other => other.to_string(),
                };
                continue;
            }

            match value {
                Value::Array(items) => categories.push(CategorySection {
                    name: key,
                    entries: items.into_iter().map(EntryFields::from_value).collect(),
                }),
                _ => ignored_keys.push(key),
            }
        }

        Self {
            version,
            categories,
            ignored_keys,
        }
    }
}
