//! Raw schema declarations as they appear in the schema file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One record type: `{ "name": "Car", "primaryKey": "id", "properties": { ... } }`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaConfig {
    pub name: String,
    #[serde(default)]
    pub primary_key: Option<String>,
    pub properties: BTreeMap<String, PropertyConfig>,
}

/// A property is either a bare type name (`"int"`) or a full descriptor object.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyConfig {
    Shorthand(String),
    Full {
        #[serde(rename = "type")]
        type_: String,
        #[serde(default)]
        optional: bool,
        #[serde(default, rename = "objectType")]
        object_type: Option<String>,
    },
}

impl PropertyConfig {
    pub fn type_name(&self) -> &str {
        match self {
            PropertyConfig::Shorthand(t) => t,
            PropertyConfig::Full { type_, .. } => type_,
        }
    }

    pub fn optional(&self) -> bool {
        match self {
            PropertyConfig::Shorthand(_) => false,
            PropertyConfig::Full { optional, .. } => *optional,
        }
    }

    pub fn object_type(&self) -> Option<&str> {
        match self {
            PropertyConfig::Shorthand(_) => None,
            PropertyConfig::Full { object_type, .. } => object_type.as_deref(),
        }
    }
}
