//! Resolved schema model: declarations validated and typed for runtime use.

use std::collections::HashMap;
use std::sync::Arc;

/// Property kinds understood by the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyType {
    Int,
    Float,
    Double,
    Bool,
    String,
    Data,
    Date,
    List,
    Object,
}

impl PropertyType {
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "int" => PropertyType::Int,
            "float" => PropertyType::Float,
            "double" => PropertyType::Double,
            "bool" => PropertyType::Bool,
            "string" => PropertyType::String,
            "data" => PropertyType::Data,
            "date" => PropertyType::Date,
            "list" => PropertyType::List,
            "object" => PropertyType::Object,
            _ => return None,
        })
    }

    /// list and object carry an `objectType` naming another schema.
    pub fn is_relation(self) -> bool {
        matches!(self, PropertyType::List | PropertyType::Object)
    }

    /// Types usable as a primary key.
    pub fn is_key_type(self) -> bool {
        matches!(
            self,
            PropertyType::Int | PropertyType::String | PropertyType::Date
        )
    }

    /// SQLite STRICT column type.
    pub fn sql_type(self) -> &'static str {
        match self {
            PropertyType::Int | PropertyType::Bool => "INTEGER",
            PropertyType::Float | PropertyType::Double => "REAL",
            PropertyType::String
            | PropertyType::Data
            | PropertyType::Date
            | PropertyType::List
            | PropertyType::Object => "TEXT",
        }
    }
}

#[derive(Clone, Debug)]
pub struct PropertyDescriptor {
    pub name: String,
    pub property_type: PropertyType,
    pub optional: bool,
    pub object_type: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Schema {
    pub name: String,
    /// Lowercased name; the resource path is `/{path_segment}`.
    pub path_segment: String,
    pub primary_key: Option<String>,
    pub properties: Vec<PropertyDescriptor>,
}

impl Schema {
    pub fn base_path(&self) -> String {
        format!("/{}", self.path_segment)
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn primary_key_property(&self) -> Option<&PropertyDescriptor> {
        self.primary_key.as_deref().and_then(|pk| self.property(pk))
    }
}

#[derive(Clone, Debug, Default)]
pub struct ResolvedModel {
    /// In declaration order.
    pub schemas: Vec<Arc<Schema>>,
    pub schema_by_name: HashMap<String, Arc<Schema>>,
}

impl ResolvedModel {
    pub fn schema(&self, name: &str) -> Option<&Arc<Schema>> {
        self.schema_by_name.get(name)
    }
}
