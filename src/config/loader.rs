//! Load schema declarations from a JSON file and resolve them into the runtime model.

use crate::config::resolved::{PropertyDescriptor, PropertyType, ResolvedModel, Schema};
use crate::config::types::SchemaConfig;
use crate::config::validate;
use crate::error::ConfigError;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Build resolved model from schema declarations (validates first).
pub fn resolve(configs: &[SchemaConfig]) -> Result<ResolvedModel, ConfigError> {
    validate(configs)?;

    let mut schemas = Vec::with_capacity(configs.len());
    let mut schema_by_name = HashMap::new();
    for config in configs {
        let properties = config
            .properties
            .iter()
            .map(|(name, prop)| {
                let property_type =
                    PropertyType::parse(prop.type_name()).ok_or_else(|| ConfigError::UnknownType {
                        schema: config.name.clone(),
                        property: name.clone(),
                        type_name: prop.type_name().to_string(),
                    })?;
                Ok(PropertyDescriptor {
                    name: name.clone(),
                    property_type,
                    optional: prop.optional(),
                    object_type: prop.object_type().map(str::to_string),
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let schema = Arc::new(Schema {
            name: config.name.clone(),
            path_segment: config.name.to_lowercase(),
            primary_key: config.primary_key.clone(),
            properties,
        });
        schema_by_name.insert(schema.name.clone(), schema.clone());
        schemas.push(schema);
    }

    Ok(ResolvedModel {
        schemas,
        schema_by_name,
    })
}

/// Read the ordered schema list from a JSON file.
pub async fn load_from_path(path: impl AsRef<Path>) -> Result<Vec<SchemaConfig>, ConfigError> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&raw).map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))
}
