//! Schema validation: identifiers, primary keys, type names and object references.

use crate::config::{PropertyType, SchemaConfig};
use crate::error::ConfigError;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Paths taken by the common routes.
pub const RESERVED_PATH_SEGMENTS: &[&str] = &["health", "ready", "version"];

/// Schema and property names become table and column names.
pub fn is_identifier(s: &str) -> bool {
    static IDENT: OnceLock<Regex> = OnceLock::new();
    IDENT
        .get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier regex"))
        .is_match(s)
}

pub fn validate(schemas: &[SchemaConfig]) -> Result<(), ConfigError> {
    if schemas.is_empty() {
        return Err(ConfigError::Validation("at least one schema required".into()));
    }

    let mut names = HashSet::new();
    let mut path_segments = HashSet::new();
    for s in schemas {
        if !is_identifier(&s.name) {
            return Err(ConfigError::InvalidIdentifier(s.name.clone()));
        }
        if !names.insert(s.name.as_str()) {
            return Err(ConfigError::DuplicateName(s.name.clone()));
        }
        let segment = s.name.to_lowercase();
        if RESERVED_PATH_SEGMENTS.contains(&segment.as_str()) || !path_segments.insert(segment.clone()) {
            return Err(ConfigError::DuplicatePathSegment(segment));
        }
    }

    for s in schemas {
        if s.properties.is_empty() {
            return Err(ConfigError::Validation(format!("{}: at least one property required", s.name)));
        }
        for (prop_name, prop) in &s.properties {
            if !is_identifier(prop_name) {
                return Err(ConfigError::InvalidIdentifier(format!("{}.{}", s.name, prop_name)));
            }
            let ty = PropertyType::parse(prop.type_name()).ok_or_else(|| ConfigError::UnknownType {
                schema: s.name.clone(),
                property: prop_name.clone(),
                type_name: prop.type_name().to_string(),
            })?;
            match (ty.is_relation(), prop.object_type()) {
                (true, None) => {
                    return Err(ConfigError::Validation(format!(
                        "{}.{}: objectType required for {}",
                        s.name,
                        prop_name,
                        prop.type_name()
                    )))
                }
                (true, Some(target)) if !names.contains(target) => {
                    return Err(ConfigError::MissingReference {
                        kind: "schema",
                        id: target.to_string(),
                    })
                }
                (false, Some(_)) => {
                    return Err(ConfigError::Validation(format!(
                        "{}.{}: objectType only allowed on list or object",
                        s.name, prop_name
                    )))
                }
                _ => {}
            }
        }

        if let Some(pk) = &s.primary_key {
            let invalid = || ConfigError::InvalidPrimaryKey {
                schema: s.name.clone(),
                property: pk.clone(),
            };
            let prop = s.properties.get(pk).ok_or_else(invalid)?;
            let key_type = PropertyType::parse(prop.type_name()).map(PropertyType::is_key_type);
            if key_type != Some(true) || prop.optional() {
                return Err(invalid());
            }
        }
    }

    Ok(())
}
