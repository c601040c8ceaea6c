//! Record validation against the schema, applied before every write.

use crate::config::{PropertyDescriptor, PropertyType, Schema};
use crate::error::AppError;
use serde_json::{Map, Value};

pub struct RecordValidator;

impl RecordValidator {
    pub fn into_object(value: Value) -> Result<Map<String, Value>, AppError> {
        match value {
            Value::Object(m) => Ok(m),
            _ => Err(AppError::Validation("body must be a JSON object".into())),
        }
    }

    /// Unknown properties are rejected; every non-optional property must be present and non-null.
    pub fn validate(schema: &Schema, record: &Map<String, Value>) -> Result<(), AppError> {
        for key in record.keys() {
            if schema.property(key).is_none() {
                return Err(AppError::Validation(format!(
                    "{} has no property '{}'",
                    schema.name, key
                )));
            }
        }
        for prop in &schema.properties {
            match record.get(&prop.name) {
                None | Some(Value::Null) if !prop.optional => {
                    return Err(AppError::Validation(format!(
                        "{}.{} is required",
                        schema.name, prop.name
                    )));
                }
                Some(v) if !v.is_null() => validate_value(schema, prop, v)?,
                _ => {}
            }
        }
        Ok(())
    }
}

fn validate_value(schema: &Schema, prop: &PropertyDescriptor, v: &Value) -> Result<(), AppError> {
    let ok = match prop.property_type {
        PropertyType::Int => v.is_i64(),
        PropertyType::Float | PropertyType::Double => v.is_number(),
        PropertyType::Bool => v.is_boolean(),
        PropertyType::String | PropertyType::Data => v.is_string(),
        PropertyType::Date => v
            .as_str()
            .map(|s| chrono::DateTime::parse_from_rfc3339(s).is_ok())
            .unwrap_or(false),
        PropertyType::List => v.is_array(),
        PropertyType::Object => v.is_object() || v.is_string() || v.is_number(),
    };
    if ok {
        return Ok(());
    }
    let expected = match prop.property_type {
        PropertyType::Int => "an integer",
        PropertyType::Float | PropertyType::Double => "a number",
        PropertyType::Bool => "a boolean",
        PropertyType::String | PropertyType::Data => "a string",
        PropertyType::Date => "an RFC 3339 date string",
        PropertyType::List => "an array",
        PropertyType::Object => "an object or a reference",
    };
    Err(AppError::Validation(format!(
        "{}.{} must be {}",
        schema.name, prop.name, expected
    )))
}
