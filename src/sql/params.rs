//! Convert between serde_json::Value and SQLite bind/column values, guided by the property type.

use crate::config::{PropertyDescriptor, PropertyType, Schema};
use serde_json::{Map, Value};
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteRow};
use sqlx::Row;

/// A value that can be bound to a SQLite query.
#[derive(Clone, Debug, PartialEq)]
pub enum BindValue {
    Null,
    Int(i64),
    Real(f64),
    Text(String),
}

impl BindValue {
    /// Storage form of a (validated) JSON value for a property.
    pub fn from_json(prop: &PropertyDescriptor, v: &Value) -> Self {
        match (prop.property_type, v) {
            (_, Value::Null) => BindValue::Null,
            (PropertyType::Bool, Value::Bool(b)) => BindValue::Int(i64::from(*b)),
            (PropertyType::Int, Value::Number(n)) if n.is_i64() => {
                BindValue::Int(n.as_i64().unwrap_or_default())
            }
            (PropertyType::Float | PropertyType::Double, Value::Number(n)) => {
                BindValue::Real(n.as_f64().unwrap_or_default())
            }
            (PropertyType::List | PropertyType::Object, other) => BindValue::Text(other.to_string()),
            (_, Value::String(s)) => BindValue::Text(s.clone()),
            (_, other) => BindValue::Text(other.to_string()),
        }
    }
}

pub fn bind<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: &BindValue,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        BindValue::Null => query.bind(None::<i64>),
        BindValue::Int(n) => query.bind(*n),
        BindValue::Real(f) => query.bind(*f),
        BindValue::Text(s) => query.bind(s.clone()),
    }
}

pub fn bind_all<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    values: &[BindValue],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for v in values {
        query = bind(query, v);
    }
    query
}

/// Row to JSON object, one key per schema property.
pub fn row_to_json(schema: &Schema, row: &SqliteRow) -> Value {
    let mut map = Map::new();
    for prop in &schema.properties {
        map.insert(prop.name.clone(), cell_to_value(prop, row));
    }
    Value::Object(map)
}

fn cell_to_value(prop: &PropertyDescriptor, row: &SqliteRow) -> Value {
    let name = prop.name.as_str();
    match prop.property_type {
        PropertyType::Int => match row.try_get::<Option<i64>, _>(name) {
            Ok(Some(n)) => Value::Number(n.into()),
            _ => Value::Null,
        },
        PropertyType::Bool => match row.try_get::<Option<i64>, _>(name) {
            Ok(Some(n)) => Value::Bool(n != 0),
            _ => Value::Null,
        },
        PropertyType::Float | PropertyType::Double => match row.try_get::<Option<f64>, _>(name) {
            Ok(Some(f)) => serde_json::Number::from_f64(f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            _ => Value::Null,
        },
        PropertyType::String | PropertyType::Data | PropertyType::Date => {
            match row.try_get::<Option<String>, _>(name) {
                Ok(Some(s)) => Value::String(s),
                _ => Value::Null,
            }
        }
        PropertyType::List | PropertyType::Object => match row.try_get::<Option<String>, _>(name) {
            Ok(Some(s)) => serde_json::from_str(&s).unwrap_or(Value::String(s)),
            _ => Value::Null,
        },
    }
}
