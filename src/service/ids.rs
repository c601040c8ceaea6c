//! Primary key allocation for creates that omit an integer key.

use crate::config::{PropertyType, Schema};
use crate::error::AppError;
use crate::sql::select_max_key;
use serde_json::{Map, Value};
use sqlx::SqliteConnection;

pub struct IdAllocator;

impl IdAllocator {
    /// The key to fill in, if any: the schema has an `int` primary key and the record
    /// leaves it absent or null. Caller-supplied keys are never overwritten.
    pub fn missing_key<'s>(schema: &'s Schema, record: &Map<String, Value>) -> Option<&'s str> {
        let pk = schema.primary_key_property()?;
        if pk.property_type != PropertyType::Int {
            return None;
        }
        match record.get(&pk.name) {
            None | Some(Value::Null) => Some(pk.name.as_str()),
            Some(_) => None,
        }
    }

    /// `max + 1`, or 1 for an empty collection. No key is left above `i64::MAX`.
    pub fn next_id(current_max: Option<i64>) -> Result<i64, AppError> {
        match current_max {
            None => Ok(1),
            Some(max) => max
                .checked_add(1)
                .ok_or_else(|| AppError::Constraint(format!("key space exhausted after {}", max))),
        }
    }

    /// Fill in the next key. Run on the write transaction that performs the insert so the
    /// read and the insert are one atomic step.
    pub async fn assign_id(
        conn: &mut SqliteConnection,
        schema: &Schema,
        mut record: Map<String, Value>,
    ) -> Result<Map<String, Value>, AppError> {
        let Some(pk) = Self::missing_key(schema, &record) else {
            return Ok(record);
        };
        let sql = select_max_key(schema, pk);
        tracing::debug!(sql = %sql, "query");
        let current: Option<i64> = sqlx::query_scalar(&sql).fetch_optional(&mut *conn).await?;
        let id = Self::next_id(current)?;
        tracing::debug!(schema = %schema.name, id, "allocated id");
        record.insert(pk.to_string(), Value::Number(id.into()));
        Ok(record)
    }
}
