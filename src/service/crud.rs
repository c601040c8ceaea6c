//! Generic CRUD execution against the store.

use crate::config::Schema;
use crate::error::AppError;
use crate::service::{Filter, IdAllocator, Pagination, QueryTranslator, RecordValidator};
use crate::sql::{
    bind, bind_all, delete_by_key, insert_returning, row_to_json, upsert, BindValue, QueryBuf,
};
use crate::store::Store;
use serde_json::Value;
use sqlx::SqliteConnection;

pub struct CrudService;

impl CrudService {
    /// All records matching `filter`, in store order, sliced by `page` when requested.
    pub async fn find_all(
        store: &Store,
        schema: &Schema,
        filter: Option<&Filter>,
        page: Pagination,
    ) -> Result<Vec<Value>, AppError> {
        let q = QueryTranslator::translate(schema, filter, page)?;
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let rows = bind_all(sqlx::query(&q.sql), &q.params)
            .fetch_all(store.pool())
            .await?;
        Ok(rows.iter().map(|r| row_to_json(schema, r)).collect())
    }

    /// First record matching `filter`, or `None`.
    pub async fn find_one(
        store: &Store,
        schema: &Schema,
        filter: &Filter,
    ) -> Result<Option<Value>, AppError> {
        let rows = Self::find_all(store, schema, Some(filter), Pagination::default()).await?;
        Ok(rows.into_iter().next())
    }

    /// Record whose primary key renders as `id`.
    pub async fn find_by_id(store: &Store, schema: &Schema, id: &str) -> Result<Option<Value>, AppError> {
        let pk = schema
            .primary_key
            .as_deref()
            .ok_or_else(|| AppError::BadRequest(format!("{} has no primary key", schema.name)))?;
        Self::find_one(store, schema, &Filter::eq(pk, id)).await
    }

    /// Allocate a key if needed, validate and insert, all in one write transaction.
    /// Returns the row as stored, so it reads back identically through `find_by_id`.
    pub async fn create(store: &Store, schema: &Schema, body: Value) -> Result<Value, AppError> {
        let record = RecordValidator::into_object(body)?;
        let mut txn = store.begin_write().await?;
        let record = IdAllocator::assign_id(txn.conn(), schema, record).await?;
        RecordValidator::validate(schema, &record)?;
        let q = insert_returning(schema, &record);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query (tx)");
        let row = bind_all(sqlx::query(&q.sql), &q.params)
            .fetch_one(txn.conn())
            .await
            .map_err(rejection)?;
        let stored = row_to_json(schema, &row);
        txn.commit().await?;
        Ok(stored)
    }

    /// Create-or-replace keyed by the primary key in `body`. A schema without a primary key
    /// has nothing to replace by, so it is refused rather than appended to.
    pub async fn upsert(store: &Store, schema: &Schema, body: &Value) -> Result<(), AppError> {
        let pk = schema
            .primary_key
            .as_deref()
            .ok_or_else(|| AppError::BadRequest(format!("{} has no primary key", schema.name)))?;
        let record = body
            .as_object()
            .ok_or_else(|| AppError::Validation("body must be a JSON object".into()))?;
        RecordValidator::validate(schema, record)?;
        let mut txn = store.begin_write().await?;
        Self::execute(txn.conn(), &upsert(schema, pk, record)).await?;
        txn.commit().await
    }

    /// Delete the record whose key renders as `id`. `false` when there is none.
    pub async fn delete(store: &Store, schema: &Schema, id: &str) -> Result<bool, AppError> {
        let Some(found) = Self::find_by_id(store, schema, id).await? else {
            return Ok(false);
        };
        let pk = schema
            .primary_key_property()
            .ok_or_else(|| AppError::BadRequest(format!("{} has no primary key", schema.name)))?;
        let key = BindValue::from_json(pk, &found[pk.name.as_str()]);
        let sql = delete_by_key(schema, &pk.name);
        tracing::debug!(sql = %sql, key = ?key, "query");

        let mut txn = store.begin_write().await?;
        bind(sqlx::query(&sql), &key).execute(txn.conn()).await?;
        txn.commit().await?;
        Ok(true)
    }

    async fn execute(conn: &mut SqliteConnection, q: &QueryBuf) -> Result<(), AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query (tx)");
        bind_all(sqlx::query(&q.sql), &q.params)
            .execute(conn)
            .await
            .map_err(rejection)?;
        Ok(())
    }
}

/// Constraint failures raised by SQLite (duplicate key, NOT NULL, STRICT type) are the
/// store rejecting the record, not a broken store.
fn rejection(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::Database(db) => AppError::Constraint(db.message().to_string()),
        other => AppError::Db(other),
    }
}
