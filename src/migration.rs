//! Create one STRICT table per schema if it does not exist yet. Existing tables are left as they are.

use crate::config::{PropertyType, ResolvedModel, Schema};
use crate::error::AppError;
use crate::sql::quoted;
use crate::store::Store;

/// CREATE TABLE statement for a schema.
pub fn create_table_sql(schema: &Schema) -> String {
    let columns = schema
        .properties
        .iter()
        .map(|p| {
            let mut col = format!("{} {}", quoted(&p.name), p.property_type.sql_type());
            if schema.primary_key.as_deref() == Some(p.name.as_str()) {
                col.push_str(" PRIMARY KEY");
            }
            if !p.optional {
                col.push_str(" NOT NULL");
            }
            if p.property_type == PropertyType::Bool {
                col.push_str(&format!(" CHECK ({} IN (0, 1))", quoted(&p.name)));
            }
            col
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({}) STRICT",
        quoted(&schema.name),
        columns
    )
}

pub async fn apply_migrations(store: &Store, model: &ResolvedModel) -> Result<(), AppError> {
    for schema in &model.schemas {
        let ddl = create_table_sql(schema);
        tracing::debug!(sql = %ddl, "migration");
        sqlx::query(&ddl).execute(store.pool()).await?;
        tracing::info!(schema = %schema.name, path = %schema.base_path(), "table ready");
    }
    Ok(())
}
