//! Builds parameterized SELECT, INSERT, upsert and DELETE statements from a resolved schema.
//! Identifiers come from validated schema config only; values are always bound parameters.

use crate::config::{PropertyType, Schema};
use crate::sql::BindValue;
use serde_json::{Map, Value};

/// Quote identifier for SQLite (safe: only from config).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }
}

/// One conjunct of a WHERE clause.
#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    /// String-rendered column equals the literal.
    Equals { column: String, value: String },
    /// Verbatim SQL expression.
    Raw(String),
}

/// Offset/limit slice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    pub offset: u32,
    pub limit: u32,
}

/// Column rendered as text for equality comparison: bools as 'true'/'false', everything else cast.
fn rendered(schema: &Schema, column: &str) -> String {
    let q = quoted(column);
    match schema.property(column).map(|p| p.property_type) {
        Some(PropertyType::Bool) => format!("CASE {} WHEN 1 THEN 'true' WHEN 0 THEN 'false' END", q),
        _ => format!("CAST({} AS TEXT)", q),
    }
}

fn column_list(schema: &Schema) -> String {
    schema
        .properties
        .iter()
        .map(|p| quoted(&p.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// SELECT with an AND of predicates, rowid order, optional LIMIT/OFFSET.
pub fn select_list(schema: &Schema, predicates: &[Predicate], window: Option<Window>) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("SELECT {} FROM {}", column_list(schema), quoted(&schema.name));
    if !predicates.is_empty() {
        let clauses: Vec<String> = predicates
            .iter()
            .map(|p| match p {
                Predicate::Equals { column, value } => {
                    q.params.push(BindValue::Text(value.clone()));
                    format!("{} = ?", rendered(schema, column))
                }
                Predicate::Raw(expr) => format!("({})", expr),
            })
            .collect();
        q.sql.push_str(" WHERE ");
        q.sql.push_str(&clauses.join(" AND "));
    }
    q.sql.push_str(" ORDER BY rowid");
    if let Some(w) = window {
        q.sql.push_str(" LIMIT ? OFFSET ?");
        q.params.push(BindValue::Int(i64::from(w.limit)));
        q.params.push(BindValue::Int(i64::from(w.offset)));
    }
    q
}

/// Highest primary key: sort descending, take the first.
pub fn select_max_key(schema: &Schema, pk: &str) -> String {
    format!(
        "SELECT {pk} FROM {table} ORDER BY {pk} DESC LIMIT 1",
        pk = quoted(pk),
        table = quoted(&schema.name)
    )
}

fn insert_values(schema: &Schema, record: &Map<String, Value>) -> (String, Vec<BindValue>) {
    let placeholders = vec!["?"; schema.properties.len()].join(", ");
    let params = schema
        .properties
        .iter()
        .map(|p| {
            record
                .get(&p.name)
                .map(|v| BindValue::from_json(p, v))
                .unwrap_or(BindValue::Null)
        })
        .collect();
    (placeholders, params)
}

/// INSERT of every schema property; absent properties are NULL.
pub fn insert(schema: &Schema, record: &Map<String, Value>) -> QueryBuf {
    let (placeholders, params) = insert_values(schema, record);
    QueryBuf {
        sql: format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quoted(&schema.name),
            column_list(schema),
            placeholders
        ),
        params,
    }
}

/// INSERT that hands back the stored row, so omitted optionals come back as null.
pub fn insert_returning(schema: &Schema, record: &Map<String, Value>) -> QueryBuf {
    let mut q = insert(schema, record);
    q.sql.push_str(&format!(" RETURNING {}", column_list(schema)));
    q
}

/// INSERT that replaces every non-key column when `pk` already exists.
pub fn upsert(schema: &Schema, pk: &str, record: &Map<String, Value>) -> QueryBuf {
    let mut q = insert(schema, record);
    let assignments: Vec<String> = schema
        .properties
        .iter()
        .filter(|p| p.name != pk)
        .map(|p| format!("{c} = excluded.{c}", c = quoted(&p.name)))
        .collect();
    if assignments.is_empty() {
        q.sql.push_str(&format!(" ON CONFLICT ({}) DO NOTHING", quoted(pk)));
    } else {
        q.sql.push_str(&format!(
            " ON CONFLICT ({}) DO UPDATE SET {}",
            quoted(pk),
            assignments.join(", ")
        ));
    }
    q
}

/// DELETE by primary key. Caller binds the key.
pub fn delete_by_key(schema: &Schema, pk: &str) -> String {
    format!("DELETE FROM {} WHERE {} = ?", quoted(&schema.name), quoted(pk))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{resolve, SchemaConfig};
    use serde_json::json;
    use std::sync::Arc;

    fn car() -> Arc<Schema> {
        let configs: Vec<SchemaConfig> = serde_json::from_str(
            r#"[{"name": "Car", "primaryKey": "id",
                 "properties": {"id": "int", "make": "string", "sold": "bool"}}]"#,
        )
        .unwrap();
        resolve(&configs).unwrap().schemas[0].clone()
    }

    #[test]
    fn select_without_predicates() {
        let q = select_list(&car(), &[], None);
        assert_eq!(q.sql, "SELECT \"id\", \"make\", \"sold\" FROM \"Car\" ORDER BY rowid");
        assert!(q.params.is_empty());
    }

    #[test]
    fn select_binds_equality_values_as_text() {
        let q = select_list(
            &car(),
            &[
                Predicate::Equals { column: "make".into(), value: "Toyota".into() },
                Predicate::Equals { column: "sold".into(), value: "true".into() },
            ],
            Some(Window { offset: 1, limit: 2 }),
        );
        assert_eq!(
            q.sql,
            "SELECT \"id\", \"make\", \"sold\" FROM \"Car\" WHERE CAST(\"make\" AS TEXT) = ? AND \
             CASE \"sold\" WHEN 1 THEN 'true' WHEN 0 THEN 'false' END = ? ORDER BY rowid LIMIT ? OFFSET ?"
        );
        assert_eq!(
            q.params,
            vec![
                BindValue::Text("Toyota".into()),
                BindValue::Text("true".into()),
                BindValue::Int(2),
                BindValue::Int(1),
            ]
        );
    }

    #[test]
    fn raw_predicates_are_parenthesized() {
        let q = select_list(&car(), &[Predicate::Raw("id > 3 OR make = 'x'".into())], None);
        assert!(q.sql.contains("WHERE (id > 3 OR make = 'x') ORDER BY rowid"));
    }

    #[test]
    fn upsert_replaces_non_key_columns() {
        let record = json!({"id": 3, "make": "Honda", "sold": false});
        let q = upsert(&car(), "id", record.as_object().unwrap());
        assert_eq!(
            q.sql,
            "INSERT INTO \"Car\" (\"id\", \"make\", \"sold\") VALUES (?, ?, ?) ON CONFLICT (\"id\") \
             DO UPDATE SET \"make\" = excluded.\"make\", \"sold\" = excluded.\"sold\""
        );
        assert_eq!(
            q.params,
            vec![BindValue::Int(3), BindValue::Text("Honda".into()), BindValue::Int(0)]
        );
    }

    #[test]
    fn insert_returns_every_column() {
        let record = json!({"make": "Kia"});
        let q = insert_returning(&car(), record.as_object().unwrap());
        assert_eq!(
            q.sql,
            "INSERT INTO \"Car\" (\"id\", \"make\", \"sold\") VALUES (?, ?, ?) \
             RETURNING \"id\", \"make\", \"sold\""
        );
        assert_eq!(q.params, vec![BindValue::Null, BindValue::Text("Kia".into()), BindValue::Null]);
    }

    #[test]
    fn max_key_and_delete() {
        let car = car();
        assert_eq!(
            select_max_key(&car, "id"),
            "SELECT \"id\" FROM \"Car\" ORDER BY \"id\" DESC LIMIT 1"
        );
        assert_eq!(delete_by_key(&car, "id"), "DELETE FROM \"Car\" WHERE \"id\" = ?");
    }
}
