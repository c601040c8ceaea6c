//! Query translation: REST-level filters and pagination to store predicates and a window.

use crate::config::Schema;
use crate::error::AppError;
use crate::sql::{select_list, Predicate, QueryBuf, Window};
use std::collections::BTreeMap;

/// Filters applied to a collection before slicing.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    /// Conjunction of `property == value`, compared on the property's text rendering.
    Equals(BTreeMap<String, String>),
    /// Advanced: a raw SQL predicate passed through verbatim. See [`RawPredicate`].
    Raw(RawPredicate),
}

impl Filter {
    pub fn eq(property: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Equals(BTreeMap::from([(property.into(), value.into())]))
    }
}

/// A raw SQL expression for the WHERE clause.
///
/// Nothing escapes or checks it, so it must never be built from request input. The HTTP
/// routes only ever produce [`Filter::Equals`].
#[derive(Clone, Debug, PartialEq)]
pub struct RawPredicate(String);

impl RawPredicate {
    pub fn new_unchecked(expr: impl Into<String>) -> Self {
        RawPredicate(expr.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Requested offset/limit. Applied only when at least one is set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pagination {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl Pagination {
    pub const DEFAULT_LIMIT: u32 = 20;

    pub fn new(limit: Option<u32>, offset: Option<u32>) -> Self {
        Pagination { limit, offset }
    }

    pub fn window(&self) -> Option<Window> {
        if self.limit.is_none() && self.offset.is_none() {
            return None;
        }
        Some(Window {
            offset: self.offset.unwrap_or(0),
            limit: self.limit.unwrap_or(Self::DEFAULT_LIMIT),
        })
    }
}

pub struct QueryTranslator;

impl QueryTranslator {
    /// Build the SELECT for `find_all`. Equality keys must be schema properties.
    pub fn translate(
        schema: &Schema,
        filter: Option<&Filter>,
        page: Pagination,
    ) -> Result<QueryBuf, AppError> {
        let predicates = match filter {
            None => Vec::new(),
            Some(Filter::Equals(pairs)) => pairs
                .iter()
                .map(|(key, value)| {
                    if schema.property(key).is_none() {
                        return Err(AppError::Validation(format!(
                            "{} has no property '{}'",
                            schema.name, key
                        )));
                    }
                    Ok(Predicate::Equals {
                        column: key.clone(),
                        value: value.clone(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(Filter::Raw(raw)) => vec![Predicate::Raw(raw.as_str().to_string())],
        };
        Ok(select_list(schema, &predicates, page.window()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{resolve, SchemaConfig};
    use crate::sql::BindValue;

    fn car() -> std::sync::Arc<Schema> {
        let configs: Vec<SchemaConfig> = serde_json::from_str(
            r#"[{"name": "Car", "primaryKey": "id", "properties": {"id": "int", "make": "string"}}]"#,
        )
        .unwrap();
        resolve(&configs).unwrap().schemas[0].clone()
    }

    #[test]
    fn pagination_defaults_the_missing_half() {
        assert_eq!(Pagination::default().window(), None);
        assert_eq!(
            Pagination::new(Some(5), None).window(),
            Some(Window { offset: 0, limit: 5 })
        );
        assert_eq!(
            Pagination::new(None, Some(40)).window(),
            Some(Window { offset: 40, limit: 20 })
        );
    }

    #[test]
    fn equality_filters_become_bound_predicates() {
        let q = QueryTranslator::translate(&car(), Some(&Filter::eq("make", "Toyota")), Pagination::default())
            .unwrap();
        assert!(q.sql.contains("WHERE CAST(\"make\" AS TEXT) = ?"));
        assert_eq!(q.params, vec![BindValue::Text("Toyota".into())]);
    }

    #[test]
    fn filter_values_are_never_interpolated() {
        let q = QueryTranslator::translate(
            &car(),
            Some(&Filter::eq("make", "x\" OR 1=1 --")),
            Pagination::default(),
        )
        .unwrap();
        assert!(!q.sql.contains("OR 1=1"));
    }

    #[test]
    fn unknown_filter_key_is_rejected() {
        let err = QueryTranslator::translate(&car(), Some(&Filter::eq("color", "red")), Pagination::default())
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
