//! Record handlers. Each takes the schema it was registered for; see `routes::entity`.

use crate::config::Schema;
use crate::error::AppError;
use crate::fault::Fault;
use crate::response::{empty, ok_json, text};
use crate::service::{CrudService, Filter, Pagination};
use crate::state::AppState;
use axum::{http::StatusCode, response::Response};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Split list query params into equality filters and pagination.
/// Unknown keys and unparseable limit/offset values are ignored; a limit must be positive.
pub fn list_params(schema: &Schema, params: HashMap<String, String>) -> (Option<Filter>, Pagination) {
    let mut page = Pagination::default();
    let mut equals = BTreeMap::new();
    for (k, v) in params {
        match k.as_str() {
            "limit" => page.limit = v.parse().ok().filter(|n: &u32| *n > 0),
            "offset" => page.offset = v.parse().ok(),
            _ => {
                if schema.property(&k).is_some() {
                    equals.insert(k, v);
                }
            }
        }
    }
    let filter = (!equals.is_empty()).then_some(Filter::Equals(equals));
    (filter, page)
}

pub async fn read(state: AppState, schema: Arc<Schema>, id: String) -> Result<Response, AppError> {
    let row = CrudService::find_by_id(&state.store, &schema, &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{}/{}", schema.path_segment, id)))?;
    Ok(ok_json(row))
}

pub async fn list(
    state: AppState,
    schema: Arc<Schema>,
    params: HashMap<String, String>,
) -> Result<Response, AppError> {
    let (filter, page) = list_params(&schema, params);
    let rows = CrudService::find_all(&state.store, &schema, filter.as_ref(), page).await?;
    Ok(ok_json(rows))
}

/// Any failure is answered with 400 and its message, then handed to the fault reporter.
pub async fn create(state: AppState, schema: Arc<Schema>, body: Value) -> Response {
    match CrudService::create(&state.store, &schema, body).await {
        Ok(row) => ok_json(row),
        Err(e) => {
            let message = e.to_string();
            let response = text(StatusCode::BAD_REQUEST, message.clone());
            state.faults.report(Fault {
                schema: schema.name.clone(),
                message,
            });
            response
        }
    }
}

/// Echoes the body. Store failures are not answered specially.
pub async fn update(state: AppState, schema: Arc<Schema>, body: Value) -> Result<Response, AppError> {
    CrudService::upsert(&state.store, &schema, &body)
        .await
        .map_err(AppError::unhandled)?;
    Ok(ok_json(body))
}

pub async fn delete(state: AppState, schema: Arc<Schema>, id: String) -> Result<Response, AppError> {
    let deleted = CrudService::delete(&state.store, &schema, &id)
        .await
        .map_err(AppError::unhandled)?;
    if deleted {
        Ok(empty(StatusCode::OK))
    } else {
        Err(AppError::NotFound(format!("{}/{}", schema.path_segment, id)))
    }
}
