//! Record routes generated from the resolved model.
//! Every schema gets `GET/POST/PUT /{name}`; schemas with a primary key also get `GET/DELETE /{name}/:id`.
//! Handlers close over the schema they serve, so adding a schema needs no routing code.

use crate::config::Schema;
use crate::handlers::entity::{create, delete as delete_handler, list, read, update};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

pub fn entity_routes(state: AppState) -> Router {
    let router = state
        .model
        .schemas
        .iter()
        .fold(Router::new(), |router, schema| schema_routes(router, schema.clone()));
    router.with_state(state)
}

fn schema_routes(router: Router<AppState>, schema: Arc<Schema>) -> Router<AppState> {
    let base = schema.base_path();
    tracing::debug!(schema = %schema.name, path = %base, keyed = schema.primary_key.is_some(), "routes");

    let (s_list, s_create, s_update) = (schema.clone(), schema.clone(), schema.clone());
    let collection = get(
        move |State(state): State<AppState>, Query(params): Query<HashMap<String, String>>| {
            list(state, s_list.clone(), params)
        },
    )
    .post(move |State(state): State<AppState>, Json(body): Json<Value>| {
        create(state, s_create.clone(), body)
    })
    .put(move |State(state): State<AppState>, Json(body): Json<Value>| {
        update(state, s_update.clone(), body)
    });
    let router = router.route(&base, collection);

    if schema.primary_key.is_none() {
        return router;
    }
    let (s_read, s_delete) = (schema.clone(), schema);
    let item = get(move |State(state): State<AppState>, Path(id): Path<String>| {
        read(state, s_read.clone(), id)
    })
    .delete(move |State(state): State<AppState>, Path(id): Path<String>| {
        delete_handler(state, s_delete.clone(), id)
    });
    router.route(&format!("{}/:id", base), item)
}
