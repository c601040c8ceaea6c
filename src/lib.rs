//! schemarest: REST routes generated from declarative object schemas, backed by an embedded SQLite store.

pub mod config;
pub mod error;
pub mod fault;
pub mod migration;
pub mod response;
pub mod sql;
pub mod state;
pub mod store;
pub mod service;
pub mod handlers;
pub mod routes;
pub mod server;

pub use config::{load_from_path, resolve, ResolvedModel, Schema, SchemaConfig, Settings};
pub use error::{AppError, ConfigError, ServeError};
pub use fault::{fault_channel, CreateFailurePolicy, Fault, FaultReceiver, FaultReporter};
pub use migration::apply_migrations;
pub use routes::{app, common_routes, entity_routes};
pub use server::serve;
pub use service::{CrudService, Filter, Pagination, RawPredicate};
pub use state::AppState;
pub use store::Store;
