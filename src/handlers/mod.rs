//! HTTP handlers for schema-derived record routes.

pub mod entity;
pub use entity::*;
