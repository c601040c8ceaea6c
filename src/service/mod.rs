//! Store-facing services: query translation, id allocation, validation, CRUD.

mod crud;
mod ids;
mod query;
mod validation;
pub use crud::CrudService;
pub use ids::IdAllocator;
pub use query::{Filter, Pagination, QueryTranslator, RawPredicate};
pub use validation::RecordValidator;
