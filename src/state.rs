//! Shared application state for all routes.

use crate::config::ResolvedModel;
use crate::fault::FaultReporter;
use crate::store::Store;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub model: Arc<ResolvedModel>,
    pub faults: FaultReporter,
}
