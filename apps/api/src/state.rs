use crate::analysis::bulk::BulkOptions;
use crate::storage::ProfileStore;

/// Shared application state injected into all route handlers via Axum
/// extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: ProfileStore,
    /// Batch size and pacing for bulk analysis, fixed at startup.
    pub bulk: BulkOptions,
}
