pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::profile::handlers as profile;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route("/jobs/analyze", post(analysis::handle_analyze_job))
        .route("/jobs/analyze-all", post(analysis::handle_analyze_all))
        .route(
            "/proposals/generate",
            post(analysis::handle_generate_proposal),
        )
        // Profile / configuration store
        .route(
            "/api/config",
            get(profile::handle_get_config).post(profile::handle_update_config),
        )
        .route(
            "/local-profile",
            get(profile::handle_get_profile).post(profile::handle_update_profile),
        )
        .with_state(state)
}
