//! Axum route handlers for the locally stored profile and API configuration.
//!
//! Both endpoints operate on the single encrypted record: updates are
//! read-modify-write so a profile edit never clobbers stored credentials and
//! a config edit never clobbers profile fields.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::profile::{ApiConfig, ProfileFields, ProfileRecord};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// GET /local-profile
pub async fn handle_get_profile(State(state): State<AppState>) -> Json<ProfileRecord> {
    Json(state.store.read().await)
}

/// POST /local-profile
///
/// Updates the profile fields, preserving the stored `api_config`.
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Json(fields): Json<ProfileFields>,
) -> Result<Json<StatusResponse>, AppError> {
    let mut record = state.store.read().await;
    record.location = fields.location;
    record.additional_details = fields.additional_details;
    record.local_skills = fields.local_skills;
    record.local_certificates = fields.local_certificates;
    record.local_education = fields.local_education;
    state.store.write(&record).await?;

    Ok(Json(StatusResponse {
        status: "success",
        message: "Local profile updated successfully.",
    }))
}

/// GET /api/config
pub async fn handle_get_config(State(state): State<AppState>) -> Json<ApiConfig> {
    Json(state.store.read().await.api_config)
}

/// POST /api/config
///
/// Replaces the stored provider selection and credentials. The provider
/// string is accepted as-is here; it is validated at resolution time so a
/// stored-but-unknown provider surfaces on use, not on save.
pub async fn handle_update_config(
    State(state): State<AppState>,
    Json(config): Json<ApiConfig>,
) -> Result<Json<StatusResponse>, AppError> {
    let mut record = state.store.read().await;
    record.api_config = config;
    state.store.write(&record).await?;

    Ok(Json(StatusResponse {
        status: "success",
        message: "API configuration updated successfully.",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::bulk::BulkOptions;
    use crate::storage::ProfileStore;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;

    fn state_at(dir: &tempfile::TempDir) -> AppState {
        let key = BASE64.encode([3u8; 32]);
        AppState {
            store: ProfileStore::new(dir.path().join("profile.enc"), &key).unwrap(),
            bulk: BulkOptions::default(),
        }
    }

    #[tokio::test]
    async fn test_profile_update_preserves_api_config() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_at(&dir);

        let config = ApiConfig {
            provider: "aws".to_string(),
            aws_access_key_id: "AKIAEXAMPLE".to_string(),
            ..Default::default()
        };
        handle_update_config(State(state.clone()), Json(config))
            .await
            .unwrap();

        let fields = ProfileFields {
            location: "Berlin, Germany".to_string(),
            local_skills: vec!["rust".to_string()],
            ..Default::default()
        };
        handle_update_profile(State(state.clone()), Json(fields))
            .await
            .unwrap();

        let record = state.store.read().await;
        assert_eq!(record.location, "Berlin, Germany");
        assert_eq!(record.api_config.provider, "aws");
        assert_eq!(record.api_config.aws_access_key_id, "AKIAEXAMPLE");
    }

    #[tokio::test]
    async fn test_config_update_preserves_profile_fields() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_at(&dir);

        let fields = ProfileFields {
            additional_details: "Ten years of backend work.".to_string(),
            ..Default::default()
        };
        handle_update_profile(State(state.clone()), Json(fields))
            .await
            .unwrap();

        let config = ApiConfig {
            google_api_key: "key-123".to_string(),
            ..Default::default()
        };
        handle_update_config(State(state.clone()), Json(config))
            .await
            .unwrap();

        let record = state.store.read().await;
        assert_eq!(record.additional_details, "Ten years of backend work.");
        assert_eq!(record.api_config.google_api_key, "key-123");
    }
}
