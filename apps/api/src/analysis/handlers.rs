//! Axum route handlers for the analysis and proposal endpoints.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::analysis::bulk;
use crate::errors::AppError;
use crate::models::analysis::{AnalysisResult, RankedAnalysis};
use crate::models::job::JobPosting;
use crate::models::profile::ProfileData;
use crate::providers::resolve_provider;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BulkAnalyzeRequest {
    pub jobs: Vec<JobPosting>,
    pub profile: ProfileData,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub job: JobPosting,
    pub profile: ProfileData,
}

#[derive(Debug, Deserialize)]
pub struct ProposalRequest {
    pub job: JobPosting,
    pub profile: ProfileData,
    pub analysis: AnalysisResult,
}

#[derive(Debug, Serialize)]
pub struct ProposalResponse {
    pub proposal_text: String,
}

/// POST /jobs/analyze-all
///
/// Loads the stored API configuration, resolves the provider once, and runs
/// the bulk orchestrator. Per-job failures and unsupported-provider skips are
/// contained in the orchestrator and never fail the call.
pub async fn handle_analyze_all(
    State(state): State<AppState>,
    Json(req): Json<BulkAnalyzeRequest>,
) -> Result<Json<Vec<RankedAnalysis>>, AppError> {
    let record = state.store.read().await;

    let provider = match resolve_provider(&record.api_config).await {
        Ok(provider) => Some(provider),
        Err(e) => {
            error!(error = %e, "bulk analysis has no usable provider, all jobs will be skipped");
            None
        }
    };

    let ranked = bulk::analyze_all(provider.as_deref(), &req.jobs, &req.profile, &state.bulk).await;
    Ok(Json(ranked))
}

/// POST /jobs/analyze
///
/// Single-job interactive path, bypasses the orchestrator. Provider failures
/// map to 424, an unsupported provider to 400.
pub async fn handle_analyze_job(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResult>, AppError> {
    info!(job = %req.job.label(), "received single-job analysis request");
    let record = state.store.read().await;
    let provider = resolve_provider(&record.api_config).await?;
    let analysis = provider.analyze(&req.job, &req.profile).await?;
    Ok(Json(analysis))
}

/// POST /proposals/generate
///
/// Drafts a cover letter for one job via the configured provider.
pub async fn handle_generate_proposal(
    State(state): State<AppState>,
    Json(req): Json<ProposalRequest>,
) -> Result<Json<ProposalResponse>, AppError> {
    info!(job = %req.job.label(), "received proposal generation request");
    let record = state.store.read().await;
    let provider = resolve_provider(&record.api_config).await?;
    let proposal_text = provider
        .generate_proposal(&req.job, &req.profile, &req.analysis)
        .await?;
    Ok(Json(ProposalResponse { proposal_text }))
}
