use serde::{Deserialize, Serialize};

use crate::models::job::JobPosting;

/// Structured suitability analysis produced by a provider for one job.
///
/// The summary and the three lists are required by the schema; a missing or
/// null `suitability_score` still parses, but an unscored analysis is
/// excluded from ranking (unscored is not zero).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub suitability_score: Option<u8>,
    pub analysis_summary: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub proposal_suggestions: Vec<String>,
}

/// A successful analysis with its originating job attached, as returned to
/// callers of the bulk endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct RankedAnalysis {
    #[serde(flatten)]
    pub analysis: AnalysisResult,
    pub job_data: JobPosting,
}
