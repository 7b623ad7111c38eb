//! Google (Gemini) provider variant, via the generateContent REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::analysis::AnalysisResult;
use crate::models::job::JobPosting;
use crate::models::profile::{ApiConfig, ProfileData};
use crate::providers::{parse_analysis, prompts, ProviderClient, ProviderError};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const MODEL: &str = "gemini-2.5-flash";

/// Per-call timeouts. Proposal drafting produces longer output and gets more
/// headroom.
const ANALYSIS_TIMEOUT: Duration = Duration::from_secs(120);
const PROPOSAL_TIMEOUT: Duration = Duration::from_secs(180);

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

pub struct GeminiClient {
    http: Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            http: Client::new(),
            api_key: config.google_api_key.clone(),
        }
    }

    /// One generateContent call, returning the first text part of the first
    /// candidate. `json_output` asks the API for an application/json reply.
    async fn generate(
        &self,
        prompt: &str,
        json_output: bool,
        timeout: Duration,
    ) -> Result<String, ProviderError> {
        let url = format!("{GEMINI_API_BASE}/{MODEL}:generateContent");
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: json_output.then_some(GenerationConfig {
                response_mime_type: "application/json",
            }),
        };

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .timeout(timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Communication(format!("Gemini request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ProviderError::Communication(format!(
                "Gemini returned {status}: {detail}"
            )));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            ProviderError::Communication(format!("failed to read Gemini response body: {e}"))
        })?;

        debug!("Gemini call returned {} candidate(s)", parsed.candidates.len());

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
            .ok_or_else(|| {
                ProviderError::Communication("Gemini returned no text content".to_string())
            })
    }
}

#[async_trait]
impl ProviderClient for GeminiClient {
    async fn analyze(
        &self,
        job: &JobPosting,
        profile: &ProfileData,
    ) -> Result<AnalysisResult, ProviderError> {
        info!(job = %job.label(), "starting Gemini analysis");
        let prompt = prompts::analysis_prompt(job, profile);
        let text = self.generate(&prompt, true, ANALYSIS_TIMEOUT).await?;
        let analysis = parse_analysis(&text)?;
        info!(job = %job.label(), "parsed Gemini analysis");
        Ok(analysis)
    }

    async fn generate_proposal(
        &self,
        job: &JobPosting,
        profile: &ProfileData,
        analysis: &AnalysisResult,
    ) -> Result<String, ProviderError> {
        info!(job = %job.label(), "starting Gemini proposal generation");
        let prompt = prompts::proposal_prompt(job, profile, analysis);
        self.generate(&prompt, false, PROPOSAL_TIMEOUT).await
    }
}
