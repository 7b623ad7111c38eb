//! Provider seam — the single abstraction behind which all remote LLM
//! backends live.
//!
//! ARCHITECTURAL RULE: no other module may talk to an AI provider directly,
//! and the configured provider string is interpreted exactly once, in
//! `resolve_provider`. Everything downstream works against
//! `dyn ProviderClient`.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::analysis::AnalysisResult;
use crate::models::job::JobPosting;
use crate::models::profile::{ApiConfig, ProfileData};

pub mod bedrock;
pub mod gemini;
pub mod prompts;

/// Failure taxonomy for one provider call.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport, auth, timeout, or service failure talking to the backend.
    #[error("provider communication failed: {0}")]
    Communication(String),

    /// The model replied, but the reply does not contain a parseable analysis.
    #[error("provider response did not contain a valid analysis: {0}")]
    ResponseFormat(String),
}

/// The configuration names a provider with no implementation.
#[derive(Debug, Error)]
#[error("unsupported AI provider: {0}")]
pub struct UnsupportedProvider(pub String);

/// Uniform capability contract implemented once per provider variant.
/// Credentials are captured at construction from the caller-supplied config,
/// so concurrent calls share no mutable state.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Analyzes one job posting against the freelancer's profile.
    async fn analyze(
        &self,
        job: &JobPosting,
        profile: &ProfileData,
    ) -> Result<AnalysisResult, ProviderError>;

    /// Drafts a cover letter for one job. The text is accepted as-is —
    /// no schema applies, so `ResponseFormat` never occurs here.
    async fn generate_proposal(
        &self,
        job: &JobPosting,
        profile: &ProfileData,
        analysis: &AnalysisResult,
    ) -> Result<String, ProviderError>;
}

/// Closed enum of known provider variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Google,
    Aws,
}

impl ProviderKind {
    pub fn parse(provider: &str) -> Result<Self, UnsupportedProvider> {
        match provider {
            "google" => Ok(ProviderKind::Google),
            "aws" => Ok(ProviderKind::Aws),
            other => Err(UnsupportedProvider(other.to_string())),
        }
    }
}

/// Resolves the configured provider into a concrete client.
pub async fn resolve_provider(
    config: &ApiConfig,
) -> Result<Box<dyn ProviderClient>, UnsupportedProvider> {
    match ProviderKind::parse(&config.provider)? {
        ProviderKind::Google => Ok(Box::new(gemini::GeminiClient::new(config))),
        ProviderKind::Aws => Ok(Box::new(bedrock::BedrockClient::new(config).await)),
    }
}

/// Parses an analysis out of raw model output.
///
/// Models routinely wrap the object in prose or ```json fences, so this
/// locates the first `{` and the last `}` and parses only that window.
/// No braces, or malformed JSON inside them, is a `ResponseFormat` error.
pub(crate) fn parse_analysis(text: &str) -> Result<AnalysisResult, ProviderError> {
    let window = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => {
            return Err(ProviderError::ResponseFormat(
                "no JSON object found in model output".to_string(),
            ))
        }
    };
    serde_json::from_str(window).map_err(|e| ProviderError::ResponseFormat(e.to_string()))
}
