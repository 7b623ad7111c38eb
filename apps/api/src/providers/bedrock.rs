//! AWS (Bedrock) provider variant, via the Converse API.

use std::time::Duration;

use async_trait::async_trait;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_bedrockruntime::config::Credentials;
use aws_sdk_bedrockruntime::types::{ContentBlock, ConversationRole, Message};
use aws_sdk_bedrockruntime::Client;
use tracing::{debug, info};

use crate::models::analysis::AnalysisResult;
use crate::models::job::JobPosting;
use crate::models::profile::{ApiConfig, ProfileData};
use crate::providers::{parse_analysis, prompts, ProviderClient, ProviderError};

pub const MODEL_ID: &str = "us.amazon.nova-lite-v1:0";
const OPERATION_TIMEOUT: Duration = Duration::from_secs(120);

pub struct BedrockClient {
    client: Client,
}

impl BedrockClient {
    /// Builds a Bedrock runtime client for the given config. Keys stored in
    /// the user's configuration take precedence; otherwise the SDK's default
    /// credential chain (env, ~/.aws) applies.
    pub async fn new(config: &ApiConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.aws_region.clone()))
            .timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(OPERATION_TIMEOUT)
                    .build(),
            );

        if !config.aws_access_key_id.is_empty() && !config.aws_secret_access_key.is_empty() {
            debug!("using AWS credentials from the stored configuration");
            loader = loader.credentials_provider(Credentials::new(
                &config.aws_access_key_id,
                &config.aws_secret_access_key,
                None,
                None,
                "user-config",
            ));
        } else {
            debug!("using AWS credentials from the environment");
        }

        let shared_config = loader.load().await;
        Self {
            client: Client::new(&shared_config),
        }
    }

    /// One Converse call, returning the first text block of the reply.
    async fn converse(&self, prompt: &str) -> Result<String, ProviderError> {
        let message = Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Text(prompt.to_string()))
            .build()
            .map_err(|e| {
                ProviderError::Communication(format!("failed to build Bedrock message: {e}"))
            })?;

        let response = self
            .client
            .converse()
            .model_id(MODEL_ID)
            .messages(message)
            .send()
            .await
            .map_err(|e| {
                ProviderError::Communication(format!("Bedrock converse call failed: {e}"))
            })?;

        let output = response.output.ok_or_else(|| {
            ProviderError::Communication("Bedrock returned no output".to_string())
        })?;
        let message = output.as_message().map_err(|_| {
            ProviderError::Communication("Bedrock output was not a message".to_string())
        })?;

        message
            .content()
            .iter()
            .find_map(|block| block.as_text().ok().cloned())
            .ok_or_else(|| {
                ProviderError::Communication("Bedrock reply contained no text block".to_string())
            })
    }
}

#[async_trait]
impl ProviderClient for BedrockClient {
    async fn analyze(
        &self,
        job: &JobPosting,
        profile: &ProfileData,
    ) -> Result<AnalysisResult, ProviderError> {
        info!(job = %job.label(), "starting Bedrock analysis");
        let prompt = prompts::analysis_prompt(job, profile);
        let text = self.converse(&prompt).await?;
        let analysis = parse_analysis(&text)?;
        info!(job = %job.label(), "parsed Bedrock analysis");
        Ok(analysis)
    }

    async fn generate_proposal(
        &self,
        job: &JobPosting,
        profile: &ProfileData,
        analysis: &AnalysisResult,
    ) -> Result<String, ProviderError> {
        info!(job = %job.label(), "starting Bedrock proposal generation");
        let prompt = prompts::proposal_prompt(job, profile, analysis);
        self.converse(&prompt).await
    }
}
