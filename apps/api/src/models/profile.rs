use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The freelancer's profile as supplied with each analysis request.
/// Typed core fields plus a flattened map for whatever extra fields the
/// marketplace profile carries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileData {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub education: Vec<String>,
    pub location: Option<String>,
    pub additional_details: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// AI provider selection and credentials. Persisted encrypted as part of the
/// profile record. The `provider` string is interpreted exactly once, at
/// provider-resolution time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub google_api_key: String,
    #[serde(default)]
    pub aws_access_key_id: String,
    #[serde(default)]
    pub aws_secret_access_key: String,
    #[serde(default = "default_aws_region")]
    pub aws_region: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            google_api_key: String::new(),
            aws_access_key_id: String::new(),
            aws_secret_access_key: String::new(),
            aws_region: default_aws_region(),
        }
    }
}

fn default_provider() -> String {
    "google".to_string()
}

fn default_aws_region() -> String {
    "us-west-2".to_string()
}

/// The single record held by the encrypted profile store: locally maintained
/// profile fields plus the API configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileRecord {
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub additional_details: String,
    #[serde(default)]
    pub local_skills: Vec<String>,
    #[serde(default)]
    pub local_certificates: Vec<String>,
    #[serde(default)]
    pub local_education: Vec<String>,
    #[serde(default)]
    pub api_config: ApiConfig,
}

/// Update payload for the profile fields only. `api_config` is deliberately
/// absent: profile edits must not touch stored credentials.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileFields {
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub additional_details: String,
    #[serde(default)]
    pub local_skills: Vec<String>,
    #[serde(default)]
    pub local_certificates: Vec<String>,
    #[serde(default)]
    pub local_education: Vec<String>,
}
