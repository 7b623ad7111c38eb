use serde::{Deserialize, Serialize};

/// Client reputation block attached to a marketplace job posting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientInfo {
    pub country: Option<String>,
    pub total_feedback: Option<f64>,
    pub total_posted_jobs: Option<i64>,
    pub total_hires: Option<i64>,
    pub verification_status: Option<String>,
    pub total_reviews: Option<i64>,
}

/// One marketplace job posting, as received from the frontend.
/// Every field is optional — postings arrive semi-structured and we never
/// reject a job for missing metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: Option<String>,
    pub id: Option<String>,
    pub url: Option<String>,
    pub snippet: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub date_created: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub job_type: Option<String>,
    pub rate_display: Option<String>,
    pub workload: Option<String>,
    pub duration: Option<String>,
    #[serde(default)]
    pub client: ClientInfo,
}

impl JobPosting {
    /// Display label for logs: the title, falling back to the id.
    pub fn label(&self) -> &str {
        self.title
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or("<untitled job>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_deserializes_with_minimal_fields() {
        let job: JobPosting = serde_json::from_str(r#"{"title": "Rust developer"}"#).unwrap();
        assert_eq!(job.title.as_deref(), Some("Rust developer"));
        assert!(job.skills.is_empty());
        assert!(job.client.country.is_none());
    }

    #[test]
    fn test_label_falls_back_to_id() {
        let job = JobPosting {
            id: Some("~abc123".to_string()),
            ..Default::default()
        };
        assert_eq!(job.label(), "~abc123");
        assert_eq!(JobPosting::default().label(), "<untitled job>");
    }
}
