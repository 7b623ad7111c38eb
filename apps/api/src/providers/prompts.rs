// All LLM prompt constants for the provider clients. Both providers send the
// same prompts; only the transport differs.

use serde::Serialize;

use crate::models::analysis::AnalysisResult;
use crate::models::job::JobPosting;
use crate::models::profile::ProfileData;

/// Job analysis prompt template. `{job_data}` and `{profile_data}` are
/// replaced before sending.
pub const JOB_ANALYSIS_TEMPLATE: &str = r#"**Role:** You are an expert career coach and freelance proposal writer.

**Objective:** Analyze the provided job posting and the freelancer's profile to determine the fit. Provide a suitability score, a rationale for the score, and concrete suggestions for the freelancer's proposal.

**1. Job Posting:**
```json
{job_data}
```

**2. Freelancer's Profile:**
```json
{profile_data}
```

**Output Format:**

Respond with a single JSON object in exactly this shape. Do not include any text outside the JSON structure.

{
  "suitability_score": <a number from 0 to 100, where 100 is a perfect match>,
  "analysis_summary": "<a one-sentence summary of your analysis>",
  "strengths": ["<a key point of alignment between the profile and the job>"],
  "weaknesses": ["<a key gap in the profile relative to the job>"],
  "proposal_suggestions": ["<a specific, actionable suggestion for the cover letter>"]
}

**Scoring guidance:** 85+ is a strong fit, 70-84 a good fit, 50-69 a potential fit with gaps, below 50 a weak fit. Base the score on a holistic view of skills, experience, client history, and job requirements."#;

/// Proposal generation prompt template. `{job_data}`, `{profile_data}` and
/// `{analysis_data}` are replaced before sending.
pub const PROPOSAL_TEMPLATE: &str = r#"**Role:** You are an expert freelance proposal writer.

**Objective:** Write a concise, persuasive cover letter for the job below, on behalf of the freelancer, informed by the prior suitability analysis.

**1. Job Posting:**
```json
{job_data}
```

**2. Freelancer's Profile:**
```json
{profile_data}
```

**3. Suitability Analysis:**
```json
{analysis_data}
```

Write in the first person, lead with the freelancer's most relevant strength, address the client's stated needs directly, and keep it under 250 words. Return only the cover letter text."#;

pub fn analysis_prompt(job: &JobPosting, profile: &ProfileData) -> String {
    JOB_ANALYSIS_TEMPLATE
        .replace("{job_data}", &to_pretty_json(job))
        .replace("{profile_data}", &to_pretty_json(profile))
}

pub fn proposal_prompt(job: &JobPosting, profile: &ProfileData, analysis: &AnalysisResult) -> String {
    PROPOSAL_TEMPLATE
        .replace("{job_data}", &to_pretty_json(job))
        .replace("{profile_data}", &to_pretty_json(profile))
        .replace("{analysis_data}", &to_pretty_json(analysis))
}

fn to_pretty_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}
