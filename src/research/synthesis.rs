use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::error::ResearchError;

/// Bounded retry for rate-limited synthesis calls. Fixed backoff; retries
/// belong here at the collaborator boundary, never inside the
/// deterministic core.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_ms: 2000,
        }
    }
}

/// Language-model collaborator: takes a prompt embedding the structured
/// evidence, returns free-form text expected to parse as one JSON object.
#[async_trait]
pub trait ProfileSynthesizer: Send + Sync {
    async fn synthesize(&self, prompt: &str) -> Result<String, ResearchError>;
}

pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    retry: RetryPolicy,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, timeout_seconds: u64, retry: RetryPolicy) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key,
            model,
            retry,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        )
    }
}

#[async_trait]
impl ProfileSynthesizer for GeminiClient {
    async fn synthesize(&self, prompt: &str) -> Result<String, ResearchError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": 0.1,
                "topK": 1,
                "topP": 1,
                "maxOutputTokens": 2048,
            }
        });

        let mut attempt = 0;
        loop {
            attempt += 1;

            let response = self
                .client
                .post(self.endpoint())
                .json(&body)
                .send()
                .await
                .map_err(|e| ResearchError::Synthesis(e.to_string()))?;

            let status = response.status();
            if status.as_u16() == 429 && attempt < self.retry.max_attempts {
                warn!(
                    "Synthesis rate-limited, retrying in {}ms (attempt {}/{})",
                    self.retry.backoff_ms, attempt, self.retry.max_attempts
                );
                tokio::time::sleep(Duration::from_millis(self.retry.backoff_ms)).await;
                continue;
            }
            if !status.is_success() {
                return Err(ResearchError::Synthesis(format!(
                    "model API returned HTTP {}",
                    status
                )));
            }

            let parsed: GeminiResponse = response
                .json()
                .await
                .map_err(|e| ResearchError::Synthesis(e.to_string()))?;

            let text = parsed
                .candidates
                .into_iter()
                .next()
                .and_then(|c| c.content.parts.into_iter().next())
                .map(|p| p.text)
                .ok_or_else(|| {
                    ResearchError::Synthesis("model response carried no candidates".to_string())
                })?;

            debug!("Synthesis returned {} chars", text.len());
            return Ok(text);
        }
    }
}

/// Models wrap JSON in markdown fences or stray prose; repair here, at the
/// boundary, before parsing.
pub fn clean_json_response(raw: &str) -> String {
    let mut text = raw.trim();

    if let Some(stripped) = text.strip_prefix("```json") {
        text = stripped;
    } else if let Some(stripped) = text.strip_prefix("```") {
        text = stripped;
    }
    if let Some(stripped) = text.strip_suffix("```") {
        text = stripped;
    }
    let text = text.trim();

    match (text.find('{'), text.rfind('}')) {
        (Some(first), Some(last)) if last > first => text[first..=last].to_string(),
        _ => text.to_string(),
    }
}

/// Prompt for the synthesis collaborator, embedding the pipeline's
/// structured evidence verbatim.
pub fn build_synthesis_prompt(evidence_json: &str, external_json: &str) -> String {
    format!(
        r#"You are an expert business analyst. Analyze the following company data and create a comprehensive company profile in JSON format.

SCRAPED WEBSITE DATA:
{evidence_json}

EXTERNAL RESEARCH DATA:
{external_json}

Based on this information, create a structured company profile with the following JSON schema:

{{
  "company_name": "string",
  "website_url": "string",
  "linkedin_url": "string or null",
  "confidence_score": "High/Medium/Low",
  "summary": {{
    "about": "comprehensive company description",
    "tagline": "company tagline or mission statement"
  }},
  "company_details": {{
    "industry": "primary industry",
    "founded_year": "number or null",
    "company_type": "Public/Private/Startup/etc",
    "headquarters": "city, country/state"
  }},
  "people": {{
    "founders": ["list of founder names"],
    "key_executives": ["list of key executives with titles"]
  }},
  "offerings": {{
    "service_details": ["list of main products/services"],
    "pricing_model": "description of pricing approach"
  }},
  "valuation_and_revenue": {{
    "value": "string representation of value",
    "metric_type": "valuation/revenue/funding",
    "source": "source of information",
    "date_of_metric": "YYYY-MM-DD or null",
    "explanation": "brief explanation of the metric"
  }},
  "contact_info": {{
    "phone": "phone number or null",
    "email": "email address or null",
    "contact_page_url": "contact page URL or null"
  }}
}}

INSTRUCTIONS:
1. Extract and synthesize information from both scraped and external data
2. If information is missing or unclear, use null values
3. Provide a confidence score based on data quality and completeness
4. Ensure all extracted information is factual and verifiable
5. Return ONLY valid JSON, no additional text or explanations

JSON Response:"#
    )
}
