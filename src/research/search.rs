use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ResearchError;

const TAVILY_ENDPOINT: &str = "https://api.tavily.com/search";

/// One external mention of the company. The pipeline treats `content` as
/// opaque text and feeds it back into the signal extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub content: String,
}

/// External search collaborator, kept behind a seam so the pipeline is
/// testable without network access.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, ResearchError>;
}

pub struct TavilyClient {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

#[derive(Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: &'a str,
    include_answer: bool,
    include_raw_content: bool,
    max_results: u32,
}

#[derive(Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

impl TavilyClient {
    pub fn new(api_key: String, timeout_seconds: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key,
            endpoint: TAVILY_ENDPOINT.to_string(),
        }
    }
}

#[async_trait]
impl SearchProvider for TavilyClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, ResearchError> {
        debug!("External search: {}", query);

        let request = TavilyRequest {
            api_key: &self.api_key,
            query,
            search_depth: "basic",
            include_answer: true,
            include_raw_content: false,
            max_results: 3,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| ResearchError::Search(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ResearchError::Search(format!(
                "search API returned HTTP {}",
                response.status()
            )));
        }

        let parsed: TavilyResponse = response
            .json()
            .await
            .map_err(|e| ResearchError::Search(e.to_string()))?;

        Ok(parsed.results)
    }
}
