use serde::{Deserialize, Serialize};

use crate::crawler::CrawlConfig;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub crawl: CrawlConfig,
    pub external: ExternalConfig,
    pub logging: LoggingConfig,
}

/// Knobs for the collaborator boundary: search API and LLM synthesis calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExternalConfig {
    pub search_timeout_seconds: u64,
    pub search_query_delay_ms: u64,
    pub synthesis_timeout_seconds: u64,
    pub synthesis_model: String,
    pub max_retry_attempts: u32,
    pub retry_backoff_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawl: CrawlConfig::default(),
            external: ExternalConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl Default for ExternalConfig {
    fn default() -> Self {
        Self {
            search_timeout_seconds: 15,
            search_query_delay_ms: 500,
            synthesis_timeout_seconds: 15,
            synthesis_model: "gemini-1.5-flash-latest".to_string(),
            max_retry_attempts: 3,
            retry_backoff_ms: 2000,
        }
    }
}

pub async fn load_config(
    path: &str,
) -> std::result::Result<Config, Box<dyn std::error::Error + Send + Sync>> {
    let content = tokio::fs::read_to_string(path).await?;
    let config: Config = serde_yaml::from_str(&content)?;
    Ok(config)
}
