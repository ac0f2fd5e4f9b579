use company_researcher::config::{load_config, Config};
use company_researcher::models::ResearchOptions;
use company_researcher::research::{GeminiClient, ResearchAgent, RetryPolicy, TavilyClient};
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv::dotenv().ok();

    let (config, config_err) = match load_config("config.yml").await {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("company_researcher={}", config.logging.level))
        }))
        .init();

    if let Some(e) = config_err {
        warn!("Failed to load config.yml: {}. Using defaults.", e);
    }

    // URL from argv when given, otherwise prompt.
    let (url, include_external) = match std::env::args().nth(1) {
        Some(url) => (url, true),
        None => {
            let url: String = Input::with_theme(&ColorfulTheme::default())
                .with_prompt("Company website URL")
                .interact_text()?;
            let include_external = Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt("Include external research?")
                .default(true)
                .interact()?;
            (url, include_external)
        }
    };

    let mut agent = ResearchAgent::new(&config);

    // Credentials are read here, once, and passed in explicitly; core
    // modules never touch the environment.
    match std::env::var("TAVILY_API_KEY") {
        Ok(key) if !key.is_empty() => {
            agent = agent.with_search(Box::new(TavilyClient::new(
                key,
                config.external.search_timeout_seconds,
            )));
        }
        _ => warn!("TAVILY_API_KEY not set, external research disabled"),
    }
    match std::env::var("GEMINI_API_KEY") {
        Ok(key) if !key.is_empty() => {
            agent = agent.with_synthesizer(Box::new(GeminiClient::new(
                key,
                config.external.synthesis_model.clone(),
                config.external.synthesis_timeout_seconds,
                RetryPolicy {
                    max_attempts: config.external.max_retry_attempts,
                    backoff_ms: config.external.retry_backoff_ms,
                },
            )));
        }
        _ => warn!("GEMINI_API_KEY not set, profile synthesis disabled"),
    }

    let options = ResearchOptions { include_external };

    tokio::select! {
        result = agent.research(&url, &options) => {
            let report = result?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ = signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    }

    Ok(())
}
