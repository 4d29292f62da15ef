use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Provider keys are optional — a provider is configured iff its key is set.
#[derive(Debug, Clone)]
pub struct Config {
    pub docparserai_api_key: Option<String>,
    pub docparserai_url: String,
    pub nanonets_api_key: Option<String>,
    pub hrflow_api_key: Option<String>,
    pub hrflow_url: String,
    pub extracta_api_key: Option<String>,
    pub extracta_url: String,
    pub ollama_base_url: String,
    pub ollama_model: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            docparserai_api_key: optional_env("DOCPARSERAI_API_KEY"),
            docparserai_url: env_or("DOCPARSERAI_URL", "https://api.docparserai.com/v1/extract"),
            nanonets_api_key: optional_env("NANONETS_API_KEY"),
            hrflow_api_key: optional_env("HRFLOW_API_KEY"),
            hrflow_url: env_or("HRFLOW_URL", "https://api.hrflow.ai/v1/documents/parsing"),
            extracta_api_key: optional_env("EXTRACTA_API_KEY"),
            extracta_url: env_or("EXTRACTA_URL", "https://api.extracta.ai/v1/extractions"),
            ollama_base_url: env_or("OLLAMA_BASE_URL", "http://localhost:11434"),
            ollama_model: env_or("OLLAMA_MODEL", "llama3.2"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// An empty value counts as unset so `KEY=` in a .env file does not enable
/// a provider.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
