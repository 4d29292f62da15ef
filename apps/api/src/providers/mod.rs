//! Remote extraction providers. Each client uploads the PDF and returns the
//! provider's raw JSON payload untouched — reconciling the wildly different
//! response shapes is the normalizer's job, not the clients'.

pub mod docparserai;
pub mod extracta;
pub mod hrflow;
pub mod nanonets;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} API failed: {status} - {message}")]
    Api {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error(
        "No external API configured. Set at least one of DOCPARSERAI_API_KEY, \
         NANONETS_API_KEY, HRFLOW_API_KEY, EXTRACTA_API_KEY, or use /parse-cv \
         for local extraction."
    )]
    NoneConfigured,
}

/// A remote document-extraction API. Implementations upload the file and
/// return the raw, provider-shaped JSON payload.
#[async_trait]
pub trait ExtractionProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn extract(&self, file: Bytes, filename: &str) -> Result<Value, ProviderError>;
}

/// The configured provider clients. Also exposes the concrete clients so
/// the raw passthrough test endpoints can bypass normalization.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    pub docparserai: Option<docparserai::DocParserAiClient>,
    pub nanonets: Option<nanonets::NanonetsClient>,
    pub hrflow: Option<hrflow::HrFlowClient>,
    pub extracta: Option<extracta::ExtractaClient>,
}

impl ProviderRegistry {
    /// Builds a client for every provider with an API key set.
    pub fn from_config(config: &Config, http: reqwest::Client) -> Self {
        Self {
            docparserai: config.docparserai_api_key.clone().map(|key| {
                docparserai::DocParserAiClient::new(
                    http.clone(),
                    key,
                    config.docparserai_url.clone(),
                )
            }),
            nanonets: config
                .nanonets_api_key
                .clone()
                .map(|key| nanonets::NanonetsClient::new(http.clone(), key)),
            hrflow: config
                .hrflow_api_key
                .clone()
                .map(|key| hrflow::HrFlowClient::new(http.clone(), key, config.hrflow_url.clone())),
            extracta: config.extracta_api_key.clone().map(|key| {
                extracta::ExtractaClient::new(http.clone(), key, config.extracta_url.clone())
            }),
        }
    }

    /// Configured providers in preference order.
    fn chain(&self) -> Vec<&dyn ExtractionProvider> {
        let mut chain: Vec<&dyn ExtractionProvider> = Vec::new();
        if let Some(p) = &self.docparserai {
            chain.push(p);
        }
        if let Some(p) = &self.nanonets {
            chain.push(p);
        }
        if let Some(p) = &self.hrflow {
            chain.push(p);
        }
        if let Some(p) = &self.extracta {
            chain.push(p);
        }
        chain
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.chain().iter().map(|p| p.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.chain().is_empty()
    }

    /// Tries each configured provider in preference order and returns the
    /// first successful payload. Failing providers are logged and skipped;
    /// the last error surfaces only when every provider fails.
    pub async fn extract_auto(&self, file: Bytes, filename: &str) -> Result<Value, ProviderError> {
        let chain = self.chain();
        if chain.is_empty() {
            return Err(ProviderError::NoneConfigured);
        }

        let mut last_error = ProviderError::NoneConfigured;
        for provider in chain {
            info!("Trying {} API...", provider.name());
            match provider.extract(file.clone(), filename).await {
                Ok(payload) => {
                    info!("Successfully parsed with {} API", provider.name());
                    return Ok(payload);
                }
                Err(e) => {
                    warn!("{} API failed: {e}", provider.name());
                    last_error = e;
                }
            }
        }
        Err(last_error)
    }
}

/// Builds the standard multipart file part for a PDF upload.
pub(crate) fn pdf_part(file: Bytes, filename: &str) -> Result<reqwest::multipart::Part, ProviderError> {
    Ok(reqwest::multipart::Part::stream(file)
        .file_name(filename.to_string())
        .mime_str("application/pdf")?)
}

/// Reads a provider response, mapping non-2xx statuses to
/// [`ProviderError::Api`] with a truncated body excerpt.
pub(crate) async fn read_json_response(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<Value, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::Api {
            provider,
            status: status.as_u16(),
            message: body.chars().take(500).collect(),
        });
    }
    Ok(response.json().await?)
}
