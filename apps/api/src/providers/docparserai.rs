//! DocParserAI client. Free tier: 1000 pages/month.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::Form;
use serde_json::Value;

use super::{pdf_part, read_json_response, ExtractionProvider, ProviderError};

const TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct DocParserAiClient {
    http: reqwest::Client,
    api_key: String,
    url: String,
}

impl DocParserAiClient {
    pub fn new(http: reqwest::Client, api_key: String, url: String) -> Self {
        Self { http, api_key, url }
    }

    pub async fn extract_raw(&self, file: Bytes, filename: &str) -> Result<Value, ProviderError> {
        let form = Form::new()
            .part("file", pdf_part(file, filename)?)
            .text("document_type", "resume")
            .text("language", "en");

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .multipart(form)
            .timeout(TIMEOUT)
            .send()
            .await?;

        read_json_response("docparserai", response).await
    }
}

#[async_trait]
impl ExtractionProvider for DocParserAiClient {
    fn name(&self) -> &'static str {
        "docparserai"
    }

    async fn extract(&self, file: Bytes, filename: &str) -> Result<Value, ProviderError> {
        self.extract_raw(file, filename).await
    }
}
