//! HrFlow.ai document parsing client. Free tier available.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::Form;
use serde_json::Value;

use super::{pdf_part, read_json_response, ExtractionProvider, ProviderError};

const TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct HrFlowClient {
    http: reqwest::Client,
    api_key: String,
    url: String,
}

impl HrFlowClient {
    pub fn new(http: reqwest::Client, api_key: String, url: String) -> Self {
        Self { http, api_key, url }
    }
}

#[async_trait]
impl ExtractionProvider for HrFlowClient {
    fn name(&self) -> &'static str {
        "hrflow"
    }

    async fn extract(&self, file: Bytes, filename: &str) -> Result<Value, ProviderError> {
        let form = Form::new()
            .part("file", pdf_part(file, filename)?)
            .text("format", "json")
            .text("language", "en");

        let response = self
            .http
            .post(&self.url)
            .header("X-API-KEY", &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .multipart(form)
            .timeout(TIMEOUT)
            .send()
            .await?;

        read_json_response("hrflow", response).await
    }
}
