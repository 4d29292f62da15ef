//! Nanonets document extraction client (sync endpoint).

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::Form;
use serde_json::Value;

use super::{pdf_part, read_json_response, ExtractionProvider, ProviderError};

const BASE_URL: &str = "https://extraction-api.nanonets.com/api/v1";
// Nanonets can take longer for complex documents.
const TIMEOUT: Duration = Duration::from_secs(120);

/// Output formats accepted by the sync extraction endpoint.
pub const OUTPUT_FORMATS: &[&str] = &["markdown", "html", "json", "csv"];

const CUSTOM_INSTRUCTIONS: &str = "Extract CV information including: personal details \
    (name, email, phone, address, linkedin, github), profile (title, summary), skills \
    (technical and soft skills), work experience (company, role, dates, description, \
    location), education (school, degree, field, dates, location), and languages \
    (name, level). Format dates as YYYY-MM or YYYY. Return structured JSON.";

#[derive(Clone)]
pub struct NanonetsClient {
    http: reqwest::Client,
    api_key: String,
}

impl NanonetsClient {
    pub fn new(http: reqwest::Client, api_key: String) -> Self {
        Self { http, api_key }
    }

    /// Calls the sync extraction endpoint with an explicit output format.
    pub async fn extract_with_format(
        &self,
        file: Bytes,
        filename: &str,
        output_format: &str,
    ) -> Result<Value, ProviderError> {
        let form = Form::new()
            .part("file", pdf_part(file, filename)?)
            .text("output_format", output_format.to_string())
            .text("custom_instructions", CUSTOM_INSTRUCTIONS);

        tracing::info!("Calling Nanonets API with output format: {output_format}");
        let response = self
            .http
            .post(format!("{BASE_URL}/extract/sync"))
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .multipart(form)
            .timeout(TIMEOUT)
            .send()
            .await?;

        read_json_response("nanonets", response).await
    }
}

#[async_trait]
impl ExtractionProvider for NanonetsClient {
    fn name(&self) -> &'static str {
        "nanonets"
    }

    async fn extract(&self, file: Bytes, filename: &str) -> Result<Value, ProviderError> {
        self.extract_with_format(file, filename, "json").await
    }
}
