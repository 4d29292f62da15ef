//! Extracta.ai client. The request carries an extraction-details document
//! describing the fields we want back, including every alias key the
//! normalizer knows how to reconcile.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::Form;
use serde_json::{json, Value};

use super::{pdf_part, read_json_response, ExtractionProvider, ProviderError};

const TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct ExtractaClient {
    http: reqwest::Client,
    api_key: String,
    url: String,
}

impl ExtractaClient {
    pub fn new(http: reqwest::Client, api_key: String, url: String) -> Self {
        Self { http, api_key, url }
    }
}

#[async_trait]
impl ExtractionProvider for ExtractaClient {
    fn name(&self) -> &'static str {
        "extracta"
    }

    async fn extract(&self, file: Bytes, filename: &str) -> Result<Value, ProviderError> {
        let form = Form::new()
            .part("file", pdf_part(file, filename)?)
            .text("extractionDetails", extraction_details().to_string());

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .multipart(form)
            .timeout(TIMEOUT)
            .send()
            .await?;

        read_json_response("extracta", response).await
    }
}

fn extraction_details() -> Value {
    json!({
        "name": "Resume Extraction",
        "language": "English",
        "fields": [
            {
                "key": "personal",
                "type": "object",
                "properties": [
                    { "key": "full_name", "type": "string" },
                    { "key": "email", "type": "string" },
                    { "key": "phone", "type": "string" },
                    { "key": "address", "type": "string" },
                    { "key": "linkedin", "type": "string" },
                    { "key": "github", "type": "string" }
                ]
            },
            {
                "key": "profile",
                "type": "object",
                "properties": [
                    { "key": "title", "type": "string" },
                    { "key": "summary", "type": "string" },
                    { "key": "objective", "type": "string" }
                ]
            },
            {
                "key": "experience",
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": [
                        { "key": "company", "type": "string" },
                        { "key": "role", "type": "string" },
                        { "key": "position", "type": "string" },
                        { "key": "title", "type": "string" },
                        { "key": "start_date", "type": "string" },
                        { "key": "start", "type": "string" },
                        { "key": "end_date", "type": "string" },
                        { "key": "end", "type": "string" },
                        { "key": "description", "type": "string" },
                        { "key": "location", "type": "string" }
                    ]
                }
            },
            {
                "key": "education",
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": [
                        { "key": "school", "type": "string" },
                        { "key": "institution", "type": "string" },
                        { "key": "university", "type": "string" },
                        { "key": "degree", "type": "string" },
                        { "key": "field", "type": "string" },
                        { "key": "major", "type": "string" },
                        { "key": "start_date", "type": "string" },
                        { "key": "start", "type": "string" },
                        { "key": "end_date", "type": "string" },
                        { "key": "end", "type": "string" },
                        { "key": "location", "type": "string" }
                    ]
                }
            },
            {
                "key": "skills",
                "type": "array",
                "items": { "type": "string" }
            },
            {
                "key": "languages",
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": [
                        { "key": "name", "type": "string" },
                        { "key": "language", "type": "string" },
                        { "key": "level", "type": "string" },
                        { "key": "proficiency", "type": "string" }
                    ]
                }
            }
        ]
    })
}
