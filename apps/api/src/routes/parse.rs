//! Upload handlers for the three extraction strategies. All of them end in
//! the same place: a raw payload pushed through the normalizer.

use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::errors::AppError;
use crate::extract::{heuristics, normalize, pdf};
use crate::models::cv::CvSchema;
use crate::providers::nanonets::OUTPUT_FORMATS;
use crate::routes::MAX_FILE_SIZE;
use crate::state::AppState;

/// A PDF upload pulled out of a multipart form.
struct PdfUpload {
    data: Bytes,
    filename: String,
}

/// Reads the `file` field from the form, enforcing content type and size.
async fn read_pdf_upload(mut multipart: Multipart) -> Result<PdfUpload, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        if field.content_type() != Some("application/pdf") {
            return Err(AppError::Validation(
                "Only PDF files are supported".to_string(),
            ));
        }
        let filename = field.file_name().unwrap_or("upload.pdf").to_string();
        let data = field.bytes().await?;
        if data.len() > MAX_FILE_SIZE {
            return Err(AppError::PayloadTooLarge(MAX_FILE_SIZE));
        }
        return Ok(PdfUpload { data, filename });
    }
    Err(AppError::Validation(
        "Missing 'file' field in multipart form".to_string(),
    ))
}

/// POST /parse-cv
///
/// Local extraction: pdf text -> heuristic draft -> normalizer. No API key
/// required and nothing leaves the server.
pub async fn handle_parse_local(multipart: Multipart) -> Result<Json<CvSchema>, AppError> {
    let upload = read_pdf_upload(multipart).await?;

    info!("Using LOCAL PDF extraction");
    let text = pdf::extract_text(&upload.data)?;
    let draft = heuristics::extract_draft(&text);
    let cv = normalize::normalize(&draft);

    info!(
        "CV parsed successfully (local). Found {} experiences, {} education entries",
        cv.experience.len(),
        cv.education.len()
    );
    Ok(Json(cv))
}

/// POST /parse-cv-external
///
/// Remote extraction: the provider auto-chain uploads the PDF to the first
/// configured API that succeeds, then the payload goes through the
/// normalizer like any other.
pub async fn handle_parse_external(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<CvSchema>, AppError> {
    if state.providers.is_empty() {
        return Err(AppError::NotConfigured(
            "No external API configured. Set at least one of DOCPARSERAI_API_KEY, \
             NANONETS_API_KEY, HRFLOW_API_KEY, EXTRACTA_API_KEY, or use /parse-cv \
             for local extraction."
                .to_string(),
        ));
    }

    let upload = read_pdf_upload(multipart).await?;

    info!("Using external extraction providers for file: {}", upload.filename);
    let payload = state
        .providers
        .extract_auto(upload.data, &upload.filename)
        .await?;
    let cv = normalize::normalize(&payload);

    info!(
        "CV parsed successfully (external). Found {} experiences, {} education entries",
        cv.experience.len(),
        cv.education.len()
    );
    Ok(Json(cv))
}

/// POST /parse-cv-ollama
///
/// Model-backed extraction: pdf text -> Ollama prompt -> JSON reply ->
/// normalizer. Requires a running Ollama server; everything stays local.
pub async fn handle_parse_ollama(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<CvSchema>, AppError> {
    let upload = read_pdf_upload(multipart).await?;

    let text = pdf::extract_text(&upload.data)?;
    pdf::ensure_min_len(&text)?;

    info!("Analyzing CV with Ollama...");
    let payload = state.ollama.parse_cv(&text).await?;
    let cv = normalize::normalize(&payload);

    info!(
        "CV parsed successfully via Ollama. Found {} experiences, {} education entries, {} skills",
        cv.experience.len(),
        cv.education.len(),
        cv.skills.technical.len() + cv.skills.soft.len()
    );
    Ok(Json(cv))
}

#[derive(Deserialize)]
pub struct TestNanonetsQuery {
    #[serde(default = "default_output_format")]
    pub output_format: String,
}

fn default_output_format() -> String {
    "json".to_string()
}

/// POST /test-nanonets
///
/// Raw Nanonets passthrough (no normalization) — used to inspect the
/// provider's actual response shape.
pub async fn handle_test_nanonets(
    State(state): State<AppState>,
    Query(query): Query<TestNanonetsQuery>,
    multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let Some(nanonets) = state.providers.nanonets.clone() else {
        return Err(AppError::NotConfigured(
            "NANONETS_API_KEY is not set in environment variables".to_string(),
        ));
    };

    if !OUTPUT_FORMATS.contains(&query.output_format.as_str()) {
        return Err(AppError::Validation(format!(
            "Invalid output_format: {}. Must be one of: {}",
            query.output_format,
            OUTPUT_FORMATS.join(", ")
        )));
    }

    let upload = read_pdf_upload(multipart).await?;

    info!(
        "Testing Nanonets API with file: {}, format: {}",
        upload.filename, query.output_format
    );
    let result = nanonets
        .extract_with_format(upload.data, &upload.filename, &query.output_format)
        .await?;

    let summary = summarize_payload(&result);
    Ok(Json(json!({
        "success": true,
        "message": format!("Nanonets API test successful (format: {})", query.output_format),
        "raw_response": result,
        "summary": summary,
    })))
}

/// POST /test-docparserai
///
/// Raw DocParserAI passthrough (no normalization).
pub async fn handle_test_docparserai(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let Some(docparserai) = state.providers.docparserai.clone() else {
        return Err(AppError::NotConfigured(
            "DOCPARSERAI_API_KEY is not set in environment variables".to_string(),
        ));
    };

    let upload = read_pdf_upload(multipart).await?;

    info!("Testing DocParserAI API with file: {}", upload.filename);
    let result = docparserai
        .extract_raw(upload.data, &upload.filename)
        .await?;

    let summary = summarize_payload(&result);
    Ok(Json(json!({
        "success": true,
        "message": "DocParserAI API test successful",
        "raw_response": result,
        "summary": summary,
    })))
}

/// Shape summary block attached to raw provider test responses.
fn summarize_payload(payload: &Value) -> Value {
    let keys: Value = match payload.as_object() {
        Some(obj) => obj.keys().cloned().collect::<Vec<_>>().into(),
        None => "not an object".into(),
    };
    let response_type = match payload {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    json!({
        "keys_in_response": keys,
        "response_type": response_type,
        "response_size": payload.to_string().len(),
    })
}
