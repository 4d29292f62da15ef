//! PDF-to-text collaborator. The rest of the pipeline consumes the
//! assembled string and never looks at the PDF structure itself.

use tracing::info;

use crate::extract::ExtractionError;

/// Minimum number of characters (after trimming) a document must yield
/// before it is considered analyzable. Enforced at the request boundary,
/// not inside the extractor — the extractor tolerates thin text.
pub const MIN_TEXT_LEN: usize = 50;

/// Extracts all text from an in-memory PDF, pages newline-joined.
pub fn extract_text(data: &[u8]) -> Result<String, ExtractionError> {
    let text = pdf_extract::extract_text_from_mem(data)?;
    if text.trim().is_empty() {
        return Err(ExtractionError::Empty);
    }
    info!("Extracted {} characters from PDF", text.len());
    Ok(text)
}

/// Caller-level gate for structurally empty documents.
pub fn ensure_min_len(text: &str) -> Result<(), ExtractionError> {
    let len = text.trim().chars().count();
    if len < MIN_TEXT_LEN {
        return Err(ExtractionError::TooShort {
            len,
            min: MIN_TEXT_LEN,
        });
    }
    Ok(())
}
