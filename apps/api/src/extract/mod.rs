pub mod heuristics;
pub mod normalize;
pub mod pdf;

use thiserror::Error;

/// Raised when the input document cannot yield even a partial draft.
/// Per-field misses inside the extractor never surface here — they degrade
/// to absent fields.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("failed to read PDF: {0}")]
    Pdf(#[from] pdf_extract::OutputError),

    #[error("no text could be extracted from the PDF")]
    Empty,

    #[error("extracted text too short to analyze ({len} chars, minimum {min})")]
    TooShort { len: usize, min: usize },
}
