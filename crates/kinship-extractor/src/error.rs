//! Error types for the Extractor

use kinship_domain::IdsExhausted;
use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Nothing to extract from
    #[error("No text to extract from")]
    EmptyText,

    /// Text exceeds maximum length
    #[error("Text too long: {0} chars (max: {1})")]
    TextTooLong(usize, usize),

    /// Model output is not the expected `{people, relationships}` object
    #[error("Invalid extraction format: {0}")]
    InvalidFormat(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Some model entries were unusable, so the batch is not committed
    #[error("{0} entries in the model output could not be used; nothing was committed")]
    IncompleteOutput(usize),

    /// No ids left for the new people
    #[error("Cannot add people: {0}")]
    Ids(#[from] IdsExhausted),
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::JsonParse(e.to_string())
    }
}
