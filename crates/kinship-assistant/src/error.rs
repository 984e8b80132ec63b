//! Error types for question answering

use thiserror::Error;

/// Errors that can occur while answering a question
#[derive(Error, Debug)]
pub enum AssistantError {
    /// Question was blank
    #[error("Question is empty")]
    EmptyQuestion,

    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Fact index error
    #[error("Retrieval error: {0}")]
    Retrieval(String),
}
