//! Error types for the CLI application.

use kinship_domain::PersonId;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Store(#[from] kinship_store::StoreError),

    /// Graph building or rendering error
    #[error("Graph error: {0}")]
    Graph(#[from] kinship_graph::GraphError),

    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(#[from] kinship_llm::LlmError),

    /// Extraction error
    #[error("Extraction error: {0}")]
    Extractor(#[from] kinship_extractor::ExtractorError),

    /// Question answering error
    #[error("Assistant error: {0}")]
    Assistant(#[from] kinship_assistant::AssistantError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No id left for a new person
    #[error("Cannot add person: {0}")]
    Ids(#[from] kinship_domain::IdsExhausted),

    /// No person has this id
    #[error("No person with id {0}")]
    UnknownPerson(PersonId),

    /// Operation refused in the current state
    #[error("Operation not permitted: {0}")]
    NotPermitted(String),
}
