//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::FamilyRecords;

/// Trait for loading and saving the family records
///
/// Implemented by the infrastructure layer (kinship-store)
pub trait FamilyStore {
    /// Error type for store operations
    type Error;

    /// Load all records
    ///
    /// Never fails: missing, unreadable or malformed backing data yields
    /// empty records.
    fn load(&self) -> FamilyRecords;

    /// Overwrite the backing data with `records`
    fn save(&self, records: &FamilyRecords) -> Result<(), Self::Error>;
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (kinship-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate a completion for a single free-form prompt
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Identifier of the model answering prompts
    fn model_name(&self) -> &str;
}

/// Trait for storing facts and retrieving the most relevant ones
///
/// Implemented by the infrastructure layer (kinship-store)
pub trait FactRetriever {
    /// Error type for retrieval operations
    type Error;

    /// Store facts for later retrieval, returning how many were new
    fn ingest(&mut self, facts: &[String]) -> Result<usize, Self::Error>;

    /// Return up to `k` stored facts most relevant to `query`, best first
    fn retrieve(&self, query: &str, k: usize) -> Result<Vec<String>, Self::Error>;

    /// Number of stored facts
    fn len(&self) -> usize;

    /// Whether no facts are stored
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
