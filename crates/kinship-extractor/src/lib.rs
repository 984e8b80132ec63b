//! Kinship Extractor
//!
//! Turns free text about a family into people and relationships using an LLM.
//!
//! # Architecture
//!
//! ```text
//! Text → Extractor → LLM → candidates → preview → commit → FamilyRecords
//! ```
//!
//! Extraction never writes on its own. [`preview`] works out which people are
//! new and which relationships can be resolved to known or newly proposed
//! people; [`commit`] applies that plan to the records.
//!
//! # Example Usage
//!
//! ```
//! use kinship_domain::FamilyRecords;
//! use kinship_extractor::{commit, Extractor, ExtractorConfig};
//! use kinship_llm::MockProvider;
//!
//! let llm = MockProvider::new(
//!     r#"{"people": [{"firstname": "Rama"}, {"firstname": "Sita"}],
//!         "relationships": [{"type": "spouse", "person1": "Rama", "person2": "Sita"}]}"#,
//! );
//! let extractor = Extractor::new(llm, ExtractorConfig::default());
//!
//! let mut records = FamilyRecords::new();
//! let plan = extractor
//!     .extract_preview("Rama married Sita.", &records)
//!     .unwrap();
//! let summary = commit(plan, &mut records).unwrap();
//!
//! assert_eq!(summary.people_added.len(), 2);
//! assert_eq!(summary.relationships_added, 1);
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod parser;
mod plan;
mod prompt;
mod types;


pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use extractor::Extractor;
pub use parser::parse_llm_response;
pub use plan::{commit, preview};
pub use prompt::PromptBuilder;
pub use types::{
    CommitSummary, Endpoint, ExtractedFamily, ExtractionPreview, PersonCandidate,
    PlannedRelationship, RelationshipCandidate,
};
