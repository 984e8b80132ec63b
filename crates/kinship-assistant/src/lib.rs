//! Kinship Assistant
//!
//! Answers free-form questions about the family. Records are turned into
//! short fact sentences, the facts closest to the question are retrieved,
//! and the model answers from those alone.
//!
//! ```text
//! FamilyRecords → facts → FactIndex ─┐
//!                         question ──┴→ top-k facts → prompt → LLM → Answer
//! ```
//!
//! # Example Usage
//!
//! ```
//! use kinship_assistant::Assistant;
//! use kinship_domain::{FamilyRecords, NewPerson};
//! use kinship_llm::MockProvider;
//!
//! let mut records = FamilyRecords::new();
//! records.add_person(NewPerson::named("Rama")).unwrap();
//!
//! let mut assistant = Assistant::new(MockProvider::new("Rama is male."));
//! assistant.ingest(&records).unwrap();
//!
//! let answer = assistant.ask("Is Rama male?").unwrap();
//! assert_eq!(answer.text, "Rama is male.");
//! assert_eq!(answer.context.len(), 1);
//! ```

#![warn(missing_docs)]

mod assistant;
mod error;

pub use assistant::{build_prompt, Answer, Assistant, DEFAULT_TOP_K};
pub use error::AssistantError;
