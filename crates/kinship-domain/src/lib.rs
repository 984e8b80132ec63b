//! Kinship Domain Layer
//!
//! This crate contains the core data model for Kinship, a small personal
//! family-tree keeper. It has no external dependencies and defines the
//! people, relationships and trait interfaces that every other crate builds on.
//!
//! ## Key Concepts
//!
//! - **Person**: someone recorded in the tree, identified by a stable [`PersonId`]
//! - **Relationship**: a spouse pair (unordered) or a parent/child pair (ordered)
//! - **FamilyRecords**: the in-memory working copy of both collections
//! - **Fact**: a short sentence derived from the records, used for question answering
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Pure logic only; persistence, rendering and model calls live elsewhere
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod facts;
pub mod person;
pub mod records;
pub mod relationship;
pub mod traits;

// Re-exports for convenience
pub use person::{Gender, IdsExhausted, NewPerson, Person, PersonId};
pub use records::{AddOutcome, FamilyRecords};
pub use relationship::{Relationship, RelationshipKey, RelationshipKind};
