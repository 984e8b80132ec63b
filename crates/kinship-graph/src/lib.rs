//! Kinship Family Graph
//!
//! Turns flat people and relationship records into a directed family tree.
//!
//! # Pipeline
//!
//! 1. [`SpouseResolver`] groups spouse pairs into couple nodes
//! 2. [`GraphBuilder`] assembles individuals, couples and parent edges
//! 3. [`render`] produces labeled vis-network node/edge lists
//!
//! The graph is derived data: it is rebuilt from the records on every call
//! and never persisted.
//!
//! # Examples
//!
//! ```
//! use kinship_domain::{FamilyRecords, NewPerson};
//! use kinship_graph::{GraphBuilder, NodeId};
//!
//! let mut records = FamilyRecords::new();
//! let rama = records.add_person(NewPerson::named("Rama")).unwrap();
//! let sita = records.add_person(NewPerson::named("Sita")).unwrap();
//! let luv = records.add_person(NewPerson::named("Luv")).unwrap();
//! records.add_spouse(rama, sita);
//! records.add_parent(rama, luv);
//!
//! let graph = GraphBuilder::new().build(&records).unwrap();
//! let edges = graph.edges();
//! assert_eq!(edges[0].from.to_string(), "1_2");
//! assert_eq!(edges[0].to, NodeId::Person(luv));
//! ```

#![warn(missing_docs)]

pub mod graph;
pub mod render;
pub mod resolver;

pub use graph::{EdgeKind, FamilyEdge, FamilyGraph, FamilyNode, GraphBuilder, NodeId};
pub use render::{render, LabelStyle, RenderedGraph, VisEdge, VisNode};
pub use resolver::{CoupleId, SpouseResolver};

use kinship_domain::PersonId;
use thiserror::Error;

/// Errors that can occur while building or rendering the graph
#[derive(Error, Debug)]
pub enum GraphError {
    /// A relationship references an id with no person record
    #[error("relationship references unknown person id {0}")]
    UnknownPerson(PersonId),

    /// Rendered output could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
