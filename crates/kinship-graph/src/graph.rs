//! Family graph assembly
//!
//! Nodes are either single people or married couples; edges point from a
//! parent node to a child node. The graph is rebuilt from the records on every
//! request and never mutated afterwards.

use crate::resolver::{CoupleId, SpouseResolver};
use crate::GraphError;
use kinship_domain::{FamilyRecords, Person, PersonId, Relationship};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

/// Identity of a node in the family graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeId {
    /// A person drawn on their own
    Person(PersonId),
    /// A married couple drawn as one node
    Couple(CoupleId),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Person(id) => write!(f, "{}", id),
            NodeId::Couple(id) => write!(f, "{}", id),
        }
    }
}

/// Node payload with everything needed to draw it
///
/// `None` marks an id that is referenced but has no person record; those
/// only appear when building leniently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FamilyNode {
    /// A single person
    Individual {
        /// Person id
        id: PersonId,
        /// The person's record
        person: Option<Person>,
    },
    /// A married couple
    Couple {
        /// Couple id
        id: CoupleId,
        /// Record of the member with the lower id
        first: Option<Person>,
        /// Record of the member with the higher id
        second: Option<Person>,
    },
}

impl FamilyNode {
    /// Identity of this node
    pub fn node_id(&self) -> NodeId {
        match self {
            FamilyNode::Individual { id, .. } => NodeId::Person(*id),
            FamilyNode::Couple { id, .. } => NodeId::Couple(*id),
        }
    }

    /// Whether this node stands for two people
    pub fn is_couple(&self) -> bool {
        matches!(self, FamilyNode::Couple { .. })
    }
}

/// Kind of edge between two nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// Parent node to child node
    Parent,
    /// Between spouses; the assembler never draws these since spouses are
    /// merged, but renderers know how to style them
    Spouse,
}

impl EdgeKind {
    /// Edge label
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Parent => "parent",
            EdgeKind::Spouse => "spouse",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed edge described by its endpoint ids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FamilyEdge {
    /// Source node
    pub from: NodeId,
    /// Target node
    pub to: NodeId,
    /// Edge kind
    pub kind: EdgeKind,
}

/// Derived family graph
///
/// Multi-edges are kept: a couple with two children has two outgoing edges,
/// and a parent relationship recorded for both spouses yields two parallel
/// edges from the couple.
#[derive(Debug, Clone, Default)]
pub struct FamilyGraph {
    graph: DiGraph<FamilyNode, EdgeKind>,
    index: HashMap<NodeId, NodeIndex>,
}

impl FamilyGraph {
    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Look up a node
    pub fn node(&self, id: &NodeId) -> Option<&FamilyNode> {
        self.index.get(id).map(|idx| &self.graph[*idx])
    }

    /// Whether a node exists
    pub fn contains(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    /// Nodes in insertion order: couples, then people, then ids only known
    /// from relationships
    pub fn nodes(&self) -> impl Iterator<Item = &FamilyNode> {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// Edges in insertion order
    pub fn edges(&self) -> Vec<FamilyEdge> {
        self.graph
            .edge_references()
            .map(|edge| FamilyEdge {
                from: self.graph[edge.source()].node_id(),
                to: self.graph[edge.target()].node_id(),
                kind: *edge.weight(),
            })
            .collect()
    }

    /// Nodes with an edge pointing at `id`
    pub fn parents_of(&self, id: &NodeId) -> Vec<NodeId> {
        match self.index.get(id) {
            Some(idx) => self
                .graph
                .edges_directed(*idx, petgraph::Direction::Incoming)
                .map(|edge| self.graph[edge.source()].node_id())
                .collect(),
            None => Vec::new(),
        }
    }

    fn add_node(&mut self, node: FamilyNode) -> NodeIndex {
        let id = node.node_id();
        if let Some(idx) = self.index.get(&id) {
            return *idx;
        }
        let idx = self.graph.add_node(node);
        self.index.insert(id, idx);
        idx
    }
}

/// Builds a [`FamilyGraph`] from records
///
/// Strict builders (the default) refuse relationships that reference ids
/// missing from the people list. Lenient builders draw such ids as blank
/// nodes instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphBuilder {
    strict: bool,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self { strict: true }
    }
}

impl GraphBuilder {
    /// Strict builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder that tolerates unknown ids
    pub fn lenient() -> Self {
        Self { strict: false }
    }

    /// Set strictness
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Whether unknown ids are rejected
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Assemble the graph
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`GraphError::UnknownPerson`] for the lowest
    /// referenced id that has no person record.
    pub fn build(&self, records: &FamilyRecords) -> Result<FamilyGraph, GraphError> {
        let unknown = records.unknown_references();
        if let Some(first) = unknown.first() {
            if self.strict {
                return Err(GraphError::UnknownPerson(*first));
            }
            warn!(
                "{} referenced ids have no person record; drawing them blank",
                unknown.len()
            );
        }

        let people: HashMap<PersonId, &Person> =
            records.people.iter().map(|p| (p.id, p)).collect();
        let lookup = |id: PersonId| people.get(&id).map(|p| (*p).clone());

        let resolver = SpouseResolver::from_relationships(&records.relationships);
        let mut graph = FamilyGraph::default();

        for couple in resolver.couples() {
            graph.add_node(FamilyNode::Couple {
                id: *couple,
                first: lookup(couple.first()),
                second: lookup(couple.second()),
            });
        }

        for person in &records.people {
            if !resolver.is_merged(person.id) {
                graph.add_node(FamilyNode::Individual {
                    id: person.id,
                    person: Some(person.clone()),
                });
            }
        }

        let resolve = |id: PersonId| match resolver.couple_of(id) {
            Some(couple) => NodeId::Couple(couple),
            None => NodeId::Person(id),
        };

        for rel in &records.relationships {
            if let Relationship::Parent { parent, child } = *rel {
                let from = graph.add_node(blank_or_known(resolve(parent), &lookup));
                let to = graph.add_node(blank_or_known(resolve(child), &lookup));
                graph.graph.add_edge(from, to, EdgeKind::Parent);
            }
        }

        debug!(
            "Built family graph: {} nodes ({} couples), {} edges",
            graph.node_count(),
            resolver.couple_count(),
            graph.edge_count()
        );

        Ok(graph)
    }
}

/// Payload for an endpoint that may not have a node yet
///
/// Couples always exist by the time edges are drawn, so only individual ids
/// missing from the people list reach the blank branch.
fn blank_or_known<F>(id: NodeId, lookup: &F) -> FamilyNode
where
    F: Fn(PersonId) -> Option<Person>,
{
    match id {
        NodeId::Person(person) => FamilyNode::Individual {
            id: person,
            person: lookup(person),
        },
        NodeId::Couple(couple) => FamilyNode::Couple {
            id: couple,
            first: lookup(couple.first()),
            second: lookup(couple.second()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinship_domain::NewPerson;

    fn id(v: u64) -> PersonId {
        PersonId::new(v)
    }

    fn family() -> FamilyRecords {
        let mut records = FamilyRecords::new();
        let rama = records.add_person(NewPerson::named("Rama")).unwrap();
        let sita = records.add_person(NewPerson::named("Sita")).unwrap();
        let luv = records.add_person(NewPerson::named("Luv")).unwrap();
        let kush = records.add_person(NewPerson::named("Kush")).unwrap();
        records.add_spouse(rama, sita);
        records.add_parent(rama, luv);
        records.add_parent(sita, kush);
        records
    }

    #[test]
    fn test_couple_replaces_members() {
        let graph = GraphBuilder::new().build(&family()).unwrap();
        let couple = NodeId::Couple(CoupleId::new(id(1), id(2)));

        assert!(graph.contains(&couple));
        assert!(!graph.contains(&NodeId::Person(id(1))));
        assert!(!graph.contains(&NodeId::Person(id(2))));
        assert_eq!(graph.node_count(), 3);
    }

    #[test]
    fn test_edges_start_at_couple() {
        let graph = GraphBuilder::new().build(&family()).unwrap();
        let couple = NodeId::Couple(CoupleId::new(id(1), id(2)));

        assert_eq!(graph.parents_of(&NodeId::Person(id(3))), vec![couple]);
        assert_eq!(graph.parents_of(&NodeId::Person(id(4))), vec![couple]);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_both_parents_recorded_gives_parallel_edges() {
        let mut records = family();
        records.add_parent(id(2), id(3));
        let graph = GraphBuilder::new().build(&records).unwrap();
        assert_eq!(graph.parents_of(&NodeId::Person(id(3))).len(), 2);
    }

    #[test]
    fn test_child_in_couple_is_redirected() {
        let mut records = family();
        let urmila = records.add_person(NewPerson::named("Urmila")).unwrap();
        records.add_spouse(id(3), urmila);

        let graph = GraphBuilder::new().build(&records).unwrap();
        let parents = graph.parents_of(&NodeId::Couple(CoupleId::new(id(3), urmila)));
        assert_eq!(parents, vec![NodeId::Couple(CoupleId::new(id(1), id(2)))]);
    }

    #[test]
    fn test_strict_rejects_unknown_ids() {
        let mut records = family();
        records.add_parent(id(1), id(99));
        let err = GraphBuilder::new().build(&records).unwrap_err();
        assert!(matches!(err, GraphError::UnknownPerson(p) if p == id(99)));
    }

    #[test]
    fn test_lenient_draws_blank_nodes() {
        let mut records = family();
        records.add_parent(id(1), id(99));
        let graph = GraphBuilder::lenient().build(&records).unwrap();

        let blank = graph.node(&NodeId::Person(id(99))).unwrap();
        assert_eq!(
            blank,
            &FamilyNode::Individual {
                id: id(99),
                person: None
            }
        );
    }

    #[test]
    fn test_lenient_couple_with_unknown_member() {
        let mut records = FamilyRecords::new();
        let rama = records.add_person(NewPerson::named("Rama")).unwrap();
        records.add_spouse(rama, id(7));

        let graph = GraphBuilder::lenient().build(&records).unwrap();
        match graph.node(&NodeId::Couple(CoupleId::new(rama, id(7)))) {
            Some(FamilyNode::Couple { first, second, .. }) => {
                assert_eq!(first.as_ref().map(|p| p.firstname.as_str()), Some("Rama"));
                assert!(second.is_none());
            }
            other => panic!("expected couple node, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_records() {
        let graph = GraphBuilder::new().build(&FamilyRecords::new()).unwrap();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId::Person(id(3)).to_string(), "3");
        assert_eq!(NodeId::Couple(CoupleId::new(id(2), id(1))).to_string(), "1_2");
    }
}
