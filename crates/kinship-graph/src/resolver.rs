//! Spouse-pair resolution
//!
//! Every distinct spouse pair becomes one couple node. Each person who appears
//! in a pair is redirected to that couple node when edges are drawn.
//!
//! A person in more than one pair (remarried, say) keeps only the couple
//! processed last. Pairs are processed in ascending order so the winner is
//! always the pair with the larger ids.

use kinship_domain::relationship::sorted_pair;
use kinship_domain::{PersonId, Relationship};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::warn;

/// Identity of a couple node: the two member ids, ascending
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CoupleId {
    first: PersonId,
    second: PersonId,
}

impl CoupleId {
    /// Create a couple id; argument order does not matter
    ///
    /// # Examples
    ///
    /// ```
    /// use kinship_domain::PersonId;
    /// use kinship_graph::CoupleId;
    ///
    /// let a = CoupleId::new(PersonId::new(2), PersonId::new(1));
    /// let b = CoupleId::new(PersonId::new(1), PersonId::new(2));
    /// assert_eq!(a, b);
    /// assert_eq!(a.to_string(), "1_2");
    /// ```
    pub fn new(a: PersonId, b: PersonId) -> Self {
        let (first, second) = sorted_pair(a, b);
        Self { first, second }
    }

    /// Member with the lower id
    pub fn first(&self) -> PersonId {
        self.first
    }

    /// Member with the higher id
    pub fn second(&self) -> PersonId {
        self.second
    }

    /// Whether `id` is one of the two members
    pub fn contains(&self, id: PersonId) -> bool {
        self.first == id || self.second == id
    }
}

impl fmt::Display for CoupleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.first, self.second)
    }
}

/// Mapping from married people to their couple node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpouseResolver {
    couples: BTreeSet<CoupleId>,
    mapping: BTreeMap<PersonId, CoupleId>,
}

impl SpouseResolver {
    /// Collect spouse pairs from `relationships`
    ///
    /// `{A,B}` and `{B,A}` collapse into one couple. Parent relationships are
    /// ignored.
    pub fn from_relationships<'a, I>(relationships: I) -> Self
    where
        I: IntoIterator<Item = &'a Relationship>,
    {
        let couples: BTreeSet<CoupleId> = relationships
            .into_iter()
            .filter_map(|rel| match *rel {
                Relationship::Spouse { person1, person2 } => Some(CoupleId::new(person1, person2)),
                Relationship::Parent { .. } => None,
            })
            .collect();

        let mut mapping = BTreeMap::new();
        for couple in &couples {
            for member in [couple.first, couple.second] {
                if let Some(previous) = mapping.insert(member, *couple) {
                    if previous != *couple {
                        warn!(
                            "Person {} is in couples {} and {}; drawing them in {}",
                            member, previous, couple, couple
                        );
                    }
                }
            }
        }

        Self { couples, mapping }
    }

    /// Every distinct couple, ascending
    pub fn couples(&self) -> impl Iterator<Item = &CoupleId> {
        self.couples.iter()
    }

    /// Number of distinct couples
    pub fn couple_count(&self) -> usize {
        self.couples.len()
    }

    /// Couple node a person is drawn in, if any
    pub fn couple_of(&self, id: PersonId) -> Option<CoupleId> {
        self.mapping.get(&id).copied()
    }

    /// Whether a person is drawn as part of a couple
    pub fn is_merged(&self, id: PersonId) -> bool {
        self.mapping.contains_key(&id)
    }

    /// Every (person, couple) assignment, ascending by person
    pub fn assignments(&self) -> impl Iterator<Item = (PersonId, CoupleId)> + '_ {
        self.mapping.iter().map(|(id, couple)| (*id, *couple))
    }
}
