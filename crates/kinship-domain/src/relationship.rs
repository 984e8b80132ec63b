//! Relationship module - spouse and parent/child links between people

use crate::PersonId;
use std::fmt;

/// Kind of relationship, without its endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationshipKind {
    /// Married couple (unordered)
    Spouse,
    /// Parent to child (ordered)
    Parent,
}

impl RelationshipKind {
    /// Tag used in the persisted `type` field
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipKind::Spouse => "spouse",
            RelationshipKind::Parent => "parent",
        }
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A relationship between two people
///
/// Relationships are value objects: two records with the same [`key`](Self::key)
/// describe the same fact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Relationship {
    /// Two people married to each other; order carries no meaning
    Spouse {
        /// First spouse as entered
        person1: PersonId,
        /// Second spouse as entered
        person2: PersonId,
    },

    /// `parent` is a parent of `child`
    Parent {
        /// The parent
        parent: PersonId,
        /// The child
        child: PersonId,
    },
}

/// Identity of a relationship for duplicate detection
///
/// Spouse keys hold the pair in ascending order, so `{A,B}` and `{B,A}` match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RelationshipKey {
    /// Sorted spouse pair
    Spouse(PersonId, PersonId),
    /// Ordered (parent, child) pair
    Parent(PersonId, PersonId),
}

impl Relationship {
    /// Create a spouse relationship
    pub fn spouse(person1: PersonId, person2: PersonId) -> Self {
        Relationship::Spouse { person1, person2 }
    }

    /// Create a parent/child relationship
    pub fn parent(parent: PersonId, child: PersonId) -> Self {
        Relationship::Parent { parent, child }
    }

    /// Kind of this relationship
    pub fn kind(&self) -> RelationshipKind {
        match self {
            Relationship::Spouse { .. } => RelationshipKind::Spouse,
            Relationship::Parent { .. } => RelationshipKind::Parent,
        }
    }

    /// Duplicate-detection key
    ///
    /// # Examples
    ///
    /// ```
    /// use kinship_domain::{PersonId, Relationship};
    ///
    /// let a = Relationship::spouse(PersonId::new(1), PersonId::new(2));
    /// let b = Relationship::spouse(PersonId::new(2), PersonId::new(1));
    /// assert_eq!(a.key(), b.key());
    /// ```
    pub fn key(&self) -> RelationshipKey {
        match *self {
            Relationship::Spouse { person1, person2 } => {
                let (low, high) = sorted_pair(person1, person2);
                RelationshipKey::Spouse(low, high)
            }
            Relationship::Parent { parent, child } => RelationshipKey::Parent(parent, child),
        }
    }

    /// Both endpoints, in stored order
    pub fn endpoints(&self) -> (PersonId, PersonId) {
        match *self {
            Relationship::Spouse { person1, person2 } => (person1, person2),
            Relationship::Parent { parent, child } => (parent, child),
        }
    }

    /// Whether `id` is one of the endpoints
    pub fn involves(&self, id: PersonId) -> bool {
        let (a, b) = self.endpoints();
        a == id || b == id
    }

    /// Whether both endpoints are the same person
    pub fn is_self_referential(&self) -> bool {
        let (a, b) = self.endpoints();
        a == b
    }
}

/// Order two ids ascending
pub fn sorted_pair(a: PersonId, b: PersonId) -> (PersonId, PersonId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(v: u64) -> PersonId {
        PersonId::new(v)
    }

    #[test]
    fn test_spouse_key_is_order_insensitive() {
        let a = Relationship::spouse(id(5), id(2));
        let b = Relationship::spouse(id(2), id(5));
        assert_eq!(a.key(), RelationshipKey::Spouse(id(2), id(5)));
        assert_eq!(a.key(), b.key());
        assert_ne!(a, b);
    }

    #[test]
    fn test_parent_key_is_ordered() {
        let a = Relationship::parent(id(1), id(3));
        let b = Relationship::parent(id(3), id(1));
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn test_spouse_and_parent_keys_differ() {
        let spouse = Relationship::spouse(id(1), id(2));
        let parent = Relationship::parent(id(1), id(2));
        assert_ne!(spouse.key(), parent.key());
    }

    #[test]
    fn test_involves_and_self_reference() {
        let rel = Relationship::parent(id(1), id(3));
        assert!(rel.involves(id(1)));
        assert!(rel.involves(id(3)));
        assert!(!rel.involves(id(2)));
        assert!(!rel.is_self_referential());
        assert!(Relationship::spouse(id(4), id(4)).is_self_referential());
    }

    #[test]
    fn test_kind_tags() {
        assert_eq!(Relationship::spouse(id(1), id(2)).kind().as_str(), "spouse");
        assert_eq!(Relationship::parent(id(1), id(2)).kind().as_str(), "parent");
    }
}
