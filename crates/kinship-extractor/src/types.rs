//! Candidate and preview types for extraction

use kinship_domain::{Gender, NewPerson, PersonId, RelationshipKind};
use serde::Serialize;
use std::fmt;

/// A person as proposed by the model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PersonCandidate {
    /// Given name (never empty)
    pub firstname: String,
    /// Family name
    pub surname: String,
    /// Gender text as the model wrote it
    pub gender: String,
    /// Year of birth
    pub birth_year: String,
    /// Year of death
    pub death_year: String,
    /// Year of marriage; cleared unless four digits
    pub marriage_year: String,
}

impl PersonCandidate {
    /// Convert to domain details; an unrecognized gender is dropped
    pub fn to_new_person(&self) -> NewPerson {
        NewPerson {
            firstname: self.firstname.trim().to_string(),
            surname: self.surname.trim().to_string(),
            gender: Gender::parse(&self.gender),
            birth_year: self.birth_year.trim().to_string(),
            death_year: self.death_year.trim().to_string(),
            marriage_year: self.marriage_year.trim().to_string(),
        }
    }
}

/// A relationship as proposed by the model, keyed by first name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RelationshipCandidate {
    /// Two people are married
    Spouse {
        /// First spouse name
        person1: String,
        /// Second spouse name
        person2: String,
    },
    /// `parent` is a parent of `child`
    Parent {
        /// Parent name
        parent: String,
        /// Child name
        child: String,
    },
}

impl RelationshipCandidate {
    /// Kind of relationship
    pub fn kind(&self) -> RelationshipKind {
        match self {
            RelationshipCandidate::Spouse { .. } => RelationshipKind::Spouse,
            RelationshipCandidate::Parent { .. } => RelationshipKind::Parent,
        }
    }

    /// Both names, in stored order
    pub fn names(&self) -> (&str, &str) {
        match self {
            RelationshipCandidate::Spouse { person1, person2 } => (person1, person2),
            RelationshipCandidate::Parent { parent, child } => (parent, child),
        }
    }
}

impl fmt::Display for RelationshipCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (a, b) = self.names();
        write!(f, "{}: {} -> {}", self.kind(), a, b)
    }
}

/// Parsed model output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedFamily {
    /// Proposed people
    pub people: Vec<PersonCandidate>,

    /// Proposed relationships
    pub relationships: Vec<RelationshipCandidate>,

    /// Marriage years that were not four digits and got cleared
    #[serde(skip)]
    pub cleared_marriage_years: usize,

    /// Entries dropped for missing names or unknown types
    #[serde(skip)]
    pub dropped_entries: usize,
}

/// One side of a planned relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Someone already recorded
    Existing(PersonId),
    /// Index into [`ExtractionPreview::new_people`]
    New(usize),
}

/// A relationship that will be stored on commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRelationship {
    /// Spouse or parent
    pub kind: RelationshipKind,
    /// Spouse 1 or parent
    pub from: Endpoint,
    /// Spouse 2 or child
    pub to: Endpoint,
    /// Name the model used for `from`
    pub from_name: String,
    /// Name the model used for `to`
    pub to_name: String,
}

impl fmt::Display for PlannedRelationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            RelationshipKind::Spouse => {
                write!(f, "spouse: {} & {}", self.from_name, self.to_name)
            }
            RelationshipKind::Parent => {
                write!(f, "parent: {} -> {}", self.from_name, self.to_name)
            }
        }
    }
}

/// What a commit would change, computed without touching the records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionPreview {
    /// People not yet recorded, in the order the model listed them
    pub new_people: Vec<NewPerson>,

    /// Full names of proposed people who are already recorded
    pub duplicate_people: Vec<String>,

    /// Relationships that are new
    pub relationships: Vec<PlannedRelationship>,

    /// Relationships already recorded, repeated in the batch, or self-links
    pub skipped_relationships: usize,

    /// Relationships naming someone nobody could find, as `type: a -> b`
    pub unresolved: Vec<String>,

    /// Marriage years cleared while parsing
    pub cleared_marriage_years: usize,

    /// Model entries dropped for missing names or unknown types
    pub dropped_entries: usize,
}

impl ExtractionPreview {
    /// Whether committing would change nothing
    pub fn is_empty(&self) -> bool {
        self.new_people.is_empty() && self.relationships.is_empty()
    }
}

/// Result of committing a preview
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitSummary {
    /// Ids assigned to the new people, in order
    pub people_added: Vec<PersonId>,

    /// Relationships stored
    pub relationships_added: usize,

    /// Relationships the records rejected as duplicates at commit time
    pub relationships_skipped: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_to_new_person() {
        let candidate = PersonCandidate {
            firstname: " Sita ".to_string(),
            gender: "female".to_string(),
            ..PersonCandidate::default()
        };
        let person = candidate.to_new_person();
        assert_eq!(person.firstname, "Sita");
        assert_eq!(person.gender, Some(Gender::Female));
    }

    #[test]
    fn test_unknown_gender_dropped() {
        let candidate = PersonCandidate {
            firstname: "Luv".to_string(),
            gender: "Male/Female".to_string(),
            ..PersonCandidate::default()
        };
        assert_eq!(candidate.to_new_person().gender, None);
    }

    #[test]
    fn test_relationship_candidate_display() {
        let rel = RelationshipCandidate::Parent {
            parent: "Rama".to_string(),
            child: "Kush".to_string(),
        };
        assert_eq!(rel.to_string(), "parent: Rama -> Kush");
    }

    #[test]
    fn test_relationship_candidate_serializes_tagged() {
        let rel = RelationshipCandidate::Spouse {
            person1: "Rama".to_string(),
            person2: "Sita".to_string(),
        };
        let json = serde_json::to_value(&rel).unwrap();
        assert_eq!(json["type"], "spouse");
        assert_eq!(json["person1"], "Rama");
    }

    #[test]
    fn test_planned_relationship_display() {
        let planned = PlannedRelationship {
            kind: RelationshipKind::Spouse,
            from: Endpoint::Existing(PersonId::new(1)),
            to: Endpoint::New(0),
            from_name: "Rama".to_string(),
            to_name: "Sita".to_string(),
        };
        assert_eq!(planned.to_string(), "spouse: Rama & Sita");
    }
}
