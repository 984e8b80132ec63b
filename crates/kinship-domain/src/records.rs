//! In-memory working copy of people and relationships

use crate::person::name_key;
use crate::person::IdsExhausted;
use crate::{NewPerson, Person, PersonId, Relationship};
use std::collections::BTreeSet;

/// Result of trying to add a relationship
///
/// Duplicates and self-links are rejected quietly rather than treated as
/// errors; callers decide whether to tell the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The relationship was stored
    Added,
    /// An equivalent relationship already exists
    Duplicate,
    /// Both endpoints are the same person
    SelfReference,
}

impl AddOutcome {
    /// Whether anything was stored
    pub fn is_added(&self) -> bool {
        matches!(self, AddOutcome::Added)
    }
}

/// People and relationships held by the application
///
/// This is the sole owner of both collections. Graph building and fact
/// generation borrow it read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FamilyRecords {
    /// Everyone recorded, in insertion order
    pub people: Vec<Person>,

    /// Every relationship, in insertion order
    pub relationships: Vec<Relationship>,
}

impl FamilyRecords {
    /// Create an empty set of records
    pub fn new() -> Self {
        Self::default()
    }

    /// Build records from already-loaded collections
    pub fn from_parts(people: Vec<Person>, relationships: Vec<Relationship>) -> Self {
        Self {
            people,
            relationships,
        }
    }

    /// Whether there are no people and no relationships
    pub fn is_empty(&self) -> bool {
        self.people.is_empty() && self.relationships.is_empty()
    }

    /// Look up a person by id
    pub fn person(&self, id: PersonId) -> Option<&Person> {
        self.people.iter().find(|p| p.id == id)
    }

    /// The id the next added person will receive, if one is left
    pub fn next_id(&self) -> Option<PersonId> {
        PersonId::next_after(self.people.iter().map(|p| p.id))
    }

    /// Add a person, assigning the next free id
    ///
    /// An invalid marriage year is cleared on the way in. Fails without
    /// changing anything once the largest id in use is `u64::MAX`.
    pub fn add_person(&mut self, details: NewPerson) -> Result<PersonId, IdsExhausted> {
        let id = self.next_id().ok_or(IdsExhausted)?;
        let mut person = details.into_person(id);
        person.sanitize_marriage_year();
        self.people.push(person);
        Ok(id)
    }

    /// Replace the stored record with the same id
    ///
    /// Returns `false` when no such person exists.
    pub fn replace_person(&mut self, mut person: Person) -> bool {
        person.sanitize_marriage_year();
        match self.people.iter_mut().find(|p| p.id == person.id) {
            Some(slot) => {
                *slot = person;
                true
            }
            None => false,
        }
    }

    /// Whether a person with the same lower-cased (firstname, surname) exists
    pub fn contains_name(&self, firstname: &str, surname: &str) -> bool {
        let key = name_key(firstname, surname);
        self.people.iter().any(|p| p.name_key() == key)
    }

    /// First person whose first name matches, ignoring case and whitespace
    pub fn find_by_firstname(&self, firstname: &str) -> Option<&Person> {
        let wanted = firstname.trim().to_lowercase();
        self.people
            .iter()
            .find(|p| p.firstname.trim().to_lowercase() == wanted)
    }

    /// Whether an equivalent relationship is already stored
    pub fn contains_relationship(&self, relationship: &Relationship) -> bool {
        let key = relationship.key();
        self.relationships.iter().any(|r| r.key() == key)
    }

    /// Add a relationship unless it duplicates an existing one
    pub fn add_relationship(&mut self, relationship: Relationship) -> AddOutcome {
        if relationship.is_self_referential() {
            return AddOutcome::SelfReference;
        }
        if self.contains_relationship(&relationship) {
            return AddOutcome::Duplicate;
        }
        self.relationships.push(relationship);
        AddOutcome::Added
    }

    /// Record two people as spouses
    pub fn add_spouse(&mut self, person1: PersonId, person2: PersonId) -> AddOutcome {
        self.add_relationship(Relationship::spouse(person1, person2))
    }

    /// Record `parent` as a parent of `child`
    pub fn add_parent(&mut self, parent: PersonId, child: PersonId) -> AddOutcome {
        self.add_relationship(Relationship::parent(parent, child))
    }

    /// Name to show for an id; falls back to `person #<id>` when unknown
    pub fn display_name(&self, id: PersonId) -> String {
        match self.person(id) {
            Some(person) => person.full_name(),
            None => format!("person #{}", id),
        }
    }

    /// Ids referenced by relationships but missing from `people`, ascending
    pub fn unknown_references(&self) -> Vec<PersonId> {
        let known: BTreeSet<PersonId> = self.people.iter().map(|p| p.id).collect();
        let mut missing = BTreeSet::new();
        for rel in &self.relationships {
            let (a, b) = rel.endpoints();
            for id in [a, b] {
                if !known.contains(&id) {
                    missing.insert(id);
                }
            }
        }
        missing.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(v: u64) -> PersonId {
        PersonId::new(v)
    }

    fn sample() -> FamilyRecords {
        let mut records = FamilyRecords::new();
        records.add_person(NewPerson::named("Rama")).unwrap();
        records.add_person(NewPerson::named("Sita")).unwrap();
        records.add_person(NewPerson::named("Luv")).unwrap();
        records
    }

    #[test]
    fn test_add_person_assigns_sequential_ids() {
        let records = sample();
        let ids: Vec<_> = records.people.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![id(1), id(2), id(3)]);
        assert_eq!(records.next_id(), Some(id(4)));
    }

    #[test]
    fn test_add_person_uses_max_plus_one() {
        let mut records = FamilyRecords::from_parts(
            vec![Person::new(id(3), "A"), Person::new(id(7), "B")],
            Vec::new(),
        );
        assert_eq!(records.add_person(NewPerson::named("C")).unwrap(), id(8));
    }

    #[test]
    fn test_add_person_fails_when_ids_exhausted() {
        let mut records =
            FamilyRecords::from_parts(vec![Person::new(id(u64::MAX), "Big")], Vec::new());
        assert_eq!(records.next_id(), None);
        assert_eq!(records.add_person(NewPerson::named("Kush")), Err(IdsExhausted));
        assert_eq!(records.people.len(), 1);
    }

    #[test]
    fn test_add_person_clears_bad_marriage_year() {
        let mut records = FamilyRecords::new();
        let new_id = records.add_person(NewPerson {
            marriage_year: "Sita".to_string(),
            ..NewPerson::named("Rama")
        }).unwrap();
        assert_eq!(records.person(new_id).unwrap().marriage_year, "");
    }

    #[test]
    fn test_duplicate_spouse_rejected_in_either_order() {
        let mut records = sample();
        assert_eq!(records.add_spouse(id(1), id(2)), AddOutcome::Added);
        assert_eq!(records.add_spouse(id(1), id(2)), AddOutcome::Duplicate);
        assert_eq!(records.add_spouse(id(2), id(1)), AddOutcome::Duplicate);
        assert_eq!(records.relationships.len(), 1);
    }

    #[test]
    fn test_duplicate_parent_rejected() {
        let mut records = sample();
        assert!(records.add_parent(id(1), id(3)).is_added());
        assert_eq!(records.add_parent(id(1), id(3)), AddOutcome::Duplicate);
        // The reverse direction is a different relationship
        assert!(records.add_parent(id(3), id(1)).is_added());
        assert_eq!(records.relationships.len(), 2);
    }

    #[test]
    fn test_self_reference_rejected() {
        let mut records = sample();
        assert_eq!(records.add_spouse(id(1), id(1)), AddOutcome::SelfReference);
        assert_eq!(records.add_parent(id(2), id(2)), AddOutcome::SelfReference);
        assert!(records.relationships.is_empty());
    }

    #[test]
    fn test_find_by_firstname() {
        let records = sample();
        assert_eq!(records.find_by_firstname("sita").unwrap().id, id(2));
        assert_eq!(records.find_by_firstname(" LUV ").unwrap().id, id(3));
        assert!(records.find_by_firstname("Kush").is_none());
    }

    #[test]
    fn test_contains_name() {
        let records = sample();
        assert!(records.contains_name("RAMA", ""));
        assert!(!records.contains_name("Rama", "Raghav"));
    }

    #[test]
    fn test_replace_person() {
        let mut records = sample();
        let mut updated = records.person(id(3)).unwrap().clone();
        updated.birth_year = "1920".to_string();
        assert!(records.replace_person(updated));
        assert_eq!(records.person(id(3)).unwrap().birth_year, "1920");
        assert!(!records.replace_person(Person::new(id(99), "Ghost")));
    }

    #[test]
    fn test_unknown_references() {
        let mut records = sample();
        records.add_parent(id(1), id(9));
        records.add_spouse(id(8), id(2));
        assert_eq!(records.unknown_references(), vec![id(8), id(9)]);
        assert_eq!(records.display_name(id(9)), "person #9");
        assert_eq!(records.display_name(id(1)), "Rama");
    }
}
