//! Persisted record shapes
//!
//! These are the exact JSON shapes written to `people_only.json` and
//! `relationships_only.json`. Ids are strings here and typed everywhere else.

use crate::StoreError;
use kinship_domain::{Gender, Person, PersonId, Relationship};
use serde::{Deserialize, Deserializer, Serialize};

/// A person as stored on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    /// Decimal id string
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,

    /// Given name (required)
    #[serde(deserialize_with = "lenient_string")]
    pub firstname: String,

    /// Family name
    #[serde(default, deserialize_with = "lenient_string")]
    pub surname: String,

    /// `Male`, `Female`, `Other` or empty
    #[serde(default, deserialize_with = "lenient_string")]
    pub gender: String,

    /// Year of birth
    #[serde(default, deserialize_with = "lenient_string")]
    pub birth_year: String,

    /// Year of death
    #[serde(default, deserialize_with = "lenient_string")]
    pub death_year: String,

    /// Year of marriage
    #[serde(default, deserialize_with = "lenient_string")]
    pub marriage_year: String,
}

/// A relationship as stored on disk (canonical, id-keyed)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RelationshipRecord {
    /// Spouse pair
    Spouse {
        /// First spouse id
        #[serde(deserialize_with = "lenient_string")]
        person1_id: String,
        /// Second spouse id
        #[serde(deserialize_with = "lenient_string")]
        person2_id: String,
    },

    /// Parent/child pair
    Parent {
        /// Parent id
        #[serde(deserialize_with = "lenient_string")]
        parent_id: String,
        /// Child id
        #[serde(deserialize_with = "lenient_string")]
        child_id: String,
    },
}

/// The older name-keyed relationship shape, read only by migration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LegacyRelationshipRecord {
    /// Spouse pair by first name
    Spouse {
        /// First spouse name
        person1: String,
        /// Second spouse name
        person2: String,
    },

    /// Parent/child pair by first name
    Parent {
        /// Parent name
        parent: String,
        /// Child name
        child: String,
    },
}

impl From<&Person> for PersonRecord {
    fn from(person: &Person) -> Self {
        Self {
            id: person.id.to_string(),
            firstname: person.firstname.clone(),
            surname: person.surname.clone(),
            gender: person.gender_str().to_string(),
            birth_year: person.birth_year.clone(),
            death_year: person.death_year.clone(),
            marriage_year: person.marriage_year.clone(),
        }
    }
}

impl PersonRecord {
    /// Convert to the domain type
    ///
    /// Fails when the id is not numeric. An unrecognized gender is dropped.
    pub fn to_person(&self) -> Result<Person, StoreError> {
        let id = parse_id(&self.id)?;
        let mut person = Person::new(id, self.firstname.clone());
        person.surname = self.surname.clone();
        person.gender = Gender::parse(&self.gender);
        person.birth_year = self.birth_year.clone();
        person.death_year = self.death_year.clone();
        person.marriage_year = self.marriage_year.clone();
        person.sanitize_marriage_year();
        Ok(person)
    }
}

impl From<&Relationship> for RelationshipRecord {
    fn from(rel: &Relationship) -> Self {
        match *rel {
            Relationship::Spouse { person1, person2 } => RelationshipRecord::Spouse {
                person1_id: person1.to_string(),
                person2_id: person2.to_string(),
            },
            Relationship::Parent { parent, child } => RelationshipRecord::Parent {
                parent_id: parent.to_string(),
                child_id: child.to_string(),
            },
        }
    }
}

impl RelationshipRecord {
    /// Convert to the domain type, failing on non-numeric ids
    pub fn to_relationship(&self) -> Result<Relationship, StoreError> {
        match self {
            RelationshipRecord::Spouse {
                person1_id,
                person2_id,
            } => Ok(Relationship::spouse(parse_id(person1_id)?, parse_id(person2_id)?)),
            RelationshipRecord::Parent {
                parent_id,
                child_id,
            } => Ok(Relationship::parent(parse_id(parent_id)?, parse_id(child_id)?)),
        }
    }
}

/// Next id for a set of persisted people
///
/// Non-numeric ids are ignored; the result is always `max + 1`, or `None`
/// when the largest id is `u64::MAX`.
///
/// # Examples
///
/// ```
/// use kinship_store::records::{next_id, PersonRecord};
///
/// assert_eq!(next_id(&[]).unwrap().to_string(), "1");
/// ```
pub fn next_id(people: &[PersonRecord]) -> Option<PersonId> {
    PersonId::next_after(
        people
            .iter()
            .filter_map(|p| PersonId::from_string(&p.id).ok()),
    )
}

fn parse_id(raw: &str) -> Result<PersonId, StoreError> {
    PersonId::from_string(raw).map_err(StoreError::InvalidData)
}

/// Accept strings, numbers and null for text fields
///
/// Files edited by hand or written by other tools sometimes store years and
/// ids as bare numbers.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Text(String),
        Int(i64),
        Float(f64),
        Null(()),
    }

    Ok(match Loose::deserialize(deserializer)? {
        Loose::Text(s) => s,
        Loose::Int(n) => n.to_string(),
        Loose::Float(n) => n.to_string(),
        Loose::Null(()) => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> PersonRecord {
        PersonRecord {
            id: id.to_string(),
            firstname: "x".to_string(),
            surname: String::new(),
            gender: String::new(),
            birth_year: String::new(),
            death_year: String::new(),
            marriage_year: String::new(),
        }
    }

    #[test]
    fn test_next_id_empty() {
        assert_eq!(next_id(&[]), Some(PersonId::new(1)));
    }

    #[test]
    fn test_next_id_max_plus_one() {
        assert_eq!(next_id(&[record("3"), record("7")]), Some(PersonId::new(8)));
    }

    #[test]
    fn test_next_id_ignores_non_numeric() {
        assert_eq!(next_id(&[record("abc"), record("2")]), Some(PersonId::new(3)));
        assert_eq!(next_id(&[record("abc")]), Some(PersonId::new(1)));
    }

    #[test]
    fn test_person_record_defaults() {
        let json = r#"{"id": "1", "firstname": "Rama"}"#;
        let rec: PersonRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.surname, "");
        assert_eq!(rec.gender, "");
        assert_eq!(rec.marriage_year, "");
    }

    #[test]
    fn test_person_record_requires_firstname() {
        let json = r#"{"id": "1", "surname": "Raghav"}"#;
        assert!(serde_json::from_str::<PersonRecord>(json).is_err());
    }

    #[test]
    fn test_person_record_accepts_numbers_and_null() {
        let json = r#"{"id": 4, "firstname": "Luv", "birth_year": 1950, "death_year": null}"#;
        let rec: PersonRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.id, "4");
        assert_eq!(rec.birth_year, "1950");
        assert_eq!(rec.death_year, "");
    }

    #[test]
    fn test_person_conversion() {
        let json = r#"{"id": "2", "firstname": "Sita", "gender": "female", "marriage_year": "Rama"}"#;
        let rec: PersonRecord = serde_json::from_str(json).unwrap();
        let person = rec.to_person().unwrap();
        assert_eq!(person.id, PersonId::new(2));
        assert_eq!(person.gender, Some(Gender::Female));
        assert_eq!(person.marriage_year, "");

        let back = PersonRecord::from(&person);
        assert_eq!(back.gender, "Female");
    }

    #[test]
    fn test_person_conversion_rejects_non_numeric_id() {
        assert!(record("abc").to_person().is_err());
    }

    #[test]
    fn test_relationship_record_tags() {
        let rel = Relationship::spouse(PersonId::new(1), PersonId::new(2));
        let json = serde_json::to_value(RelationshipRecord::from(&rel)).unwrap();
        assert_eq!(json["type"], "spouse");
        assert_eq!(json["person1_id"], "1");
        assert_eq!(json["person2_id"], "2");

        let rel = Relationship::parent(PersonId::new(1), PersonId::new(3));
        let json = serde_json::to_value(RelationshipRecord::from(&rel)).unwrap();
        assert_eq!(json["type"], "parent");
        assert_eq!(json["parent_id"], "1");
        assert_eq!(json["child_id"], "3");
    }

    #[test]
    fn test_legacy_shape_is_not_canonical() {
        let json = r#"{"type": "spouse", "person1": "Rama", "person2": "Sita"}"#;
        assert!(serde_json::from_str::<RelationshipRecord>(json).is_err());
        let legacy: LegacyRelationshipRecord = serde_json::from_str(json).unwrap();
        assert_eq!(
            legacy,
            LegacyRelationshipRecord::Spouse {
                person1: "Rama".to_string(),
                person2: "Sita".to_string()
            }
        );
    }
}
