//! Fact generation
//!
//! Turns structured records into short sentences that can be embedded and
//! retrieved as context for question answering.

use crate::{FamilyRecords, Person, Relationship};

/// Generate one sentence per known attribute and relationship
///
/// Output order follows the records: people first, then relationships.
///
/// # Examples
///
/// ```
/// use kinship_domain::{facts, FamilyRecords, NewPerson};
///
/// let mut records = FamilyRecords::new();
/// let rama = records.add_person(NewPerson::named("Rama")).unwrap();
/// let luv = records.add_person(NewPerson::named("Luv")).unwrap();
/// records.add_parent(rama, luv);
///
/// let facts = facts::generate(&records);
/// assert!(facts.contains(&"Rama is a parent of Luv.".to_string()));
/// ```
pub fn generate(records: &FamilyRecords) -> Vec<String> {
    let mut facts = Vec::new();

    for person in &records.people {
        facts.extend(person_facts(person));
    }

    for rel in &records.relationships {
        facts.push(relationship_fact(records, rel));
    }

    facts
}

fn person_facts(person: &Person) -> Vec<String> {
    let name = person.full_name();
    let mut facts = Vec::new();

    match person.gender {
        Some(gender) => facts.push(format!("{} is {}.", name, gender.as_str().to_lowercase())),
        None => facts.push(format!("{} is a member of the family.", name)),
    }

    if !person.birth_year.trim().is_empty() {
        facts.push(format!("{} was born in {}.", name, person.birth_year.trim()));
    }
    if !person.death_year.trim().is_empty() {
        facts.push(format!("{} died in {}.", name, person.death_year.trim()));
    }

    facts
}

fn relationship_fact(records: &FamilyRecords, rel: &Relationship) -> String {
    match *rel {
        Relationship::Spouse { person1, person2 } => {
            let mut fact = format!(
                "{} and {} are married.",
                records.display_name(person1),
                records.display_name(person2)
            );
            let year = [person1, person2]
                .iter()
                .filter_map(|id| records.person(*id))
                .map(|p| p.marriage_year.as_str())
                .find(|y| !y.is_empty());
            if let Some(year) = year {
                fact.push_str(&format!(" They married in {}.", year));
            }
            fact
        }
        Relationship::Parent { parent, child } => format!(
            "{} is a parent of {}.",
            records.display_name(parent),
            records.display_name(child)
        ),
    }
}
