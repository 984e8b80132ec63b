//! Turning extracted candidates into changes to the records
//!
//! `preview` decides what is new without touching anything. `commit` then
//! applies exactly that plan. People are deduplicated by lower-cased
//! `(firstname, surname)`; relationships by their key, so spouse pairs match
//! in either order.

use crate::error::ExtractorError;
use crate::types::{
    CommitSummary, Endpoint, ExtractedFamily, ExtractionPreview, PlannedRelationship,
};
use kinship_domain::{AddOutcome, FamilyRecords, NewPerson, PersonId, Relationship, RelationshipKind};
use std::collections::HashSet;
use tracing::{debug, info};

/// Work out which people and relationships `extracted` would add
pub fn preview(extracted: &ExtractedFamily, records: &FamilyRecords) -> ExtractionPreview {
    let mut plan = ExtractionPreview {
        cleared_marriage_years: extracted.cleared_marriage_years,
        dropped_entries: extracted.dropped_entries,
        ..ExtractionPreview::default()
    };

    let mut batch_names = HashSet::new();
    for candidate in &extracted.people {
        let person = candidate.to_new_person();
        let key = person.name_key();
        if records.contains_name(&person.firstname, &person.surname) || !batch_names.insert(key) {
            plan.duplicate_people.push(display(&person));
            continue;
        }
        plan.new_people.push(person);
    }

    let mut batch_keys = HashSet::new();
    for candidate in &extracted.relationships {
        let (a, b) = candidate.names();
        let (from, to) = match (
            resolve(a, records, &plan.new_people),
            resolve(b, records, &plan.new_people),
        ) {
            (Some(from), Some(to)) => (from, to),
            _ => {
                plan.unresolved.push(candidate.to_string());
                continue;
            }
        };

        if from == to {
            plan.skipped_relationships += 1;
            continue;
        }

        let kind = candidate.kind();
        if let (Endpoint::Existing(x), Endpoint::Existing(y)) = (from, to) {
            if records.contains_relationship(&relationship(kind, x, y)) {
                plan.skipped_relationships += 1;
                continue;
            }
        }

        let key = match kind {
            RelationshipKind::Spouse => batch_key(kind, sorted(from, to)),
            RelationshipKind::Parent => batch_key(kind, (from, to)),
        };
        if !batch_keys.insert(key) {
            plan.skipped_relationships += 1;
            continue;
        }

        plan.relationships.push(PlannedRelationship {
            kind,
            from,
            to,
            from_name: a.to_string(),
            to_name: b.to_string(),
        });
    }

    debug!(
        "Preview: {} new people, {} new relationships, {} skipped, {} unresolved",
        plan.new_people.len(),
        plan.relationships.len(),
        plan.skipped_relationships,
        plan.unresolved.len()
    );

    plan
}

/// Apply a preview to the records
///
/// New people get ids in order, starting at the records' next id. Each
/// relationship still goes through the records' duplicate check. Either the
/// whole plan is applied or the records are left as they were: a plan built
/// from output with dropped entries is refused, as is one that runs out of
/// ids.
pub fn commit(
    plan: ExtractionPreview,
    records: &mut FamilyRecords,
) -> Result<CommitSummary, ExtractorError> {
    if plan.dropped_entries > 0 {
        return Err(ExtractorError::IncompleteOutput(plan.dropped_entries));
    }

    let mut staged = records.clone();
    let mut summary = CommitSummary::default();

    for person in plan.new_people {
        summary.people_added.push(staged.add_person(person)?);
    }

    let id_of = |endpoint: Endpoint| match endpoint {
        Endpoint::Existing(id) => Some(id),
        Endpoint::New(idx) => summary.people_added.get(idx).copied(),
    };

    let mut outcomes = Vec::with_capacity(plan.relationships.len());
    for planned in &plan.relationships {
        if let (Some(from), Some(to)) = (id_of(planned.from), id_of(planned.to)) {
            outcomes.push(relationship(planned.kind, from, to));
        }
    }

    for rel in outcomes {
        match staged.add_relationship(rel) {
            AddOutcome::Added => summary.relationships_added += 1,
            AddOutcome::Duplicate | AddOutcome::SelfReference => {
                summary.relationships_skipped += 1
            }
        }
    }

    *records = staged;
    info!(
        "Committed {} people and {} relationships",
        summary.people_added.len(),
        summary.relationships_added
    );

    Ok(summary)
}

/// Existing people first, then people added in this batch
fn resolve(name: &str, records: &FamilyRecords, new_people: &[NewPerson]) -> Option<Endpoint> {
    if let Some(person) = records.find_by_firstname(name) {
        return Some(Endpoint::Existing(person.id));
    }
    let wanted = name.trim().to_lowercase();
    new_people
        .iter()
        .position(|p| p.firstname.trim().to_lowercase() == wanted)
        .map(Endpoint::New)
}

fn relationship(kind: RelationshipKind, a: PersonId, b: PersonId) -> Relationship {
    match kind {
        RelationshipKind::Spouse => Relationship::spouse(a, b),
        RelationshipKind::Parent => Relationship::parent(a, b),
    }
}

type BatchKey = (RelationshipKind, Endpoint, Endpoint);

fn batch_key(kind: RelationshipKind, (a, b): (Endpoint, Endpoint)) -> BatchKey {
    (kind, a, b)
}

fn sorted(a: Endpoint, b: Endpoint) -> (Endpoint, Endpoint) {
    if endpoint_order(a) <= endpoint_order(b) {
        (a, b)
    } else {
        (b, a)
    }
}

fn endpoint_order(endpoint: Endpoint) -> (u8, u64) {
    match endpoint {
        Endpoint::Existing(id) => (0, id.value()),
        Endpoint::New(idx) => (1, idx as u64),
    }
}

fn display(person: &NewPerson) -> String {
    let (first, sur) = (person.firstname.trim(), person.surname.trim());
    if sur.is_empty() {
        first.to_string()
    } else {
        format!("{} {}", first, sur)
    }
}
