//! One-time migration from name-keyed to id-keyed relationships
//!
//! Early data files stored relationships by first name (`person1`, `parent`,
//! ...). Names are not unique, so the canonical format uses ids. Migration
//! resolves each name against the people file (first match, case-insensitive)
//! and rewrites the relationships file in canonical form.

use crate::records::{LegacyRelationshipRecord, RelationshipRecord};
use crate::{read_json, JsonFileStore, StoreError};
use kinship_domain::{AddOutcome, FamilyRecords, Person, Relationship, RelationshipKind};
use tracing::{info, warn};

/// Outcome of a migration run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Records that were already id-keyed
    pub already_canonical: usize,

    /// Legacy records converted to ids
    pub converted: usize,

    /// Records dropped because they duplicated an earlier one
    pub duplicates: usize,

    /// Legacy records whose names could not be resolved, as `type: a -> b`
    ///
    /// When this is non-empty the relationships file is left untouched.
    pub unresolved: Vec<String>,
}

impl MigrationReport {
    /// Whether the file needed no changes
    pub fn is_noop(&self) -> bool {
        self.converted == 0 && self.duplicates == 0 && self.unresolved.is_empty()
    }
}

/// Resolve legacy records against `people`
///
/// Returns the converted relationships (duplicates removed) and the report.
pub fn convert_legacy(
    people: &[Person],
    legacy: &[LegacyRelationshipRecord],
) -> (Vec<Relationship>, MigrationReport) {
    let lookup = FamilyRecords::from_parts(people.to_vec(), Vec::new());
    let mut converted = FamilyRecords::new();
    let mut report = MigrationReport::default();

    for record in legacy {
        let (kind, a, b) = match record {
            LegacyRelationshipRecord::Spouse { person1, person2 } => {
                (RelationshipKind::Spouse, person1, person2)
            }
            LegacyRelationshipRecord::Parent { parent, child } => {
                (RelationshipKind::Parent, parent, child)
            }
        };

        match (lookup.find_by_firstname(a), lookup.find_by_firstname(b)) {
            (Some(pa), Some(pb)) => {
                let rel = match kind {
                    RelationshipKind::Spouse => Relationship::spouse(pa.id, pb.id),
                    RelationshipKind::Parent => Relationship::parent(pa.id, pb.id),
                };
                match converted.add_relationship(rel) {
                    AddOutcome::Added => report.converted += 1,
                    AddOutcome::Duplicate | AddOutcome::SelfReference => report.duplicates += 1,
                }
            }
            _ => report.unresolved.push(format!("{}: {} -> {}", kind, a, b)),
        }
    }

    (converted.relationships, report)
}

pub(crate) fn migrate_store(store: &JsonFileStore) -> Result<MigrationReport, StoreError> {
    let people = store.try_load_people()?;
    let path = store.relationships_path();
    if !path.exists() {
        return Ok(MigrationReport::default());
    }

    let raw: Vec<serde_json::Value> = read_json(&path)?;
    let mut merged = FamilyRecords::new();
    let mut legacy = Vec::new();
    let mut retained = Vec::new();
    let mut report = MigrationReport::default();

    for value in raw {
        if let Ok(record) = serde_json::from_value::<RelationshipRecord>(value.clone()) {
            match record.to_relationship() {
                Ok(rel) => {
                    if merged.add_relationship(rel).is_added() {
                        report.already_canonical += 1;
                    } else {
                        report.duplicates += 1;
                    }
                }
                Err(_) => {
                    report.already_canonical += 1;
                    retained.push(record);
                }
            }
            continue;
        }
        legacy.push(serde_json::from_value::<LegacyRelationshipRecord>(value)?);
    }

    let (converted, legacy_report) = convert_legacy(&people, &legacy);
    for rel in converted {
        if merged.add_relationship(rel).is_added() {
            report.converted += 1;
        } else {
            report.duplicates += 1;
        }
    }
    report.duplicates += legacy_report.duplicates;
    report.unresolved = legacy_report.unresolved;

    if !report.unresolved.is_empty() {
        for entry in &report.unresolved {
            warn!("Could not resolve legacy relationship {}", entry);
        }
        warn!("Leaving {} unchanged until every name resolves", path.display());
    } else if !report.is_noop() {
        store.write_relationships(&merged.relationships, &retained)?;
    }
    info!(
        "Migration: {} converted, {} already canonical, {} duplicates, {} unresolved",
        report.converted,
        report.already_canonical,
        report.duplicates,
        report.unresolved.len()
    );

    Ok(report)
}
