//! In-memory application state over the JSON store.

use crate::error::{CliError, Result};
use kinship_domain::traits::FamilyStore;
use kinship_domain::{AddOutcome, FamilyRecords, NewPerson, PersonId, Relationship};
use kinship_extractor::{commit, CommitSummary, ExtractionPreview};
use kinship_store::{JsonFileStore, MigrationReport};
use std::path::Path;
use tracing::{debug, info, warn};

/// Records loaded from disk plus whether they changed since the last save.
///
/// Nothing is written until [`Session::save`] is called. When the files on
/// disk could not be loaded the session starts empty and read-only, so a
/// save cannot replace data it never saw.
pub struct Session {
    store: JsonFileStore,
    records: FamilyRecords,
    dirty: bool,
    load_error: Option<String>,
}

impl Session {
    /// Load the records under `data_dir`; problems fall back to empty records.
    pub fn open(data_dir: impl AsRef<Path>) -> Self {
        let store = JsonFileStore::new(data_dir.as_ref());
        let (records, load_error) = load(&store);
        debug!(
            "Session opened with {} people and {} relationships",
            records.people.len(),
            records.relationships.len()
        );
        Self {
            store,
            records,
            dirty: false,
            load_error,
        }
    }

    /// Why the data on disk could not be loaded, if it could not.
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    fn ensure_writable(&self) -> Result<()> {
        match &self.load_error {
            Some(reason) => Err(CliError::NotPermitted(format!(
                "data in {} could not be loaded, so changes are disabled ({}); \
                 run `kinship migrate` or repair the files first",
                self.store.data_dir().display(),
                reason
            ))),
            None => Ok(()),
        }
    }

    /// Current records.
    pub fn records(&self) -> &FamilyRecords {
        &self.records
    }

    /// Directory the session saves to.
    pub fn data_dir(&self) -> &Path {
        self.store.data_dir()
    }

    /// Whether there are changes not yet saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Record a new person and return the assigned id.
    pub fn add_person(&mut self, mut person: NewPerson) -> Result<PersonId> {
        self.ensure_writable()?;
        person.firstname = person.firstname.trim().to_string();
        if person.firstname.is_empty() {
            return Err(CliError::InvalidInput("First name is required".to_string()));
        }
        if !kinship_domain::person::is_valid_marriage_year(&person.marriage_year) {
            return Err(CliError::InvalidInput(format!(
                "Marriage year '{}' must be four digits",
                person.marriage_year
            )));
        }

        let id = self.records.add_person(person)?;
        self.dirty = true;
        info!("Added person {}", id);
        Ok(id)
    }

    /// Record two known people as spouses.
    pub fn add_spouse(&mut self, person1: PersonId, person2: PersonId) -> Result<AddOutcome> {
        self.add_relationship(Relationship::spouse(person1, person2))
    }

    /// Record a known parent of a known child.
    pub fn add_parent(&mut self, parent: PersonId, child: PersonId) -> Result<AddOutcome> {
        self.add_relationship(Relationship::parent(parent, child))
    }

    fn add_relationship(&mut self, relationship: Relationship) -> Result<AddOutcome> {
        self.ensure_writable()?;
        let (a, b) = relationship.endpoints();
        for id in [a, b] {
            if self.records.person(id).is_none() {
                return Err(CliError::UnknownPerson(id));
            }
        }

        let outcome = self.records.add_relationship(relationship);
        if outcome.is_added() {
            self.dirty = true;
        }
        Ok(outcome)
    }

    /// Apply an extraction preview.
    pub fn commit_extraction(&mut self, preview: ExtractionPreview) -> Result<CommitSummary> {
        self.ensure_writable()?;
        let summary = commit(preview, &mut self.records)?;
        if !summary.people_added.is_empty() || summary.relationships_added > 0 {
            self.dirty = true;
        }
        Ok(summary)
    }

    /// Write the records to disk.
    pub fn save(&mut self) -> Result<()> {
        self.ensure_writable()?;
        self.store.save(&self.records)?;
        self.dirty = false;
        Ok(())
    }

    /// Rewrite legacy relationships on disk, then reload.
    ///
    /// Refused while there are unsaved changes, since reloading would drop them.
    pub fn migrate(&mut self) -> Result<MigrationReport> {
        if self.dirty {
            return Err(CliError::NotPermitted(
                "save or discard pending changes before migrating".to_string(),
            ));
        }
        let report = self.store.migrate()?;
        let (records, load_error) = load(&self.store);
        self.records = records;
        self.load_error = load_error;
        Ok(report)
    }
}

fn load(store: &JsonFileStore) -> (FamilyRecords, Option<String>) {
    match store.try_load() {
        Ok(records) => (records, None),
        Err(e) => {
            warn!(
                "Could not load family data from {}: {}; starting empty and read-only",
                store.data_dir().display(),
                e
            );
            (FamilyRecords::new(), Some(e.to_string()))
        }
    }
}
