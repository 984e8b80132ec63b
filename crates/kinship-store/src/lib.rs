//! Kinship Storage Layer
//!
//! Implements the `FamilyStore` trait on top of two flat JSON files, plus the
//! in-memory fact index used for question answering.
//!
//! # Architecture
//!
//! - `people_only.json` holds an array of person records
//! - `relationships_only.json` holds an array of tagged relationship records
//! - Saves go through a temp file and a rename so a failed write never
//!   truncates existing data
//! - `load` never fails: missing or malformed files yield empty records
//! - `save` refuses to overwrite files it cannot read, and writes entries
//!   with non-numeric ids back untouched
//!
//! # Examples
//!
//! ```no_run
//! use kinship_store::JsonFileStore;
//! use kinship_domain::traits::FamilyStore;
//!
//! let store = JsonFileStore::new("data");
//! let records = store.load();
//! store.save(&records).unwrap();
//! ```

#![warn(missing_docs)]

pub mod embedding;
pub mod fact_index;
pub mod migration;
pub mod records;

use kinship_domain::traits::FamilyStore;
use kinship_domain::{FamilyRecords, Person, Relationship};
use records::{PersonRecord, RelationshipRecord};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

pub use fact_index::FactIndex;
pub use migration::MigrationReport;

/// File holding the people array
pub const PEOPLE_FILE: &str = "people_only.json";

/// File holding the relationships array
pub const RELATIONSHIPS_FILE: &str = "relationships_only.json";

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Structurally valid JSON with unusable content
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Existing files could not be read, so saving would lose them
    #[error("Refusing to overwrite {0}: {1}")]
    Unreadable(PathBuf, String),
}

/// Contents of both files, split by whether `FamilyRecords` can hold them
#[derive(Debug, Default)]
struct OnDisk {
    records: FamilyRecords,
    retained_people: Vec<PersonRecord>,
    retained_relationships: Vec<RelationshipRecord>,
}

/// Flat-file implementation of `FamilyStore`
///
/// Both files live in one data directory. No locking is done; a single
/// process is expected to own the directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `data_dir`
    ///
    /// The directory is created lazily on first save.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Directory holding the data files
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the people file
    pub fn people_path(&self) -> PathBuf {
        self.data_dir.join(PEOPLE_FILE)
    }

    /// Path of the relationships file
    pub fn relationships_path(&self) -> PathBuf {
        self.data_dir.join(RELATIONSHIPS_FILE)
    }

    /// Load records, reporting any problem instead of falling back
    ///
    /// A missing file means an empty collection. Entries with non-numeric
    /// ids are left out of the result; nothing in memory can reference them,
    /// but [`FamilyStore::save`] keeps them on disk.
    pub fn try_load(&self) -> Result<FamilyRecords, StoreError> {
        let on_disk = self.read_files()?;
        info!(
            "Loaded {} people and {} relationships from {}",
            on_disk.records.people.len(),
            on_disk.records.relationships.len(),
            self.data_dir.display()
        );
        Ok(on_disk.records)
    }

    /// Load only the people file; missing means empty
    pub fn try_load_people(&self) -> Result<Vec<Person>, StoreError> {
        Ok(self.read_people()?.0)
    }

    fn read_people(&self) -> Result<(Vec<Person>, Vec<PersonRecord>), StoreError> {
        let people_path = self.people_path();
        if !people_path.exists() {
            debug!("No people file at {}", people_path.display());
            return Ok((Vec::new(), Vec::new()));
        }

        let people_records: Vec<PersonRecord> = read_json(&people_path)?;
        let mut people = Vec::with_capacity(people_records.len());
        let mut retained = Vec::new();
        for record in people_records {
            match record.to_person() {
                Ok(person) => people.push(person),
                Err(e) => {
                    warn!("Keeping person '{}' on disk only: {}", record.firstname, e);
                    retained.push(record);
                }
            }
        }
        Ok((people, retained))
    }

    fn read_relationships(
        &self,
    ) -> Result<(Vec<Relationship>, Vec<RelationshipRecord>), StoreError> {
        let relationships_path = self.relationships_path();
        if !relationships_path.exists() {
            debug!("No relationships file at {}", relationships_path.display());
            return Ok((Vec::new(), Vec::new()));
        }

        let raw: Vec<serde_json::Value> = read_json(&relationships_path)?;
        parse_relationships(raw)
    }

    fn read_files(&self) -> Result<OnDisk, StoreError> {
        let (people, retained_people) = self.read_people()?;
        let (relationships, retained_relationships) = self.read_relationships()?;
        Ok(OnDisk {
            records: FamilyRecords::from_parts(people, relationships),
            retained_people,
            retained_relationships,
        })
    }

    /// Convert legacy name-keyed relationships to the canonical shape in place
    pub fn migrate(&self) -> Result<MigrationReport, StoreError> {
        migration::migrate_store(self)
    }

    fn write_people(&self, people: &[Person], retained: &[PersonRecord]) -> Result<(), StoreError> {
        let records: Vec<PersonRecord> = people
            .iter()
            .map(PersonRecord::from)
            .chain(retained.iter().cloned())
            .collect();
        write_json_atomic(&self.people_path(), &records)
    }

    pub(crate) fn write_relationships(
        &self,
        relationships: &[Relationship],
        retained: &[RelationshipRecord],
    ) -> Result<(), StoreError> {
        let records: Vec<RelationshipRecord> = relationships
            .iter()
            .map(RelationshipRecord::from)
            .chain(retained.iter().cloned())
            .collect();
        write_json_atomic(&self.relationships_path(), &records)
    }
}

impl FamilyStore for JsonFileStore {
    type Error = StoreError;

    fn load(&self) -> FamilyRecords {
        self.try_load().unwrap_or_else(|e| {
            warn!(
                "Could not load family data from {}: {}; starting empty",
                self.data_dir.display(),
                e
            );
            FamilyRecords::new()
        })
    }

    /// Overwrite both files with `records`
    ///
    /// Entries already on disk with non-numeric ids are appended unchanged.
    /// Nothing is written when either existing file cannot be read.
    fn save(&self, records: &FamilyRecords) -> Result<(), Self::Error> {
        let on_disk = self
            .read_files()
            .map_err(|e| StoreError::Unreadable(self.data_dir.clone(), e.to_string()))?;

        fs::create_dir_all(&self.data_dir)?;
        self.write_people(&records.people, &on_disk.retained_people)?;
        self.write_relationships(&records.relationships, &on_disk.retained_relationships)?;
        info!(
            "Saved {} people and {} relationships to {} ({} kept as-is)",
            records.people.len(),
            records.relationships.len(),
            self.data_dir.display(),
            on_disk.retained_people.len() + on_disk.retained_relationships.len()
        );
        Ok(())
    }
}

/// Split canonical records by whether their ids parse
///
/// Legacy or malformed entries fail the whole file.
fn parse_relationships(
    raw: Vec<serde_json::Value>,
) -> Result<(Vec<Relationship>, Vec<RelationshipRecord>), StoreError> {
    let mut relationships = Vec::with_capacity(raw.len());
    let mut retained = Vec::new();
    for (idx, value) in raw.into_iter().enumerate() {
        let record: RelationshipRecord = match serde_json::from_value(value.clone()) {
            Ok(record) => record,
            Err(e) => {
                if serde_json::from_value::<records::LegacyRelationshipRecord>(value).is_ok() {
                    return Err(StoreError::InvalidData(format!(
                        "relationship {} uses the old name-keyed format; run `kinship migrate`",
                        idx
                    )));
                }
                return Err(StoreError::Json(e));
            }
        };
        match record.to_relationship() {
            Ok(rel) => relationships.push(rel),
            Err(e) => {
                warn!("Keeping relationship {} on disk only: {}", idx, e);
                retained.push(record);
            }
        }
    }
    Ok((relationships, retained))
}

pub(crate) fn read_json<T>(path: &Path) -> Result<T, StoreError>
where
    T: serde::de::DeserializeOwned,
{
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Write `value` next to `path` and rename it into place
fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let temp_path = path.with_extension("json.tmp");
    {
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    fs::rename(&temp_path, path)?;
    Ok(())
}
