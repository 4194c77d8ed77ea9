//! DocumentStore: CRUD over a file-backed collection
//!
//! Every operation reloads the collection from disk before it looks at it.
//! Mutating operations rewrite the whole file afterwards, except
//! `update_many`, whose changes stay in memory until the next reload
//! discards them.

use std::path::Path;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::document::{
    record_from_input, records_from_input, Command, Input, Query, Record, UpdateSpec,
};
use crate::error::{DeleteOutcome, LoadOutcome, Result, UpdateOutcome};
use crate::storage::{read_collection, write_collection};

/// DocumentStore is the main store handle
#[derive(Debug)]
pub struct DocumentStore {
    /// Backing file and output options
    config: StoreConfig,

    /// In-memory mirror of the backing file
    collection: Mutex<Vec<Record>>,
}

impl DocumentStore {
    /// Open a store backed by the JSON file at `path`
    ///
    /// A missing or unreadable file is not an error: the store starts empty
    /// and the file is created by the first save.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::with_config(StoreConfig::new(path))
    }

    /// Open a store with explicit configuration
    pub fn with_config(config: StoreConfig) -> Self {
        let store = DocumentStore {
            config,
            collection: Mutex::new(Vec::new()),
        };
        store.refresh();
        store
    }

    /// Reload the collection from the backing file
    ///
    /// On any failure the previous in-memory collection is kept.
    pub fn refresh(&self) -> LoadOutcome {
        let mut collection = self.collection.lock();
        self.reload(&mut collection)
    }

    /// Write the in-memory collection to the backing file
    pub fn save(&self) -> Result<()> {
        let collection = self.collection.lock();
        write_collection(&self.config, &collection)
    }

    /// First record whose field equals the query value
    pub fn find_one(&self, query: impl Into<Input>) -> Option<Record> {
        let mut collection = self.collection.lock();
        self.reload(&mut collection);

        let query = accept("query", Query::from_input(query.into()))?;
        collection.iter().find(|record| query.matches(record)).cloned()
    }

    /// All records whose field equals the query value, in collection order
    pub fn find_many(&self, query: impl Into<Input>) -> Vec<Record> {
        let mut collection = self.collection.lock();
        self.reload(&mut collection);

        match accept("query", Query::from_input(query.into())) {
            Some(query) => collection
                .iter()
                .filter(|record| query.matches(record))
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    /// Append one record as given and save
    ///
    /// No identifier field is added. Returns `false` when the input was
    /// empty or malformed and nothing was written.
    pub fn insert_one(&self, record: impl Into<Input>) -> Result<bool> {
        let mut collection = self.collection.lock();
        self.insert_locked(&mut collection, record.into())
    }

    /// Append several records, each tagged with a fresh UUID under the
    /// configured id field, and save once
    ///
    /// Returns the generated identifiers in insertion order.
    pub fn insert_many(&self, records: impl Into<Input>) -> Result<Vec<String>> {
        let mut collection = self.collection.lock();
        self.reload(&mut collection);

        let records = match accept("records", records_from_input(records.into())) {
            Some(records) => records,
            None => return Ok(Vec::new()),
        };

        let mut ids = Vec::with_capacity(records.len());
        for mut record in records {
            let id = Uuid::new_v4().to_string();
            record.insert(self.config.id_field.clone(), Value::String(id.clone()));
            collection.push(record);
            ids.push(id);
        }

        write_collection(&self.config, &collection)?;
        Ok(ids)
    }

    /// Apply an update to the first matching record
    ///
    /// The target field must already exist on the record; `$set` is the only
    /// command that changes anything. When nothing is modified and `upsert`
    /// is set, the update's field/value pair alone is inserted as a new
    /// record.
    pub fn update_one(
        &self,
        query: impl Into<Input>,
        update: impl Into<Input>,
        upsert: bool,
    ) -> Result<UpdateOutcome> {
        let mut collection = self.collection.lock();
        self.reload(&mut collection);

        let query = accept("query", Query::from_input(query.into()));
        let update = accept("update", UpdateSpec::from_input(update.into()));
        let (query, update) = match (query, update) {
            (Some(query), Some(update)) => (query, update),
            _ => return Ok(UpdateOutcome::Unchanged),
        };

        let target = collection
            .iter()
            .position(|record| query.matches(record))
            .filter(|&idx| collection[idx].contains_key(&update.field));

        match target {
            Some(idx) => match update.command {
                Command::Set => {
                    collection[idx].insert(update.field, update.value);
                    write_collection(&self.config, &collection)?;
                    Ok(UpdateOutcome::Modified(1))
                }
                Command::Push | Command::Other(_) => {
                    debug!("Update command {:?} is not applied", update.command.name());
                    Ok(UpdateOutcome::Unchanged)
                }
            },
            None if upsert => {
                if self.insert_locked(&mut collection, Input::from(update.to_record()))? {
                    Ok(UpdateOutcome::Upserted)
                } else {
                    Ok(UpdateOutcome::Unchanged)
                }
            }
            None => Ok(UpdateOutcome::Unchanged),
        }
    }

    /// Apply an update to every matching record that already has the field
    ///
    /// Changes are made to the in-memory collection only and are not saved;
    /// the next operation's reload replaces them with the file contents.
    /// `upsert` is accepted for symmetry with `update_one` and never used.
    /// Nothing is written, so there is no error to report.
    pub fn update_many(
        &self,
        query: impl Into<Input>,
        update: impl Into<Input>,
        _upsert: bool,
    ) -> UpdateOutcome {
        let mut collection = self.collection.lock();
        self.reload(&mut collection);

        let query = accept("query", Query::from_input(query.into()));
        let update = accept("update", UpdateSpec::from_input(update.into()));
        let (query, update) = match (query, update) {
            (Some(query), Some(update)) => (query, update),
            _ => return UpdateOutcome::Unchanged,
        };

        if update.command != Command::Set {
            debug!("Update command {:?} is not applied", update.command.name());
            return UpdateOutcome::Unchanged;
        }

        let mut modified = 0;
        for record in collection.iter_mut().filter(|record| query.matches(record)) {
            if let Some(slot) = record.get_mut(&update.field) {
                *slot = update.value.clone();
                modified += 1;
            }
        }

        if modified == 0 {
            return UpdateOutcome::Unchanged;
        }
        debug!("update_many changed {} records in memory without saving", modified);
        UpdateOutcome::Modified(modified)
    }

    /// Remove the first matching record and save
    pub fn delete_one(&self, query: impl Into<Input>) -> DeleteOutcome {
        self.delete(query.into(), false)
    }

    /// Remove every matching record and save
    pub fn delete_many(&self, query: impl Into<Input>) -> DeleteOutcome {
        self.delete(query.into(), true)
    }

    /// Snapshot of the in-memory collection, without reloading
    pub fn records(&self) -> Vec<Record> {
        self.collection.lock().clone()
    }

    /// Number of records currently held in memory
    pub fn len(&self) -> usize {
        self.collection.lock().len()
    }

    /// Check if the in-memory collection is empty
    pub fn is_empty(&self) -> bool {
        self.collection.lock().is_empty()
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Store configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn reload(&self, collection: &mut Vec<Record>) -> LoadOutcome {
        match read_collection(&self.config.path) {
            Ok(records) => {
                *collection = records;
                LoadOutcome::Loaded(collection.len())
            }
            Err(e) => {
                debug!(
                    "Keeping {} in-memory records, reload of {} failed: {}",
                    collection.len(),
                    self.config.path.display(),
                    e
                );
                LoadOutcome::Retained(e.to_string())
            }
        }
    }

    fn insert_locked(&self, collection: &mut Vec<Record>, record: Input) -> Result<bool> {
        self.reload(collection);

        match accept("record", record_from_input(record)) {
            Some(record) => {
                collection.push(record);
                write_collection(&self.config, collection)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete(&self, query: Input, all: bool) -> DeleteOutcome {
        let mut collection = self.collection.lock();
        self.reload(&mut collection);

        match self.remove_matches(&mut collection, query, all) {
            Ok(0) => DeleteOutcome::NoMatch,
            Ok(removed) => DeleteOutcome::Removed(removed),
            Err(e) => {
                error!("Delete abandoned: {}", e);
                DeleteOutcome::Failed(e)
            }
        }
    }

    fn remove_matches(
        &self,
        collection: &mut Vec<Record>,
        query: Input,
        all: bool,
    ) -> Result<usize> {
        let query = match Query::from_input(query)? {
            Some(query) => query,
            None => return Ok(0),
        };

        let removed = if all {
            let before = collection.len();
            collection.retain(|record| !query.matches(record));
            before - collection.len()
        } else {
            let first = collection.iter().position(|record| query.matches(record));
            match first {
                Some(idx) => {
                    collection.remove(idx);
                    1
                }
                None => 0,
            }
        };

        if removed > 0 {
            write_collection(&self.config, collection)?;
        }
        Ok(removed)
    }
}

/// Log a rejected argument and treat it as absent
fn accept<T>(what: &str, normalized: Result<Option<T>>) -> Option<T> {
    match normalized {
        Ok(value) => value,
        Err(e) => {
            warn!("Ignoring {}: {}", what, e);
            None
        }
    }
}
