//! Store configuration

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default field name used for generated identifiers
pub const DEFAULT_ID_FIELD: &str = "_id";

/// Configuration for a [`DocumentStore`](crate::DocumentStore)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the backing JSON file
    pub path: PathBuf,

    /// Field that `insert_many` fills with a fresh UUID
    pub id_field: String,

    /// Write the backing file with indentation
    pub pretty: bool,

    /// Call `sync_all` after every save
    pub sync_on_save: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            path: PathBuf::from("./docstore.json"),
            id_field: DEFAULT_ID_FIELD.to_string(),
            pretty: false,
            sync_on_save: false,
        }
    }
}

impl StoreConfig {
    /// Default configuration pointing at `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        StoreConfig {
            path: path.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Read a configuration from a JSON file. Missing keys take their
    /// default values.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Set the identifier field name
    pub fn id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = field.into();
        self
    }

    /// Toggle pretty-printed output
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Toggle fsync after each save
    pub fn sync_on_save(mut self, sync: bool) -> Self {
        self.sync_on_save = sync;
        self
    }
}
