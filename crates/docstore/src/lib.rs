//! # docstore
//!
//! Embedded document store keeping a collection of JSON records in a single
//! file, with Mongo-style find/insert/update/delete operations.
//!
//! ## Behavior
//! - Read-through: every operation reloads the backing file first
//! - Write-through: mutations rewrite the whole file, except `update_many`
//! - Single-field equality queries only
//! - Malformed arguments are logged and ignored; save failures are returned
//!
//! ```no_run
//! use docstore::DocumentStore;
//! use serde_json::json;
//!
//! let store = DocumentStore::open("people.json");
//! store.insert_one(json!({"name": "alice", "age": 30}))?;
//! store.update_one("{'name': 'alice'}", "{'$set': {'age': 31}}", false)?;
//! let alice = store.find_one(json!({"name": "alice"}));
//! # Ok::<(), docstore::Error>(())
//! ```

#![warn(missing_docs)]

mod config;
mod document;
mod error;
mod parser;
mod storage;
mod store;

pub use config::{StoreConfig, DEFAULT_ID_FIELD};
pub use document::{Command, Input, Query, Record, UpdateSpec};
pub use error::{DeleteOutcome, Error, LoadOutcome, Result, UpdateOutcome};
pub use store::DocumentStore;
