//! Backing file access
//!
//! The collection lives in one file holding a single JSON array of objects:
//! ```text
//! [{"name":"a","age":1},{"name":"b","_id":"6f1c..."}]
//! ```
//! Every load reads the whole file and every save rewrites it in full. The
//! file handle never outlives the call that opened it.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use tracing::debug;

use crate::config::StoreConfig;
use crate::document::Record;
use crate::error::{Error, Result};

/// Read and parse the full backing file
pub fn read_collection(path: &Path) -> Result<Vec<Record>> {
    let mut content = String::new();
    File::open(path)?.read_to_string(&mut content)?;

    if content.trim().is_empty() {
        return Err(Error::EmptyFile(path.display().to_string()));
    }

    let records: Vec<Record> = serde_json::from_str(&content)?;
    debug!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Overwrite the backing file with `records`
pub fn write_collection(config: &StoreConfig, records: &[Record]) -> Result<()> {
    let file = File::create(&config.path)?;
    let mut writer = BufWriter::new(file);

    if config.pretty {
        serde_json::to_writer_pretty(&mut writer, records)?;
    } else {
        serde_json::to_writer(&mut writer, records)?;
    }
    writer.flush()?;

    if config.sync_on_save {
        writer.get_ref().sync_all()?;
    }

    debug!("Wrote {} records to {}", records.len(), config.path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn records(value: serde_json::Value) -> Vec<Record> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig::new(dir.path().join("db.json"));
        let data = records(json!([{"name": "a", "age": 1}, {"tags": ["x"]}]));

        write_collection(&config, &data).unwrap();
        assert_eq!(read_collection(&config.path).unwrap(), data);
    }

    #[test]
    fn test_write_overwrites() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig::new(dir.path().join("db.json"));

        write_collection(&config, &records(json!([{"a": 1}, {"a": 2}]))).unwrap();
        write_collection(&config, &records(json!([{"a": 3}]))).unwrap();

        let content = fs::read_to_string(&config.path).unwrap();
        assert_eq!(content, r#"[{"a":3}]"#);
    }

    #[test]
    fn test_write_pretty_and_synced() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig::new(dir.path().join("db.json"))
            .pretty(true)
            .sync_on_save(true);

        write_collection(&config, &records(json!([{"a": 1}]))).unwrap();

        let content = fs::read_to_string(&config.path).unwrap();
        assert!(content.contains('\n'));
        assert_eq!(read_collection(&config.path).unwrap().len(), 1);
    }

    #[test]
    fn test_read_missing() {
        let dir = TempDir::new().unwrap();
        let result = read_collection(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_read_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, "  \n").unwrap();

        assert!(matches!(read_collection(&path), Err(Error::EmptyFile(_))));
    }

    #[test]
    fn test_read_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, r#"[{"a": 1}"#).unwrap();

        assert!(matches!(read_collection(&path), Err(Error::Json(_))));
    }

    #[test]
    fn test_read_not_array_of_objects() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, "[1, 2]").unwrap();

        assert!(matches!(read_collection(&path), Err(Error::Json(_))));
    }

    #[test]
    fn test_write_into_missing_dir() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig::new(dir.path().join("nope").join("db.json"));

        let result = write_collection(&config, &[]);
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
