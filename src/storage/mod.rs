//! Filesystem operations.
//!
//! Handles everything that touches disk:
//! - Dated snapshot discovery, loading and the latest-snapshot edit path
//! - Name and zone mapping files
//! - CSV export of the summary and status tables
//! - The signature-keyed snapshot cache

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{NameMap, ZoneDefinitions};

mod cache;
mod export;
mod snapshots;

pub use cache::*;
pub use export::*;
pub use snapshots::*;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid snapshot {path}: {reason}")]
    InvalidSnapshot { path: PathBuf, reason: String },

    #[error("Invalid CSV: {0}")]
    InvalidCsv(String),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

/// Load a JSON mapping file, or the empty mapping when it does not exist.
fn load_mapping<T>(path: &Path, what: &str) -> Result<T, StorageError>
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        warn!("{} file {:?} not found, using empty mapping", what, path);
        return Ok(T::default());
    }

    let contents = std::fs::read_to_string(path)?;
    let mapping = serde_json::from_str(&contents)?;
    info!("Loaded {} from {:?}", what, path);
    Ok(mapping)
}

/// Load the stat/zone identifier label file.
pub fn load_name_map(path: &Path) -> Result<NameMap, StorageError> {
    load_mapping(path, "Stat name")
}

/// Load the planet zone definition file.
pub fn load_zone_definitions(path: &Path) -> Result<ZoneDefinitions, StorageError> {
    load_mapping(path, "Zone definition")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_name_file_is_empty_map() {
        let tmp = tempfile::tempdir().unwrap();
        let names = load_name_map(&tmp.path().join("map_stat_names.json")).unwrap();

        assert!(names.is_empty());
        assert_eq!(names.resolve("pts"), "pts");
    }

    #[test]
    fn test_load_name_map() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("map_stat_names.json");
        std::fs::write(&path, r#"{"pts": "Total Territory Points"}"#).unwrap();

        let names = load_name_map(&path).unwrap();
        assert_eq!(names.resolve("pts"), "Total Territory Points");
    }

    #[test]
    fn test_malformed_name_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("map_stat_names.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(load_name_map(&path), Err(StorageError::Json(_))));
    }

    #[test]
    fn test_load_zone_definitions() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("zone_definitions.json");
        std::fs::write(
            &path,
            r#"{"Mustafar": {"Alignment": "Dark Side", "1-star": 1, "2-star": 2, "3-star": 3}}"#,
        )
        .unwrap();

        let zones = load_zone_definitions(&path).unwrap();
        assert_eq!(zones.len(), 1);

        let missing = load_zone_definitions(&tmp.path().join("nope.json")).unwrap();
        assert!(missing.is_empty());
    }
}
