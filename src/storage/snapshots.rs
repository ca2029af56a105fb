//! Dated snapshot files.
//!
//! Snapshots live in one directory as `<prefix>_DDMMYY.<ext>`. Files whose
//! name does not carry a valid date are ignored; files that carry one but
//! fail to parse are an error for the whole listing.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use chrono::NaiveDate;
use regex::Regex;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use super::StorageError;
use crate::models::{Snapshot, SnapshotDocument};

/// Discovers and loads the dated snapshot files of one directory.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
    prefix: String,
    extension: String,
    date_pattern: Regex,
}

impl SnapshotStore {
    pub fn new(dir: PathBuf, prefix: &str, extension: &str) -> Result<Self, StorageError> {
        if prefix.is_empty() || extension.is_empty() {
            return Err(StorageError::InvalidPath(
                "snapshot prefix and extension must not be empty".to_string(),
            ));
        }

        let date_pattern = Regex::new(&format!(r"{}_(\d{{6}})", regex::escape(prefix)))
            .map_err(|e| StorageError::InvalidPath(e.to_string()))?;

        Ok(Self {
            dir,
            prefix: prefix.to_string(),
            extension: extension.trim_start_matches('.').to_string(),
            date_pattern,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Date encoded in a snapshot file name (`DDMMYY`), if any.
    pub fn snapshot_date(&self, path: &Path) -> Option<NaiveDate> {
        let name = path.file_name()?.to_str()?;
        let caps = self.date_pattern.captures(name)?;
        NaiveDate::parse_from_str(&caps[1], "%d%m%y").ok()
    }

    fn glob_pattern(&self) -> String {
        format!(
            "{}/{}_*.{}",
            glob::Pattern::escape(&self.dir.to_string_lossy()),
            glob::Pattern::escape(&self.prefix),
            glob::Pattern::escape(&self.extension)
        )
    }

    /// Dated snapshot paths, ascending by date, one per date.
    pub fn dated_paths(&self) -> Result<Vec<(NaiveDate, PathBuf)>, StorageError> {
        let paths = glob::glob(&self.glob_pattern())
            .map_err(|e| StorageError::InvalidPath(e.to_string()))?;

        let mut dated = Vec::new();
        for entry in paths {
            let path = entry.map_err(|e| e.into_error())?;
            match self.snapshot_date(&path) {
                Some(date) => dated.push((date, path)),
                None => debug!("Skipping {:?}: no date in file name", path),
            }
        }

        dated.sort();
        let mut unique: Vec<(NaiveDate, PathBuf)> = Vec::with_capacity(dated.len());
        for (date, path) in dated {
            if let Some((last_date, kept)) = unique.last() {
                if *last_date == date {
                    warn!("Skipping {:?}: date {} already loaded from {:?}", path, date, kept);
                    continue;
                }
            }
            unique.push((date, path));
        }

        Ok(unique)
    }

    /// Load every dated snapshot, ascending by date.
    pub fn list_snapshots(&self) -> Result<Vec<Snapshot>, StorageError> {
        let snapshots = self
            .dated_paths()?
            .into_iter()
            .map(|(date, path)| load_snapshot(date, path))
            .collect::<Result<Vec<_>, _>>()?;

        info!("Loaded {} snapshots from {:?}", snapshots.len(), self.dir);
        Ok(snapshots)
    }

    /// Fingerprint of the snapshot set: names, sizes and modification times.
    pub fn signature(&self) -> Result<String, StorageError> {
        let mut hasher = Sha256::new();
        for (_, path) in self.dated_paths()? {
            let meta = fs::metadata(&path)?;
            let modified = meta
                .modified()
                .ok()
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .map(|d| d.as_nanos())
                .unwrap_or(0);

            hasher.update(path.to_string_lossy().as_bytes());
            hasher.update(b"|");
            hasher.update(meta.len().to_le_bytes());
            hasher.update(modified.to_le_bytes());
            hasher.update(b"\n");
        }
        Ok(hex::encode(hasher.finalize()))
    }

    /// Path of the most recent snapshot.
    pub fn latest_path(&self) -> Result<Option<PathBuf>, StorageError> {
        Ok(self.dated_paths()?.pop().map(|(_, path)| path))
    }

    /// Raw text of the most recent snapshot.
    pub fn read_latest_raw(&self) -> Result<(PathBuf, String), StorageError> {
        let path = self
            .latest_path()?
            .ok_or_else(|| StorageError::PathNotFound(self.dir.clone()))?;
        let contents = fs::read_to_string(&path)?;
        Ok((path, contents))
    }

    /// Overwrite the most recent snapshot with `contents`.
    ///
    /// The text must parse as a snapshot document; otherwise nothing is
    /// written. The new contents go to a sibling temp file that is renamed
    /// over the target.
    pub fn replace_latest(&self, contents: &str) -> Result<PathBuf, StorageError> {
        let path = self
            .latest_path()?
            .ok_or_else(|| StorageError::PathNotFound(self.dir.clone()))?;

        serde_json::from_str::<SnapshotDocument>(contents).map_err(|e| {
            StorageError::InvalidSnapshot {
                path: path.clone(),
                reason: e.to_string(),
            }
        })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| StorageError::InvalidPath(path.display().to_string()))?;
        let tmp = path.with_file_name(format!(".{}.tmp", file_name));

        fs::write(&tmp, contents)?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        info!("Replaced snapshot {:?} ({} bytes)", path, contents.len());
        Ok(path)
    }
}

/// Parse one snapshot file.
pub fn load_snapshot(date: NaiveDate, path: PathBuf) -> Result<Snapshot, StorageError> {
    let contents = fs::read_to_string(&path)?;
    let document: SnapshotDocument =
        serde_json::from_str(&contents).map_err(|e| StorageError::InvalidSnapshot {
            path: path.clone(),
            reason: e.to_string(),
        })?;

    debug!(
        "Parsed {:?}: {} members, {} stat groups",
        path,
        document.member.len(),
        document.current_stat.len()
    );
    Ok(Snapshot::new(date, path, document))
}
