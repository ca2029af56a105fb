//! Territory Battle snapshot documents.
//!
//! A snapshot is one dated export of the guild's event state. The document
//! layout mirrors the game API export: `member`, `currentStat` and
//! `conflictZoneStatus` at the top level. Unknown keys are ignored.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// A guild member as listed in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub player_id: String,
    pub player_name: String,
}

/// One member's score for a stat group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStat {
    pub member_id: String,
    #[serde(deserialize_with = "deserialize_score")]
    pub score: i64,
}

/// All member scores for a single stat identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatGroup {
    pub map_stat_id: String,
    #[serde(default)]
    pub player_stat: Vec<PlayerStat>,
}

/// Score recorded against a conflict zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneStatus {
    pub zone_id: String,
    #[serde(default, deserialize_with = "deserialize_score")]
    pub score: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictZone {
    pub zone_status: ZoneStatus,
}

/// Parsed body of a snapshot file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDocument {
    #[serde(default)]
    pub member: Vec<Member>,

    #[serde(default)]
    pub current_stat: Vec<StatGroup>,

    #[serde(default)]
    pub conflict_zone_status: Vec<ConflictZone>,
}

impl SnapshotDocument {
    /// Map player id to display name using this document's member list.
    pub fn member_names(&self) -> HashMap<&str, &str> {
        self.member
            .iter()
            .map(|m| (m.player_id.as_str(), m.player_name.as_str()))
            .collect()
    }

    /// Whether the document carries any per-player stat records.
    pub fn has_stats(&self) -> bool {
        self.current_stat.iter().any(|g| !g.player_stat.is_empty())
    }
}

/// A snapshot file loaded from disk, identified by the date in its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub date: NaiveDate,
    pub path: PathBuf,
    pub document: SnapshotDocument,
}

impl Snapshot {
    pub fn new(date: NaiveDate, path: PathBuf, document: SnapshotDocument) -> Self {
        Self {
            date,
            path,
            document,
        }
    }

    /// File name component of the source path.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Scores arrive as integers, floats or decimal strings depending on the
/// exporter. Floats truncate toward zero.
fn deserialize_score<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawScore {
        Int(i64),
        Float(f64),
        Text(String),
    }

    match RawScore::deserialize(deserializer)? {
        RawScore::Int(v) => Ok(v),
        RawScore::Float(v) if v.is_finite() => Ok(v.trunc() as i64),
        RawScore::Float(v) => Err(serde::de::Error::custom(format!(
            "score is not a finite number: {}",
            v
        ))),
        RawScore::Text(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .or_else(|_| {
                    trimmed
                        .parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite())
                        .map(|f| f.trunc() as i64)
                        .ok_or(())
                })
                .map_err(|_| serde::de::Error::custom(format!("invalid score: {:?}", s)))
        }
    }
}
