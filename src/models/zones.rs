//! Conflict zone definitions and progress.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Star thresholds for one planet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneDefinition {
    #[serde(rename = "Alignment")]
    pub alignment: String,

    #[serde(rename = "1-star")]
    pub one_star: i64,

    #[serde(rename = "2-star")]
    pub two_star: i64,

    #[serde(rename = "3-star")]
    pub three_star: i64,
}

impl ZoneDefinition {
    pub fn thresholds(&self) -> [i64; 3] {
        [self.one_star, self.two_star, self.three_star]
    }

    /// Number of star thresholds reached by `score`.
    pub fn stars_for(&self, score: i64) -> u8 {
        self.thresholds().iter().filter(|&&t| score >= t).count() as u8
    }

    /// Smallest threshold still above `score`.
    pub fn next_threshold(&self, score: i64) -> Option<i64> {
        self.thresholds().into_iter().filter(|&t| t > score).min()
    }
}

/// Planet label to zone definition. Read-only once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneDefinitions {
    zones: BTreeMap<String, ZoneDefinition>,
}

impl ZoneDefinitions {
    pub fn new(zones: BTreeMap<String, ZoneDefinition>) -> Self {
        Self { zones }
    }

    pub fn get(&self, label: &str) -> Option<&ZoneDefinition> {
        self.zones.get(label)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

/// Progress of one conflict zone in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneProgress {
    pub zone_id: String,
    pub label: String,
    pub alignment: Option<String>,
    pub score: i64,
    pub stars: u8,
    pub next_threshold: Option<i64>,
}
