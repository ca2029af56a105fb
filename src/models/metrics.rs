//! Metric labels and phase ranges.

use serde::{Deserialize, Serialize};

pub const TOTAL_TERRITORY_POINTS: &str = "Total Territory Points";
pub const TOTAL_MISSION_ATTEMPTS: &str = "Total Mission Attempts";
pub const TOTAL_WAVES_COMPLETED: &str = "Total Waves Completed";
pub const TOTAL_PLATOONS_DONATED: &str = "Total Platoons Donated";
pub const TOTAL_SPECIAL_MISSION_ATTEMPTS: &str = "Total Special Mission Attempts";
pub const TOTAL_SPECIAL_MISSIONS_COMPLETED: &str = "Total Special Missions Completed";

/// The six guild totals shown in the summary, in display order.
pub const SUMMARY_TOTALS: [&str; 6] = [
    TOTAL_TERRITORY_POINTS,
    TOTAL_MISSION_ATTEMPTS,
    TOTAL_WAVES_COMPLETED,
    TOTAL_PLATOONS_DONATED,
    TOTAL_SPECIAL_MISSION_ATTEMPTS,
    TOTAL_SPECIAL_MISSIONS_COMPLETED,
];

/// Synthetic player standing for the mean of all real players.
pub const GUILD_AVERAGE: &str = "Guild Average";

/// Stat identifier prefix for special mission completions.
pub const MISSION_COMPLETE_PREFIX: &str = "covert_complete_mission";

/// Stat identifier prefix for special mission round attempts.
pub const MISSION_ATTEMPT_PREFIX: &str = "covert_round_attempted_mission";

/// Inclusive range of event phases summed into the derived totals.
///
/// `first > last` is an empty range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseRange {
    pub first: u32,
    pub last: u32,
}

impl Default for PhaseRange {
    fn default() -> Self {
        Self { first: 3, last: 6 }
    }
}

impl PhaseRange {
    pub fn new(first: u32, last: u32) -> Self {
        Self { first, last }
    }

    pub fn phases(&self) -> impl Iterator<Item = u32> {
        self.first..=self.last
    }

    pub fn is_empty(&self) -> bool {
        self.first > self.last
    }

    /// Per-phase mission attempt column names.
    pub fn attempt_sources(&self) -> Vec<String> {
        self.phases()
            .map(|p| format!("Mission Attempt Round {}", p))
            .collect()
    }

    /// Per-phase completed wave column names.
    pub fn wave_sources(&self) -> Vec<String> {
        self.phases()
            .map(|p| format!("Waves Completed Round {}", p))
            .collect()
    }

    pub fn attempts_column(&self) -> String {
        format!("Total Attempts P{}-P{}", self.first, self.last)
    }

    pub fn waves_column(&self) -> String {
        format!("Total Completed Waves P{}-P{}", self.first, self.last)
    }

    /// The six totals followed by the two phase-range columns.
    pub fn summary_columns(&self) -> Vec<String> {
        SUMMARY_TOTALS
            .iter()
            .map(|s| s.to_string())
            .chain([self.attempts_column(), self.waves_column()])
            .collect()
    }
}
