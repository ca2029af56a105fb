//! Special mission status grid.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Per-player state of one special mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MissionStatus {
    Completed,
    Attempted,
    #[default]
    Untouched,
}

impl MissionStatus {
    /// Completion wins over attempts; no activity is untouched.
    pub fn classify(completed: i64, attempted: i64) -> Self {
        if completed > 0 {
            MissionStatus::Completed
        } else if attempted > 0 {
            MissionStatus::Attempted
        } else {
            MissionStatus::Untouched
        }
    }

    /// Grid cell code: 1 completed, -1 attempted, 0 untouched.
    pub fn code(self) -> i8 {
        match self {
            MissionStatus::Completed => 1,
            MissionStatus::Attempted => -1,
            MissionStatus::Untouched => 0,
        }
    }

    pub fn from_code(code: i8) -> Option<Self> {
        match code {
            1 => Some(MissionStatus::Completed),
            -1 => Some(MissionStatus::Attempted),
            0 => Some(MissionStatus::Untouched),
            _ => None,
        }
    }

    pub const ALL: [MissionStatus; 3] = [
        MissionStatus::Completed,
        MissionStatus::Attempted,
        MissionStatus::Untouched,
    ];

    /// Cell background as RGB: green completed, red attempted, orange untouched.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            MissionStatus::Completed => (0x66, 0xbe, 0x25),
            MissionStatus::Attempted => (0xbe, 0x45, 0x25),
            MissionStatus::Untouched => (0xf5, 0x94, 0x06),
        }
    }

    /// Cell background as a `#rrggbb` string.
    pub fn color(self) -> String {
        let (r, g, b) = self.rgb();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    /// Code, name and colour of every status, in display order.
    pub fn legend() -> Vec<StatusLegend> {
        Self::ALL
            .iter()
            .map(|s| StatusLegend {
                code: s.code(),
                label: s.to_string(),
                color: s.color(),
            })
            .collect()
    }
}

/// How one status code is shown in the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusLegend {
    pub code: i8,
    pub label: String,
    pub color: String,
}

impl std::fmt::Display for MissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissionStatus::Completed => write!(f, "completed"),
            MissionStatus::Attempted => write!(f, "attempted"),
            MissionStatus::Untouched => write!(f, "untouched"),
        }
    }
}

impl Serialize for MissionStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.code())
    }
}

impl<'de> Deserialize<'de> for MissionStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = i8::deserialize(deserializer)?;
        MissionStatus::from_code(code)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid mission status: {}", code)))
    }
}

/// One player's statuses, aligned with [`StatusGrid::missions`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRow {
    pub player: String,
    pub statuses: Vec<MissionStatus>,
}

/// Players × special missions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusGrid {
    pub missions: Vec<String>,
    pub rows: Vec<StatusRow>,
}

impl StatusGrid {
    pub fn get(&self, player: &str, mission: &str) -> MissionStatus {
        let Some(idx) = self.missions.iter().position(|m| m == mission) else {
            return MissionStatus::Untouched;
        };
        self.rows
            .iter()
            .find(|r| r.player == player)
            .and_then(|r| r.statuses.get(idx).copied())
            .unwrap_or_default()
    }

    /// Count of players in each state for `mission`.
    pub fn tally(&self, mission: &str) -> (usize, usize, usize) {
        let mut counts = (0, 0, 0);
        for row in &self.rows {
            match self.get(&row.player, mission) {
                MissionStatus::Completed => counts.0 += 1,
                MissionStatus::Attempted => counts.1 += 1,
                MissionStatus::Untouched => counts.2 += 1,
            }
        }
        counts
    }
}
