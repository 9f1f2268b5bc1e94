use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod selection;

pub use selection::{SelectionSubmission, UserSelection};

/// Identifier of a precomputed game cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterId(pub i64);

impl Display for ClusterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of the reference table
///
/// Field names on the wire match the column headers of the exported table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Cluster")]
    pub cluster: ClusterId,
    /// Quality score, higher is better
    #[serde(rename = "Custom Rating")]
    pub rating: f64,
    #[serde(rename = "Min Age")]
    pub min_age: f64,
    /// Minutes
    #[serde(rename = "Play Time")]
    pub play_time: f64,
    #[serde(rename = "Max Players")]
    pub max_players: f64,
    #[serde(rename = "Complexity Average")]
    pub complexity: f64,
}

/// Row shape of the `board_games` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GameRow {
    pub name: String,
    pub cluster: i64,
    pub custom_rating: f64,
    pub min_age: f64,
    pub play_time: f64,
    pub max_players: f64,
    pub complexity_average: f64,
}

impl From<GameRow> for GameRecord {
    fn from(row: GameRow) -> Self {
        GameRecord {
            name: row.name,
            cluster: ClusterId(row.cluster),
            rating: row.custom_rating,
            min_age: row.min_age,
            play_time: row.play_time,
            max_players: row.max_players,
            complexity: row.complexity_average,
        }
    }
}

/// Optional numeric constraints on the candidate pool. `None` means no constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Keep games whose minimum age is at most this
    pub max_age: Option<f64>,
    /// Keep games playable within this many minutes
    pub max_play_time: Option<f64>,
    /// Keep games supporting at least this many players
    pub min_player_count: Option<f64>,
    /// Keep games no more complex than this
    pub max_complexity: Option<f64>,
}

/// Result of a recommendation call. `names` is empty whenever `message` reports a failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "recommendations")]
    pub names: Vec<String>,
    pub message: String,
}

impl Recommendation {
    pub fn empty(message: impl Into<String>) -> Self {
        Self {
            names: Vec::new(),
            message: message.into(),
        }
    }
}
