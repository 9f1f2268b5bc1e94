use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::models::{FilterCriteria, GameRecord};

/// Parses a user-entered decimal. Blank or non-numeric text means "no constraint".
pub fn parse_optional_decimal(raw: Option<&str>) -> Option<f64> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Serde adapter for form fields that may arrive as a number, a string, or not at all
pub fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()),
        Some(Value::String(s)) => parse_optional_decimal(Some(&s)),
        _ => None,
    })
}

impl FilterCriteria {
    /// True when no dimension is constrained
    pub fn is_unconstrained(&self) -> bool {
        self.max_age.is_none()
            && self.max_play_time.is_none()
            && self.min_player_count.is_none()
            && self.max_complexity.is_none()
    }

    /// Whether a game satisfies every supplied constraint
    pub fn matches(&self, game: &GameRecord) -> bool {
        self.max_age.map_or(true, |max| game.min_age <= max)
            && self.max_play_time.map_or(true, |max| game.play_time <= max)
            && self.min_player_count.map_or(true, |min| game.max_players >= min)
            && self.max_complexity.map_or(true, |max| game.complexity <= max)
    }

    /// Keeps the games that satisfy every supplied constraint, preserving order
    pub fn apply<'a>(&self, pool: Vec<&'a GameRecord>) -> Vec<&'a GameRecord> {
        if self.is_unconstrained() {
            return pool;
        }
        pool.into_iter().filter(|game| self.matches(game)).collect()
    }
}
