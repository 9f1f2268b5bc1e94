use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::Path;

use sqlx::PgPool;

use crate::{
    error::{AppError, AppResult},
    models::{ClusterId, GameRecord, GameRow},
    services::formatting::display_name,
};

/// Immutable, in-memory reference table of clustered games
///
/// Built once at startup and shared read-only behind an `Arc`; nothing mutates
/// it afterwards, so concurrent lookups need no locking.
#[derive(Debug, Clone, Default)]
pub struct GameTable {
    games: Vec<GameRecord>,
}

impl GameTable {
    pub fn from_records(games: Vec<GameRecord>) -> Self {
        Self { games }
    }

    /// Loads the table from a JSON array keyed by the exported column headers
    pub fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Cannot read game table {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> AppResult<Self> {
        let games: Vec<GameRecord> = serde_json::from_str(raw)
            .map_err(|e| AppError::Config(format!("Malformed game table: {}", e)))?;
        Ok(Self::from_records(games))
    }

    /// Loads the table from the `board_games` relation
    pub async fn load_from_db(pool: &PgPool) -> AppResult<Self> {
        let rows = sqlx::query_as::<_, GameRow>(
            r#"
            SELECT name, cluster, custom_rating, min_age, play_time, max_players, complexity_average
            FROM board_games
            ORDER BY id
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(Self::from_records(rows.into_iter().map(GameRecord::from).collect()))
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Case-insensitive lookup. Duplicate names resolve to the first row.
    pub fn find(&self, name: &str) -> Option<&GameRecord> {
        let needle = name.to_lowercase();
        self.games.iter().find(|g| g.name.to_lowercase() == needle)
    }

    /// Every row of a cluster, best rated first. Equal ratings keep table order.
    pub fn cluster_members(&self, cluster: ClusterId) -> Vec<&GameRecord> {
        let mut members: Vec<&GameRecord> =
            self.games.iter().filter(|g| g.cluster == cluster).collect();
        sort_by_rating(&mut members);
        members
    }

    /// Display names containing `query` (case-insensitive), best rated first
    pub fn search(&self, query: &str, limit: usize) -> Vec<String> {
        let needle = query.trim().to_lowercase();
        let mut matches: Vec<&GameRecord> = self
            .games
            .iter()
            .filter(|g| g.name.to_lowercase().contains(&needle))
            .collect();
        sort_by_rating(&mut matches);

        let mut seen = HashSet::new();
        matches
            .into_iter()
            .filter(|g| seen.insert(g.name.to_lowercase()))
            .take(limit)
            .map(|g| display_name(&g.name))
            .collect()
    }
}

/// Stable sort on quality score, descending. Unrated (NaN) rows go last.
pub(crate) fn sort_by_rating(games: &mut [&GameRecord]) {
    games.sort_by(|a, b| match (a.rating.is_nan(), b.rating.is_nan()) {
        (false, false) => b.rating.total_cmp(&a.rating),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (true, true) => Ordering::Equal,
    });
}
