use std::collections::HashSet;
use std::fmt;

use crate::{
    models::{ClusterId, FilterCriteria, GameRecord, Recommendation},
    services::{
        catalog::{sort_by_rating, GameTable},
        formatting::display_name,
    },
};

/// Upper bound on the number of names returned
pub const MAX_RECOMMENDATIONS: usize = 20;

/// Selected names that had no row in the reference table, in selection order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MissingNames(Vec<String>);

impl MissingNames {
    pub fn push(&mut self, name: impl Into<String>) {
        self.0.push(name.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for MissingNames {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

impl fmt::Display for MissingNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for name in &self.0 {
            write!(f, "{} not found.  ", name)?;
        }
        Ok(())
    }
}

/// Ways a recommendation request can fall short
///
/// The `Display` text of each variant is the message shown to the user.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RecommendError {
    #[error("No input received")]
    EmptyInput,

    #[error("{0} not found")]
    NameNotFound(String),

    /// Non-fatal: some selections were unknown but the rest still produced
    /// recommendations. Only ever surfaces as the message of a non-empty result.
    #[error("{0}")]
    PartialNotFound(MissingNames),

    #[error("{not_found}No recommendations found based on search parameters")]
    NoMatches { not_found: MissingNames },
}

/// Recommends games from the cluster(s) the user's selections point to
///
/// A single selection draws from its own cluster. Several selections vote for
/// their clusters and every cluster tied at the highest vote count is used.
/// Candidates are filtered, the selections themselves are dropped, and the
/// best rated [`MAX_RECOMMENDATIONS`] distinct names are returned formatted for
/// display. Failures never escape: they come back as an empty list and a message.
pub fn recommend(
    table: &GameTable,
    selections: &[String],
    filters: &FilterCriteria,
) -> Recommendation {
    match try_recommend(table, selections, filters) {
        Ok(recommendation) => {
            tracing::info!(
                selections = selections.len(),
                recommended = recommendation.names.len(),
                "Recommendations generated"
            );
            recommendation
        }
        Err(e) => {
            tracing::info!(reason = %e, selections = selections.len(), "No recommendations");
            Recommendation::empty(e.to_string())
        }
    }
}

fn try_recommend(
    table: &GameTable,
    selections: &[String],
    filters: &FilterCriteria,
) -> Result<Recommendation, RecommendError> {
    let selections = dedupe(selections);

    let (pool, not_found) = match selections.as_slice() {
        [] => return Err(RecommendError::EmptyInput),
        [single] => {
            let game = table
                .find(single)
                .ok_or_else(|| RecommendError::NameNotFound(single.to_string()))?;
            (table.cluster_members(game.cluster), MissingNames::default())
        }
        many => multi_selection_pool(table, many)?,
    };

    tracing::debug!(candidates = pool.len(), "Candidate pool gathered");

    let pool = filters.apply(pool);
    let names = finalize(pool, &selections);

    if names.is_empty() {
        return Err(RecommendError::NoMatches {
            not_found: MissingNames::default(),
        });
    }

    let message = if not_found.is_empty() {
        String::new()
    } else {
        RecommendError::PartialNotFound(not_found).to_string()
    };

    Ok(Recommendation { names, message })
}

/// Exact-string dedupe, first occurrence wins
fn dedupe(selections: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    selections
        .iter()
        .map(String::as_str)
        .filter(|s| seen.insert(*s))
        .collect()
}

/// Candidate pool for two or more selections, plus the not-found notes
fn multi_selection_pool<'a>(
    table: &'a GameTable,
    selections: &[&str],
) -> Result<(Vec<&'a GameRecord>, MissingNames), RecommendError> {
    let mut votes: Vec<(ClusterId, usize)> = Vec::new();
    let mut not_found = MissingNames::default();

    for name in selections {
        match table.find(name) {
            Some(game) => match votes.iter_mut().find(|(id, _)| *id == game.cluster) {
                Some((_, count)) => *count += 1,
                None => votes.push((game.cluster, 1)),
            },
            None => {
                tracing::warn!(name = %name, "Selected game not in reference table");
                not_found.push(*name);
            }
        }
    }

    let Some(top) = votes.iter().map(|(_, count)| *count).max() else {
        return Err(RecommendError::NoMatches { not_found });
    };

    let winners: Vec<ClusterId> = votes
        .iter()
        .filter(|(_, count)| *count == top)
        .map(|(id, _)| *id)
        .collect();

    tracing::debug!(clusters = ?winners, votes = top, "Winning clusters");

    let mut pool: Vec<&GameRecord> = winners
        .into_iter()
        .flat_map(|cluster| table.cluster_members(cluster))
        .collect();
    sort_by_rating(&mut pool);

    Ok((pool, not_found))
}

/// Drops the user's own games and formats the best distinct names
fn finalize(pool: Vec<&GameRecord>, selections: &[&str]) -> Vec<String> {
    let excluded: HashSet<String> = selections.iter().map(|s| s.to_lowercase()).collect();
    let mut seen = HashSet::new();

    pool.into_iter()
        .map(|game| (game, game.name.to_lowercase()))
        .filter(|(_, key)| !excluded.contains(key))
        .filter(|(_, key)| seen.insert(key.clone()))
        .take(MAX_RECOMMENDATIONS)
        .map(|(game, _)| display_name(&game.name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_RESULTS: &str = "No recommendations found based on search parameters";

    fn game(name: &str, cluster: i64, rating: f64) -> GameRecord {
        GameRecord {
            name: name.to_string(),
            cluster: ClusterId(cluster),
            rating,
            min_age: 10.0,
            play_time: 60.0,
            max_players: 4.0,
            complexity: 2.0,
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    /// A, B, C in cluster 1 (9, 8, 7) and D, E in cluster 2 (10, 1)
    fn create_test_table() -> GameTable {
        GameTable::from_records(vec![
            game("A", 1, 9.0),
            game("B", 1, 8.0),
            game("C", 1, 7.0),
            game("D", 2, 10.0),
            game("E", 2, 1.0),
        ])
    }

    #[test]
    fn test_single_selection_uses_its_cluster() {
        let table = create_test_table();
        let result = recommend(&table, &names(&["A"]), &FilterCriteria::default());
        assert_eq!(result.names, names(&["B", "C"]));
        assert_eq!(result.message, "");
    }

    #[test]
    fn test_single_selection_lookup_is_case_insensitive() {
        let table = create_test_table();
        let result = recommend(&table, &names(&["a"]), &FilterCriteria::default());
        assert_eq!(result.names, names(&["B", "C"]));
    }

    #[test]
    fn test_tied_clusters_are_unioned() {
        let table = create_test_table();
        let result = recommend(&table, &names(&["A", "D"]), &FilterCriteria::default());
        assert_eq!(result.names, names(&["B", "C", "E"]));
    }

    #[test]
    fn test_majority_cluster_wins() {
        let table = create_test_table();
        let result = recommend(&table, &names(&["A", "B", "E"]), &FilterCriteria::default());
        assert_eq!(result.names, names(&["C"]));
    }

    #[test]
    fn test_three_way_tie_includes_all_clusters() {
        let mut records = vec![
            game("A", 1, 9.0),
            game("B", 1, 8.0),
            game("D", 2, 10.0),
            game("E", 2, 1.0),
        ];
        records.push(game("X", 3, 5.0));
        records.push(game("Y", 3, 8.5));
        let table = GameTable::from_records(records);

        let result = recommend(&table, &names(&["A", "D", "X"]), &FilterCriteria::default());
        assert_eq!(result.names, names(&["Y", "B", "E"]));
    }

    #[test]
    fn test_equal_ratings_across_clusters_follow_vote_order() {
        let table = GameTable::from_records(vec![
            game("P", 1, 5.0),
            game("Q", 2, 5.0),
            game("R", 1, 6.0),
            game("S", 2, 6.0),
        ]);

        let result = recommend(&table, &names(&["S", "R"]), &FilterCriteria::default());
        assert_eq!(result.names, names(&["Q", "P"]));
    }

    #[test]
    fn test_unknown_single_selection() {
        let table = create_test_table();
        let result = recommend(&table, &names(&["Zzz"]), &FilterCriteria::default());
        assert!(result.names.is_empty());
        assert_eq!(result.message, "Zzz not found");
    }

    #[test]
    fn test_empty_input() {
        let table = create_test_table();
        let result = recommend(&table, &[], &FilterCriteria::default());
        assert!(result.names.is_empty());
        assert_eq!(result.message, "No input received");
    }

    #[test]
    fn test_duplicates_collapse_to_single_path() {
        let table = create_test_table();
        let result = recommend(&table, &names(&["A", "A"]), &FilterCriteria::default());
        assert_eq!(result.names, names(&["B", "C"]));
    }

    #[test]
    fn test_case_variants_are_distinct_selections() {
        // "A" and "a" both vote for cluster 1
        let table = create_test_table();
        let result = recommend(&table, &names(&["A", "a", "D"]), &FilterCriteria::default());
        assert_eq!(result.names, names(&["B", "C"]));
    }

    #[test]
    fn test_partial_not_found_is_reported_alongside_results() {
        let table = create_test_table();
        let result = recommend(&table, &names(&["A", "Zzz"]), &FilterCriteria::default());
        assert_eq!(result.names, names(&["B", "C"]));
        assert_eq!(result.message, "Zzz not found.  ");
    }

    #[test]
    fn test_all_unknown_multi_selection() {
        let table = create_test_table();
        let result = recommend(&table, &names(&["Foo", "Bar"]), &FilterCriteria::default());
        assert!(result.names.is_empty());
        assert_eq!(
            result.message,
            "Foo not found.  Bar not found.  No recommendations found based on search parameters"
        );
    }

    #[test]
    fn test_exhausted_pool_drops_not_found_notes() {
        let table = GameTable::from_records(vec![game("Solo", 9, 5.0)]);
        let result = recommend(&table, &names(&["Solo", "Zzz"]), &FilterCriteria::default());
        assert!(result.names.is_empty());
        assert_eq!(result.message, NO_RESULTS);
    }

    #[test]
    fn test_filters_narrow_the_pool() {
        let mut b = game("B", 1, 8.0);
        b.play_time = 180.0;
        let table = GameTable::from_records(vec![game("A", 1, 9.0), b, game("C", 1, 7.0)]);

        let filters = FilterCriteria {
            max_play_time: Some(90.0),
            ..Default::default()
        };
        let result = recommend(&table, &names(&["A"]), &filters);
        assert_eq!(result.names, names(&["C"]));
    }

    #[test]
    fn test_unrated_games_rank_after_rated_ones() {
        let table = GameTable::from_records(vec![
            game("A", 1, 9.0),
            game("Best", 1, 8.0),
            game("Unrated", 1, f64::NAN),
        ]);
        let result = recommend(&table, &names(&["A"]), &FilterCriteria::default());
        assert_eq!(result.names, names(&["Best", "Unrated"]));
    }

    #[test]
    fn test_unrated_games_rank_last_across_tied_clusters() {
        let table = GameTable::from_records(vec![
            game("A", 1, 9.0),
            game("Lost", 1, f64::NAN),
            game("D", 2, 10.0),
            game("E", 2, 1.0),
        ]);
        let result = recommend(&table, &names(&["A", "D"]), &FilterCriteria::default());
        assert_eq!(result.names, names(&["E", "Lost"]));
    }

    #[test]
    fn test_filters_removing_everything() {
        let table = create_test_table();
        let filters = FilterCriteria {
            min_player_count: Some(10.0),
            ..Default::default()
        };
        let result = recommend(&table, &names(&["A"]), &filters);
        assert!(result.names.is_empty());
        assert_eq!(result.message, NO_RESULTS);
    }

    #[test]
    fn test_tighter_filter_yields_subset() {
        let mut records = Vec::new();
        for i in 0..10 {
            let mut g = game(&format!("G{}", i), 1, 10.0 - i as f64);
            g.complexity = 1.0 + (i % 4) as f64;
            g.min_age = 6.0 + i as f64;
            records.push(g);
        }
        let table = GameTable::from_records(records);
        let input = names(&["G0"]);

        let loose = FilterCriteria {
            max_complexity: Some(3.0),
            ..Default::default()
        };
        let tight = FilterCriteria {
            max_complexity: Some(2.0),
            max_age: Some(12.0),
            ..Default::default()
        };

        let loose_result = recommend(&table, &input, &loose).names;
        let tight_result = recommend(&table, &input, &tight).names;
        assert!(!tight_result.is_empty());
        assert!(tight_result.len() < loose_result.len());
        assert!(tight_result.iter().all(|name| loose_result.contains(name)));
    }

    #[test]
    fn test_output_is_capped() {
        let records: Vec<GameRecord> = (0..30)
            .map(|i| game(&format!("game {}", i), 1, i as f64))
            .collect();
        let table = GameTable::from_records(records);

        let result = recommend(&table, &names(&["game 0"]), &FilterCriteria::default());
        assert_eq!(result.names.len(), MAX_RECOMMENDATIONS);
        assert_eq!(result.names[0], "Game 29");
    }

    #[test]
    fn test_output_never_contains_selections() {
        let table = GameTable::from_records(vec![
            game("Azul", 1, 9.0),
            game("azul", 1, 8.0),
            game("Root", 1, 7.0),
        ]);
        let result = recommend(&table, &names(&["AZUL"]), &FilterCriteria::default());
        assert_eq!(result.names, names(&["Root"]));
    }

    #[test]
    fn test_duplicate_rows_yield_distinct_names() {
        let table = GameTable::from_records(vec![
            game("Azul", 1, 9.0),
            game("Root", 1, 8.0),
            game("root", 1, 7.0),
        ]);
        let result = recommend(&table, &names(&["Azul"]), &FilterCriteria::default());
        assert_eq!(result.names, names(&["Root"]));
    }

    #[test]
    fn test_names_are_display_formatted() {
        let table = GameTable::from_records(vec![
            game("catan", 1, 9.0),
            game("king's cup", 1, 8.0),
        ]);
        let result = recommend(&table, &names(&["catan"]), &FilterCriteria::default());
        assert_eq!(result.names, names(&["King's Cup"]));
    }

    #[test]
    fn test_idempotent() {
        let table = create_test_table();
        let input = names(&["A", "D", "Zzz"]);
        let filters = FilterCriteria {
            max_complexity: Some(3.0),
            ..Default::default()
        };
        assert_eq!(
            recommend(&table, &input, &filters),
            recommend(&table, &input, &filters)
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(RecommendError::EmptyInput.to_string(), "No input received");
        assert_eq!(
            RecommendError::NameNotFound("Zzz".to_string()).to_string(),
            "Zzz not found"
        );
        assert_eq!(
            RecommendError::NoMatches {
                not_found: MissingNames::from(vec!["X".to_string()])
            }
            .to_string(),
            "X not found.  No recommendations found based on search parameters"
        );
        assert_eq!(
            RecommendError::NoMatches {
                not_found: MissingNames::default()
            }
            .to_string(),
            NO_RESULTS
        );
    }

    #[test]
    fn test_partial_not_found_message() {
        let mut missing = MissingNames::default();
        missing.push("Foo");
        missing.push("Bar");
        assert_eq!(missing.names(), ["Foo", "Bar"]);
        assert_eq!(
            RecommendError::PartialNotFound(missing).to_string(),
            "Foo not found.  Bar not found.  "
        );
        assert!(MissingNames::default().is_empty());
    }
}
