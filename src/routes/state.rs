use std::sync::Arc;

use crate::services::{catalog::GameTable, selections::SelectionStore};

/// Shared application state
///
/// The game table is frozen after startup; only the selection store sees writes.
#[derive(Clone)]
pub struct AppState {
    pub games: Arc<GameTable>,
    pub selections: Arc<dyn SelectionStore>,
}

impl AppState {
    pub fn new(games: GameTable, selections: Arc<dyn SelectionStore>) -> Self {
        Self {
            games: Arc::new(games),
            selections,
        }
    }
}
