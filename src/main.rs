use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use boardgame_recommender::{
    config::{Config, SessionBackend},
    db::{create_pool, create_redis_client, run_migrations, RedisSelectionStore},
    routes::{create_router, AppState},
    services::{GameTable, InMemorySelectionStore, SelectionStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "boardgame_recommender=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    let games = load_game_table(&config).await?;
    if games.is_empty() {
        tracing::warn!("Game table is empty; every recommendation will come back empty");
    }

    let selections = build_selection_store(&config).await?;

    tracing::info!(
        games = games.len(),
        session_store = selections.name(),
        "Reference table loaded"
    );

    let state = AppState::new(games, selections);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %config.bind_address(), "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}

/// Loads the frozen reference table. Any schema problem aborts startup.
async fn load_game_table(config: &Config) -> anyhow::Result<GameTable> {
    match &config.game_table_path {
        Some(path) => {
            tracing::info!(path = %path, "Loading game table from file");
            Ok(GameTable::from_json_file(path)?)
        }
        None => {
            tracing::info!("Loading game table from Postgres");
            let pool = create_pool(&config.database_url).await?;
            run_migrations(&pool).await?;
            let games = GameTable::load_from_db(&pool).await?;
            pool.close().await;
            Ok(games)
        }
    }
}

async fn build_selection_store(config: &Config) -> anyhow::Result<Arc<dyn SelectionStore>> {
    match config.session_store {
        SessionBackend::Redis => {
            let client = create_redis_client(&config.redis_url)?;
            let store = RedisSelectionStore::new(client, config.session_ttl_secs);
            store.ping().await?;
            Ok(Arc::new(store))
        }
        SessionBackend::Memory => Ok(Arc::new(InMemorySelectionStore::new())),
    }
}
