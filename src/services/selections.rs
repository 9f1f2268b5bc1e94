use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::{error::AppResult, middleware::SessionId, models::UserSelection};

/// Per-session storage for accumulated game selections
///
/// The recommendation engine never touches this; handlers read the list and
/// pass it along as a plain argument.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SelectionStore: Send + Sync {
    /// Current selection, or `None` for a session that never submitted anything
    async fn load(&self, session: &SessionId) -> AppResult<Option<UserSelection>>;

    /// Appends names not already present and returns the updated selection.
    ///
    /// Implementations must apply the read-modify-write atomically so that
    /// concurrent submissions for one session never drop each other's names.
    async fn append(&self, session: &SessionId, names: Vec<String>) -> AppResult<UserSelection>;

    async fn remove(&self, session: &SessionId) -> AppResult<()>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Process-local store, used in tests and single-instance deployments
#[derive(Default)]
pub struct InMemorySelectionStore {
    selections: RwLock<HashMap<SessionId, UserSelection>>,
}

impl InMemorySelectionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SelectionStore for InMemorySelectionStore {
    async fn load(&self, session: &SessionId) -> AppResult<Option<UserSelection>> {
        Ok(self.selections.read().await.get(session).cloned())
    }

    async fn append(&self, session: &SessionId, names: Vec<String>) -> AppResult<UserSelection> {
        // One write guard spans the whole read-modify-write
        let mut selections = self.selections.write().await;
        let selection = selections.entry(*session).or_default();
        selection.extend(names);
        Ok(selection.clone())
    }

    async fn remove(&self, session: &SessionId) -> AppResult<()> {
        self.selections.write().await.remove(session);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Returns the session's selection, empty if it has none yet
pub async fn current_selection(
    store: &dyn SelectionStore,
    session: &SessionId,
) -> AppResult<UserSelection> {
    Ok(store.load(session).await?.unwrap_or_default())
}

/// Appends names to the session's selection and persists it
pub async fn add_to_selection(
    store: &dyn SelectionStore,
    session: &SessionId,
    names: Vec<String>,
) -> AppResult<UserSelection> {
    let submitted = names.len();
    let selection = store.append(session, names).await?;

    tracing::info!(
        session_id = %session,
        store = store.name(),
        submitted,
        total = selection.names.len(),
        "Selection updated"
    );

    Ok(selection)
}

/// Resets the session's selection to empty
pub async fn clear_selection(
    store: &dyn SelectionStore,
    session: &SessionId,
) -> AppResult<UserSelection> {
    store.remove(session).await?;
    tracing::info!(session_id = %session, store = store.name(), "Selection cleared");
    Ok(UserSelection::new())
}
