use redis::AsyncCommands;
use redis::Client;
use redis::Script;
use std::fmt::Display;

use crate::error::AppResult;
use crate::middleware::SessionId;
use crate::models::UserSelection;
use crate::services::selections::SelectionStore;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Selections(SessionId),
}

impl Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreKey::Selections(session) => write!(f, "selections:{}", session),
        }
    }
}

/// Creates a Redis client for session storage
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Appends ARGV[2..] to the list at KEYS[1], skipping names already present,
/// refreshes the expiry to ARGV[1] seconds and returns the whole list.
const APPEND_SCRIPT: &str = r#"
local existing = redis.call('LRANGE', KEYS[1], 0, -1)
local seen = {}
for _, name in ipairs(existing) do
    seen[name] = true
end
for i = 2, #ARGV do
    local name = ARGV[i]
    if not seen[name] then
        redis.call('RPUSH', KEYS[1], name)
        seen[name] = true
        table.insert(existing, name)
    end
end
if #existing > 0 then
    redis.call('EXPIRE', KEYS[1], ARGV[1])
end
return existing
"#;

/// Selection store backed by Redis
///
/// Each session's names live in a Redis list. Appends run as a single Lua
/// script, so concurrent submissions for one session are serialized by the
/// server. The expiry is refreshed on every append and abandoned sessions age
/// out on their own.
#[derive(Clone)]
pub struct RedisSelectionStore {
    redis_client: Client,
    append_script: Script,
    ttl: u64,
}

impl RedisSelectionStore {
    pub fn new(redis_client: Client, ttl: u64) -> Self {
        Self {
            redis_client,
            append_script: Script::new(APPEND_SCRIPT),
            ttl,
        }
    }

    /// Verifies the server is reachable
    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl SelectionStore for RedisSelectionStore {
    async fn load(&self, session: &SessionId) -> AppResult<Option<UserSelection>> {
        let key = StoreKey::Selections(*session);
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let names: Vec<String> = conn.lrange(key.to_string(), 0, -1).await?;

        if names.is_empty() {
            return Ok(None);
        }
        Ok(Some(UserSelection::from_names(names)))
    }

    async fn append(&self, session: &SessionId, names: Vec<String>) -> AppResult<UserSelection> {
        let key = StoreKey::Selections(*session);
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;

        let mut invocation = self.append_script.key(key.to_string());
        invocation.arg(self.ttl);
        for name in &names {
            invocation.arg(name);
        }
        let stored: Vec<String> = invocation.invoke_async(&mut conn).await?;

        Ok(UserSelection::from_names(stored))
    }

    async fn remove(&self, session: &SessionId) -> AppResult<()> {
        let key = StoreKey::Selections(*session);
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.del(key.to_string()).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

// Round-trip tests need a live server; they read REDIS_URL and skip when it is unset.
