use redis::{aio::ConnectionManager, AsyncCommands, Client};

use crate::{
    db::store::{KeyValueStore, StoreKey},
    error::AppResult,
};

/// Persistent user data in Redis (no expiry)
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connects and keeps a self-reconnecting connection for all operations
    pub async fn connect(client: Client) -> AppResult<Self> {
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }
}

#[async_trait::async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &StoreKey) -> AppResult<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key.to_string()).await?;
        Ok(value)
    }

    async fn set(&self, key: &StoreKey, value: String) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.set(key.to_string(), value).await?;
        tracing::debug!(key = %key, "Stored value");
        Ok(())
    }

    async fn delete(&self, key: &StoreKey) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(key.to_string()).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
