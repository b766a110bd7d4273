use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, trace};

use crate::cache::LookupCache;
use crate::config::CacheConfig;
use crate::errors::Result;

pub struct RedisLookupCache {
    client: redis::Client,
    /// 持久化连接，使用 RwLock 保护
    connection: Arc<RwLock<Option<MultiplexedConnection>>>,
    key_prefix: String,
    ttl: u64,
}

impl RedisLookupCache {
    /// Opening the client only validates the URL; the connection is made lazily.
    pub fn new(config: &CacheConfig) -> Result<Self> {
        let client = redis::Client::open(config.redis.url.as_str())?;

        debug!(
            "RedisLookupCache created with prefix: '{}', TTL: {}s",
            config.redis.key_prefix, config.default_ttl
        );

        Ok(Self {
            client,
            connection: Arc::new(RwLock::new(None)),
            key_prefix: config.redis.key_prefix.clone(),
            ttl: config.default_ttl,
        })
    }

    pub async fn ping(&self) -> Result<()> {
        let mut conn = self.get_connection().await?;
        let result: redis::RedisResult<String> = redis::cmd("PING").query_async(&mut conn).await;
        match result {
            Ok(response) => {
                debug!("Redis connection test successful: {}", response);
                Ok(())
            }
            Err(e) => {
                self.reset_connection().await;
                Err(e.into())
            }
        }
    }

    /// 获取或建立持久连接
    async fn get_connection(&self) -> Result<MultiplexedConnection> {
        {
            let conn_guard = self.connection.read().await;
            if let Some(ref conn) = *conn_guard {
                return Ok(conn.clone());
            }
        }

        let mut conn_guard = self.connection.write().await;

        // 双重检查，避免竞态条件
        if let Some(ref conn) = *conn_guard {
            return Ok(conn.clone());
        }

        let new_conn = self.client.get_multiplexed_async_connection().await?;
        *conn_guard = Some(new_conn.clone());
        debug!("Redis connection established and cached");

        Ok(new_conn)
    }

    /// 重置连接（在连接错误时调用）
    async fn reset_connection(&self) {
        let mut conn_guard = self.connection.write().await;
        *conn_guard = None;
        debug!("Redis connection reset due to error");
    }

    fn make_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }

    /// Runs one command, dropping the cached connection if it failed.
    async fn with_connection<T, F, Fut>(&self, op: F) -> Result<T>
    where
        F: FnOnce(MultiplexedConnection) -> Fut,
        Fut: std::future::Future<Output = redis::RedisResult<T>>,
    {
        let conn = match self.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                self.reset_connection().await;
                return Err(e);
            }
        };

        match op(conn).await {
            Ok(value) => Ok(value),
            Err(e) => {
                self.reset_connection().await;
                Err(e.into())
            }
        }
    }
}

#[async_trait]
impl LookupCache for RedisLookupCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let redis_key = self.make_key(key);
        let value: Option<String> = self
            .with_connection(|mut conn| async move { conn.get(redis_key).await })
            .await?;

        if value.is_none() {
            trace!("Key not found in cache: {}", key);
        }
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let redis_key = self.make_key(key);
        let value = value.to_string();
        let ttl = self.ttl;

        self.with_connection(|mut conn| async move {
            conn.set_ex::<String, String, ()>(redis_key, value, ttl).await
        })
        .await?;

        trace!("Successfully inserted key into cache: {}", key);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let redis_key = self.make_key(key);
        let deleted: i32 = self
            .with_connection(|mut conn| async move { conn.del(redis_key).await })
            .await?;

        trace!("Removed {} cache entries for key: {}", deleted, key);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
