use std::sync::Arc;

use tracing::info;

use crate::config::DatabaseConfig;
use crate::errors::Result;

pub mod backend;
pub mod memory;
pub mod models;
pub mod traits;

pub use backend::SeaOrmStorage;
pub use memory::MemoryStorage;
pub use models::{Link, LinkWithStats, Platform, Stats};
pub use traits::{LinkStore, StatsStore};

/// 同一个后端同时提供链接和统计两种存储
#[derive(Clone)]
pub struct StorageBundle {
    pub links: Arc<dyn LinkStore>,
    pub stats: Arc<dyn StatsStore>,
    pub backend_name: String,
}

impl StorageBundle {
    fn from_backend<S>(storage: Arc<S>, backend_name: &str) -> Self
    where
        S: LinkStore + StatsStore + 'static,
    {
        Self {
            links: storage.clone(),
            stats: storage,
            backend_name: backend_name.to_string(),
        }
    }
}

pub struct StorageFactory;

impl StorageFactory {
    pub async fn create(config: &DatabaseConfig) -> Result<StorageBundle> {
        // 从 URL 自动推断数据库类型
        let backend_type = backend::infer_backend_from_url(&config.database_url)?;
        info!("Using {} storage backend", backend_type);

        if backend_type == "memory" {
            return Ok(StorageBundle::from_backend(
                Arc::new(MemoryStorage::new()),
                &backend_type,
            ));
        }

        let storage = SeaOrmStorage::new(config, &backend_type).await?;
        Ok(StorageBundle::from_backend(Arc::new(storage), &backend_type))
    }
}
