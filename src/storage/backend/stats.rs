//! Stats rows, keyed by event id with a secondary path by link code

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::debug;

use super::converters::{model_to_stats, stats_to_active_model};
use super::{SeaOrmStorage, map_insert_error};
use crate::errors::{Result, ShortstatError};
use crate::storage::models::Stats;
use crate::storage::traits::StatsStore;

use migration::entities::stats;

#[async_trait]
impl StatsStore for SeaOrmStorage {
    async fn create(&self, row: &Stats) -> Result<()> {
        stats::Entity::insert(stats_to_active_model(row))
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| map_insert_error(e, &row.id))?;
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Stats> {
        stats::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .map(model_to_stats)
            .ok_or_else(|| ShortstatError::not_found(format!("Stats not found: {}", id)))
    }

    async fn all(&self) -> Result<Vec<Stats>> {
        let models = stats::Entity::find()
            .order_by_desc(stats::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(model_to_stats).collect())
    }

    async fn list_by_link(&self, code: &str) -> Result<Vec<Stats>> {
        let models = stats::Entity::find()
            .filter(stats::Column::LinkCode.eq(code))
            .order_by_desc(stats::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(model_to_stats).collect())
    }

    async fn delete_by_link(&self, code: &str) -> Result<u64> {
        let result = stats::Entity::delete_many()
            .filter(stats::Column::LinkCode.eq(code))
            .exec(&self.db)
            .await?;

        debug!("Deleted {} stats rows for {}", result.rows_affected, code);
        Ok(result.rows_affected)
    }
}
