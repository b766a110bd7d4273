//! Link rows

use async_trait::async_trait;
use sea_orm::{EntityTrait, PaginatorTrait, QueryOrder, QuerySelect};
use tracing::{debug, info};

use super::converters::{link_to_active_model, model_to_link};
use super::{SeaOrmStorage, map_insert_error};
use crate::errors::{Result, ShortstatError};
use crate::storage::models::Link;
use crate::storage::traits::LinkStore;

use migration::entities::link;

#[async_trait]
impl LinkStore for SeaOrmStorage {
    async fn create(&self, link: &Link) -> Result<()> {
        link::Entity::insert(link_to_active_model(link))
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| map_insert_error(e, &link.code))?;

        debug!("Short link inserted: {}", link.code);
        Ok(())
    }

    async fn get(&self, code: &str) -> Result<Link> {
        link::Entity::find_by_id(code.to_string())
            .one(&self.db)
            .await?
            .map(model_to_link)
            .ok_or_else(|| ShortstatError::not_found(format!("Short link not found: {}", code)))
    }

    async fn all(&self, limit: u64) -> Result<Vec<Link>> {
        let models = link::Entity::find()
            .order_by_desc(link::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(model_to_link).collect())
    }

    async fn delete(&self, code: &str) -> Result<()> {
        let result = link::Entity::delete_by_id(code.to_string())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ShortstatError::not_found(format!(
                "Short link not found: {}",
                code
            )));
        }

        info!("Short link deleted: {}", code);
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        Ok(link::Entity::find().count(&self.db).await?)
    }

    fn backend_name(&self) -> &str {
        &self.backend_name
    }
}
