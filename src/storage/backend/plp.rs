//! PLP 链接读写

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, sea_query::Expr};
use tracing::info;

use super::converters::{model_to_plp_link, plp_link_to_active_model};
use super::{SeaOrmStorage, retry};
use crate::errors::{Result, ShrtError};
use crate::storage::models::PlpLink;

use migration::entities::plp_link;

impl SeaOrmStorage {
    pub async fn insert_plp_link(&self, link: &PlpLink) -> Result<()> {
        let db = &self.db;
        retry::run("insert_plp_link", self.retry_config, || async {
            plp_link::Entity::insert(plp_link_to_active_model(link))
                .exec_without_returning(db)
                .await
        })
        .await?;

        info!("PLP link added: {} (owner {})", link.id, link.owner_id);
        Ok(())
    }

    pub async fn get_plp_link(&self, id: &str) -> Result<Option<PlpLink>> {
        let db = &self.db;
        let model = retry::run("get_plp_link", self.retry_config, || async {
            plp_link::Entity::find_by_id(id.to_string()).one(db).await
        })
        .await?;

        Ok(model.map(model_to_plp_link))
    }

    /// 整行覆盖（id 与 owner 不变）
    pub async fn save_plp_link(&self, link: &PlpLink) -> Result<()> {
        let db = &self.db;
        let result = retry::run("save_plp_link", self.retry_config, || async {
            plp_link::Entity::update_many()
                .set(plp_link_to_active_model(link))
                .filter(plp_link::Column::Id.eq(link.id.as_str()))
                .exec(db)
                .await
        })
        .await?;

        if result.rows_affected == 0 {
            return Err(ShrtError::not_found(format!("PLP link not found: {}", link.id)));
        }
        Ok(())
    }

    pub async fn archive_plp_link(&self, id: &str) -> Result<bool> {
        let db = &self.db;
        let result = retry::run("archive_plp_link", self.retry_config, || async {
            plp_link::Entity::update_many()
                .col_expr(plp_link::Column::Archived, Expr::value(true))
                .filter(plp_link::Column::Id.eq(id))
                .exec(db)
                .await
        })
        .await?;

        Ok(result.rows_affected > 0)
    }

    /// 用户未归档的 PLP 链接，按 (order, created_at) 排序
    pub async fn list_active_plp_links(&self, owner_id: &str) -> Result<Vec<PlpLink>> {
        let db = &self.db;
        let models = retry::run("list_active_plp_links", self.retry_config, || async {
            plp_link::Entity::find()
                .filter(plp_link::Column::OwnerId.eq(owner_id))
                .filter(plp_link::Column::Archived.eq(false))
                .order_by_asc(plp_link::Column::SortOrder)
                .order_by_asc(plp_link::Column::CreatedAt)
                .all(db)
                .await
        })
        .await?;

        Ok(models.into_iter().map(model_to_plp_link).collect())
    }
}
