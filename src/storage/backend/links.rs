//! 短链接读写

use sea_orm::{
    ColumnTrait, EntityTrait, ExprTrait, FromQueryResult, QueryFilter, QueryOrder, QuerySelect,
    sea_query::{Expr, OnConflict},
};
use tracing::{debug, info};

use super::converters::{model_to_shortlink, shortlink_to_active_model};
use super::{SeaOrmStorage, retry};
use crate::errors::{Result, ShrtError};
use crate::storage::models::{LinkStats, ShortLink};

use migration::entities::shrt;

#[derive(Debug, FromQueryResult)]
struct StatsRow {
    total_links: i64,
    total_clicks: Option<i64>,
    archived_links: Option<i64>,
}

impl SeaOrmStorage {
    pub async fn get_link(&self, code: &str) -> Result<Option<ShortLink>> {
        let db = &self.db;
        let model = retry::run(&format!("get_link({})", code), self.retry_config, || async {
            shrt::Entity::find_by_id(code.to_string()).one(db).await
        })
        .await?;

        Ok(model.map(model_to_shortlink))
    }

    /// 按短码写入整条记录，已存在则覆盖（包括 clicks）
    pub async fn upsert_link(&self, link: &ShortLink) -> Result<()> {
        let db = &self.db;
        retry::run(&format!("upsert_link({})", link.code), self.retry_config, || async {
            shrt::Entity::insert(shortlink_to_active_model(link))
                .on_conflict(
                    OnConflict::column(shrt::Column::Code)
                        .update_columns([
                            shrt::Column::DestinationUrl,
                            shrt::Column::OwnerId,
                            shrt::Column::CreatedAt,
                            shrt::Column::Archived,
                            shrt::Column::Clicks,
                        ])
                        .to_owned(),
                )
                .exec_without_returning(db)
                .await
        })
        .await?;

        info!("Short link upserted: {}", link.code);
        Ok(())
    }

    /// 仅插入；短码已存在时返回 Conflict
    pub async fn insert_link(&self, link: &ShortLink) -> Result<()> {
        let db = &self.db;
        retry::run(&format!("insert_link({})", link.code), self.retry_config, || async {
            shrt::Entity::insert(shortlink_to_active_model(link))
                .exec_without_returning(db)
                .await
        })
        .await
        .map_err(|e| match e {
            ShrtError::Conflict(_) => {
                ShrtError::conflict(format!("Short code '{}' is already taken", link.code))
            }
            other => other,
        })?;

        info!("Short link inserted: {}", link.code);
        Ok(())
    }

    /// 所有目标地址等于 `destination_url` 的链接；`owner_id` 为 Some 时只看该用户
    pub async fn find_links_by_destination(
        &self,
        destination_url: &str,
        owner_id: Option<&str>,
    ) -> Result<Vec<ShortLink>> {
        let db = &self.db;
        let models = retry::run("find_links_by_destination", self.retry_config, || async {
            let mut query =
                shrt::Entity::find().filter(shrt::Column::DestinationUrl.eq(destination_url));
            if let Some(owner) = owner_id {
                query = query.filter(shrt::Column::OwnerId.eq(owner));
            }
            query.order_by_desc(shrt::Column::CreatedAt).all(db).await
        })
        .await?;

        Ok(models.into_iter().map(model_to_shortlink).collect())
    }

    /// 用户未归档的链接，新的在前
    pub async fn list_active_links(&self, owner_id: &str) -> Result<Vec<ShortLink>> {
        let db = &self.db;
        let models = retry::run(
            &format!("list_active_links({})", owner_id),
            self.retry_config,
            || async {
                shrt::Entity::find()
                    .filter(shrt::Column::OwnerId.eq(owner_id))
                    .filter(shrt::Column::Archived.eq(false))
                    .order_by_desc(shrt::Column::CreatedAt)
                    .all(db)
                    .await
            },
        )
        .await?;

        Ok(models.into_iter().map(model_to_shortlink).collect())
    }

    /// 所有链接（CLI 使用），可选按 owner 过滤
    pub async fn list_links(&self, owner_id: Option<&str>, limit: u64) -> Result<Vec<ShortLink>> {
        let db = &self.db;
        let models = retry::run("list_links", self.retry_config, || async {
            let mut query = shrt::Entity::find();
            if let Some(owner) = owner_id {
                query = query.filter(shrt::Column::OwnerId.eq(owner));
            }
            query
                .order_by_desc(shrt::Column::CreatedAt)
                .limit(limit)
                .all(db)
                .await
        })
        .await?;

        Ok(models.into_iter().map(model_to_shortlink).collect())
    }

    /// 标记归档；返回 false 表示短码不存在
    pub async fn archive_link(&self, code: &str) -> Result<bool> {
        let db = &self.db;
        let result = retry::run(&format!("archive_link({})", code), self.retry_config, || async {
            shrt::Entity::update_many()
                .col_expr(shrt::Column::Archived, Expr::value(true))
                .filter(shrt::Column::Code.eq(code))
                .exec(db)
                .await
        })
        .await?;

        Ok(result.rows_affected > 0)
    }

    /// 原子自增点击数（单条 UPDATE，不读-改-写）
    ///
    /// 连接中断不重放，避免一次访问计两次。
    pub async fn increment_clicks(&self, code: &str) -> Result<bool> {
        let db = &self.db;
        let result = retry::run_non_idempotent(
            &format!("increment_clicks({})", code),
            self.retry_config,
            || async {
                shrt::Entity::update_many()
                    .col_expr(
                        shrt::Column::Clicks,
                        Expr::col(shrt::Column::Clicks).add(1),
                    )
                    .filter(shrt::Column::Code.eq(code))
                    .exec(db)
                    .await
            },
        )
        .await?;

        debug!("Click recorded for {}", code);
        Ok(result.rows_affected > 0)
    }

    /// 单用户统计（一次聚合查询）
    pub async fn link_stats(&self, owner_id: &str) -> Result<LinkStats> {
        let db = &self.db;
        let row = retry::run("link_stats", self.retry_config, || async {
            shrt::Entity::find()
                .select_only()
                .column_as(shrt::Column::Code.count(), "total_links")
                .column_as(shrt::Column::Clicks.sum(), "total_clicks")
                .column_as(
                    Expr::case(shrt::Column::Archived.eq(true), 1)
                        .finally(0)
                        .sum(),
                    "archived_links",
                )
                .filter(shrt::Column::OwnerId.eq(owner_id))
                .into_model::<StatsRow>()
                .one(db)
                .await
        })
        .await?;

        Ok(match row {
            Some(row) => {
                let total = std::cmp::Ord::max(row.total_links, 0) as u64;
                let archived = std::cmp::Ord::max(row.archived_links.unwrap_or(0), 0) as u64;
                LinkStats {
                    total_links: total,
                    active_links: total.saturating_sub(archived),
                    archived_links: archived,
                    total_clicks: std::cmp::Ord::max(row.total_clicks.unwrap_or(0), 0) as u64,
                }
            }
            None => LinkStats::default(),
        })
    }
}
