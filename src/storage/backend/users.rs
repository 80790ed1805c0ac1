//! 用户账号与资料

use chrono::Utc;
use sea_orm::{ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use tracing::info;

use super::converters::{
    model_to_account, model_to_profile, new_user_active_model, profile_to_active_model,
};
use super::{SeaOrmStorage, retry};
use crate::errors::{Result, ShrtError};
use crate::storage::models::{UserAccount, UserProfile};

use migration::entities::user;

impl SeaOrmStorage {
    /// 新建账号；email 已被占用时返回 Conflict
    pub async fn create_user(&self, account: &UserAccount) -> Result<()> {
        let db = &self.db;
        retry::run("create_user", self.retry_config, || async {
            user::Entity::insert(new_user_active_model(account))
                .exec_without_returning(db)
                .await
        })
        .await
        .map_err(|e| match e {
            ShrtError::Conflict(_) => ShrtError::conflict("Email is already registered"),
            other => other,
        })?;

        info!("User created: {}", account.uid);
        Ok(())
    }

    async fn find_user_model(
        &self,
        column: user::Column,
        value: &str,
    ) -> Result<Option<user::Model>> {
        let db = &self.db;
        retry::run("find_user", self.retry_config, || async {
            user::Entity::find().filter(column.eq(value)).one(db).await
        })
        .await
    }

    pub async fn find_account_by_uid(&self, uid: &str) -> Result<Option<UserAccount>> {
        Ok(self
            .find_user_model(user::Column::Uid, uid)
            .await?
            .as_ref()
            .map(model_to_account))
    }

    pub async fn find_account_by_email(&self, email: &str) -> Result<Option<UserAccount>> {
        Ok(self
            .find_user_model(user::Column::Email, email)
            .await?
            .as_ref()
            .map(model_to_account))
    }

    pub async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>> {
        Ok(self
            .find_user_model(user::Column::Uid, uid)
            .await?
            .map(model_to_profile))
    }

    pub async fn find_profile_by_username(&self, username: &str) -> Result<Option<UserProfile>> {
        Ok(self
            .find_user_model(user::Column::Username, username)
            .await?
            .map(model_to_profile))
    }

    /// 覆盖资料字段，`new_email` 非空时同一条 UPDATE 里一起改邮箱
    ///
    /// 用户名或邮箱唯一约束冲突返回 Conflict，此时整行保持不变。
    pub async fn save_profile(&self, profile: &UserProfile, new_email: Option<&str>) -> Result<()> {
        let db = &self.db;
        let mut model = profile_to_active_model(profile);
        if let Some(email) = new_email {
            model.email = Set(email.to_string());
        }

        let result = match retry::run("save_profile", self.retry_config, || async {
            user::Entity::update_many()
                .set(model.clone())
                .filter(user::Column::Uid.eq(profile.uid.as_str()))
                .exec(db)
                .await
        })
        .await
        {
            Ok(result) => result,
            Err(ShrtError::Conflict(_)) => {
                return Err(self.profile_conflict(&profile.uid, new_email).await);
            }
            Err(e) => return Err(e),
        };

        if result.rows_affected == 0 {
            return Err(ShrtError::not_found(format!("User not found: {}", profile.uid)));
        }
        Ok(())
    }

    async fn profile_conflict(&self, uid: &str, new_email: Option<&str>) -> ShrtError {
        if let Some(email) = new_email
            && let Ok(Some(holder)) = self.find_account_by_email(email).await
            && holder.uid != uid
        {
            return ShrtError::conflict("Email is already registered");
        }
        ShrtError::conflict("Username is already taken")
    }

    pub async fn update_email(&self, uid: &str, email: &str) -> Result<()> {
        let db = &self.db;
        let result = retry::run("update_email", self.retry_config, || async {
            user::Entity::update_many()
                .set(user::ActiveModel {
                    email: Set(email.to_string()),
                    updated_at: Set(Utc::now()),
                    ..Default::default()
                })
                .filter(user::Column::Uid.eq(uid))
                .exec(db)
                .await
        })
        .await
        .map_err(|e| match e {
            ShrtError::Conflict(_) => ShrtError::conflict("Email is already registered"),
            other => other,
        })?;

        if result.rows_affected == 0 {
            return Err(ShrtError::not_found(format!("User not found: {}", uid)));
        }
        Ok(())
    }

    pub async fn update_password_hash(&self, uid: &str, password_hash: &str) -> Result<()> {
        let db = &self.db;
        let result = retry::run("update_password_hash", self.retry_config, || async {
            user::Entity::update_many()
                .set(user::ActiveModel {
                    password_hash: Set(password_hash.to_string()),
                    updated_at: Set(Utc::now()),
                    ..Default::default()
                })
                .filter(user::Column::Uid.eq(uid))
                .exec(db)
                .await
        })
        .await?;

        if result.rows_affected == 0 {
            return Err(ShrtError::not_found(format!("User not found: {}", uid)));
        }
        Ok(())
    }

    /// 账号列表（CLI 使用）
    pub async fn list_accounts(&self, limit: u64) -> Result<Vec<UserAccount>> {
        let db = &self.db;
        let models = retry::run("list_accounts", self.retry_config, || async {
            user::Entity::find()
                .order_by_asc(user::Column::CreatedAt)
                .limit(limit)
                .all(db)
                .await
        })
        .await?;

        Ok(models.iter().map(model_to_account).collect())
    }
}
