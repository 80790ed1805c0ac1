use std::sync::Arc;

use crate::errors::Result;

pub mod backend;
pub mod models;
pub mod objects;

pub use backend::SeaOrmStorage;
pub use models::{
    ContactInfo, LinkStats, PlpLink, ShortLink, SocialHandles, SocialLink, SocialPlatform,
    StoredObject, UserAccount, UserProfile,
};
pub use objects::{LocalObjectStore, ObjectStore};

pub struct StorageFactory;

impl StorageFactory {
    /// 按配置中的 database_url 创建存储
    pub async fn create() -> Result<Arc<SeaOrmStorage>> {
        let config = crate::config::get_config();
        let database_url = &config.database.database_url;

        let backend_type = backend::infer_backend_from_url(database_url)?;

        let storage = SeaOrmStorage::new(database_url, &backend_type).await?;
        Ok(Arc::new(storage))
    }

    /// 按配置创建本地对象存储
    pub fn create_object_store() -> Arc<dyn ObjectStore> {
        let config = crate::config::get_config();
        Arc::new(LocalObjectStore::new(&config.storage.objects_dir))
    }
}
