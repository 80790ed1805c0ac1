use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::config::StaticConfig;
use crate::services::AppContext;
use crate::storage::{SeaOrmStorage, StorageFactory};

pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub app: Arc<AppContext>,
}

/// 准备服务器启动所需的存储和服务
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());

    tokio::fs::create_dir_all(&config.storage.objects_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create objects directory {}",
                config.storage.objects_dir
            )
        })?;
    let objects = StorageFactory::create_object_store();

    if config.links.base_url.is_empty() {
        warn!("links.base_url is empty, short_url fields will be relative");
    }
    if config.auth.cookie_same_site == crate::config::SameSitePolicy::None
        && !config.auth.cookie_secure
    {
        warn!("cookie_same_site = None without cookie_secure, browsers will drop the cookies");
    }

    let app = Arc::new(AppContext::new(config, storage.clone(), objects));

    info!(
        "Pre-startup completed in {} ms",
        start_time.elapsed().as_millis()
    );
    Ok(StartupContext { storage, app })
}

/// CLI 模式只需要存储
pub async fn cli_pre_startup() -> Result<Arc<SeaOrmStorage>> {
    StorageFactory::create()
        .await
        .context("Failed to create storage backend")
}
