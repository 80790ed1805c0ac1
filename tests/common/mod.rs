//! Shared setup for integration tests
//!
//! 每个测试一个独立的 SQLite 文件和对象目录。

#![allow(dead_code)]

use std::sync::{Arc, Once};

use actix_web::web;
use tempfile::TempDir;

use shrt::config::{get_config, init_config};
use shrt::services::AppContext;
use shrt::storage::{LocalObjectStore, ObjectStore, SeaOrmStorage};

static INIT: Once = Once::new();

pub fn init_static_config() {
    INIT.call_once(|| {
        init_config();
    });
}

pub struct TestEnv {
    pub ctx: Arc<AppContext>,
    pub storage: Arc<SeaOrmStorage>,
    _dir: TempDir,
}

impl TestEnv {
    pub fn data(&self) -> web::Data<AppContext> {
        web::Data::from(self.ctx.clone())
    }
}

pub async fn test_env() -> TestEnv {
    init_static_config();

    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
    let storage = Arc::new(
        SeaOrmStorage::new(&db_url, "sqlite")
            .await
            .expect("Failed to create storage"),
    );
    let objects: Arc<dyn ObjectStore> = Arc::new(LocalObjectStore::new(dir.path().join("objects")));

    let config = get_config();
    let ctx = Arc::new(AppContext::new(&config, storage.clone(), objects));

    TestEnv {
        ctx,
        storage,
        _dir: dir,
    }
}

/// 与服务器相同的路由和 JSON 配置
#[macro_export]
macro_rules! test_app {
    ($env:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($env.data())
                .app_data(shrt::runtime::modes::server::json_config(64 * 1024))
                .app_data(shrt::runtime::modes::server::query_config())
                .service(shrt::api::services::health_routes())
                .service(shrt::api::services::api_v1_routes())
                .configure(shrt::api::services::public_routes)
                .configure(shrt::api::services::redirect_routes),
        )
        .await
    };
}

/// 注册一个账号并返回 access token
pub async fn sign_up(env: &TestEnv, email: &str) -> (String, String) {
    let session = env
        .ctx
        .auth
        .sign_up(email, "correct-horse")
        .await
        .expect("sign up failed");
    (session.account.uid, session.tokens.access_token)
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}
