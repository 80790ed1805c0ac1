//! Server mode
//!
//! 启动 HTTP 服务器并挂载全部路由

use std::time::Duration;

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    http::header,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use tracing::{error, warn};

use crate::api::middleware::RequestIdMiddleware;
use crate::api::services::{api_v1_routes, health_routes, public_routes, redirect_routes};
use crate::config::CorsConfig;
use crate::errors::ShrtError;
use crate::runtime::lifetime;

/// Validate CORS configuration at startup (runs once)
fn validate_cors_config(cors: &CorsConfig) {
    if !cors.enabled {
        return;
    }

    if cors.allowed_origins.is_empty() {
        warn!("CORS enabled but allowed_origins is empty, cross-origin requests will be rejected");
    }

    let is_any_origin = cors.allowed_origins.iter().any(|o| o == "*");
    if is_any_origin && cors.allow_credentials {
        error!(
            "CORS: '*' origin combined with allow_credentials is unsafe, credentials disabled"
        );
    }
}

/// Build CORS middleware from configuration
pub fn build_cors_middleware(cors_config: &CorsConfig) -> Cors {
    // 未启用时使用浏览器默认的同源策略
    if !cors_config.enabled {
        return Cors::default();
    }

    let is_any_origin = cors_config.allowed_origins.iter().any(|o| o == "*");

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "HEAD", "POST", "PUT", "PATCH", "DELETE"])
        .allowed_headers(vec![
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ])
        .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
        .max_age(cors_config.max_age);

    if is_any_origin {
        cors = cors.allow_any_origin();
    } else {
        for origin in &cors_config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    // actix-cors 在 any_origin 下会回显 Origin，不能再带 credentials
    if cors_config.allow_credentials && !is_any_origin {
        cors = cors.supports_credentials();
    }

    cors
}

/// JSON body 解析失败统一返回 400 + API 信封
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| ShrtError::validation(format!("Invalid JSON body: {}", err)).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| ShrtError::validation(format!("Invalid query: {}", err)).into())
}

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let config = crate::config::get_config();

    let startup = lifetime::startup::prepare_server_startup(&config)
        .await
        .inspect_err(|e| error!("Server startup failed: {:#}", e))?;

    let storage = startup.storage.clone();
    let app_data = web::Data::from(startup.app.clone());

    let cors_config = config.cors.clone();
    validate_cors_config(&cors_config);

    // multipart 额外留一点余量给边界和表单头
    let payload_limit = config.storage.max_upload_bytes + 64 * 1024;

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(build_cors_middleware(&cors_config))
            .wrap(Compress::default())
            .wrap(DefaultHeaders::new().add(("X-Content-Type-Options", "nosniff")))
            .app_data(app_data.clone())
            .app_data(json_config(64 * 1024))
            .app_data(query_config())
            .app_data(web::PayloadConfig::new(payload_limit))
            .service(health_routes())
            .service(api_v1_routes())
            // 以下两组在根路径上匹配，必须最后注册
            .configure(public_routes)
            .configure(redirect_routes)
    })
    .keep_alive(Duration::from_secs(30))
    .client_request_timeout(Duration::from_millis(5000))
    .client_disconnect_timeout(Duration::from_millis(1000))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);
    let server = server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown(storage) => {
            warn!("Graceful shutdown: all tasks completed");
        }
    }

    Ok(())
}

