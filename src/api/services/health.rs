use std::time::{Duration, Instant};

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use tracing::{error, info, trace};

use crate::services::AppContext;

use super::v1::{ApiResponse, ErrorCode};

#[derive(Debug, Serialize)]
pub struct HealthStorageCheck {
    pub status: String,
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime: u64,
    pub storage: HealthStorageCheck,
    pub listeners: usize,
    pub response_time_ms: u64,
}

/// Health Service
///
/// 直接 ping 数据库，不经过业务层。
pub struct HealthService;

impl HealthService {
    async fn check_storage(ctx: &AppContext) -> HealthStorageCheck {
        let backend = ctx.storage.backend_name().to_string();
        match tokio::time::timeout(Duration::from_secs(5), ctx.storage.ping()).await {
            Ok(Ok(())) => HealthStorageCheck {
                status: "healthy".to_string(),
                backend,
                error: None,
            },
            Ok(Err(e)) => {
                error!("Storage health check failed: {}", e);
                HealthStorageCheck {
                    status: "unhealthy".to_string(),
                    backend,
                    error: Some(e.message().to_string()),
                }
            }
            Err(_) => {
                error!("Storage health check timeout");
                HealthStorageCheck {
                    status: "unhealthy".to_string(),
                    backend,
                    error: Some("timeout".to_string()),
                }
            }
        }
    }

    pub async fn health_check(ctx: web::Data<AppContext>) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received health check request");

        let storage = Self::check_storage(&ctx).await;
        let is_healthy = storage.status == "healthy";
        let now = chrono::Utc::now();

        let health = HealthResponse {
            status: storage.status.clone(),
            timestamp: now.to_rfc3339(),
            uptime: (now - ctx.started_at).num_seconds().max(0) as u64,
            storage,
            listeners: ctx.events.subscriber_count(),
            response_time_ms: start_time.elapsed().as_millis() as u64,
        };

        info!(
            "Health check completed in {:?}, status: {}",
            start_time.elapsed(),
            health.status
        );

        let (status, code, message) = if is_healthy {
            (StatusCode::OK, ErrorCode::Success, "OK")
        } else {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::ServiceUnavailable,
                "Service Unavailable",
            )
        };

        HttpResponse::build(status).json(ApiResponse {
            code: code as i32,
            message: message.to_string(),
            data: Some(health),
        })
    }

    /// 就绪检查：数据库可用才返回 200
    pub async fn readiness_check(ctx: web::Data<AppContext>) -> impl Responder {
        trace!("Received readiness check request");

        match ctx.storage.ping().await {
            Ok(()) => HttpResponse::Ok().content_type("text/plain").body("OK"),
            Err(e) => {
                error!("Readiness check failed: {}", e);
                HttpResponse::ServiceUnavailable()
                    .content_type("text/plain")
                    .body("Not Ready")
            }
        }
    }

    // 活跃性检查，进程在即可
    pub async fn liveness_check() -> impl Responder {
        trace!("Received liveness check request");
        HttpResponse::NoContent().finish()
    }
}

/// Health 路由 `/health`
pub fn health_routes() -> actix_web::Scope {
    web::scope("/health")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
        .route("/ready", web::get().to(HealthService::readiness_check))
        .route("/ready", web::head().to(HealthService::readiness_check))
        .route("/live", web::get().to(HealthService::liveness_check))
        .route("/live", web::head().to(HealthService::liveness_check))
}
