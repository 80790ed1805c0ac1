use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use tracing::{debug, error, trace};

use crate::errors::ShrtError;
use crate::services::AppContext;
use crate::utils::is_valid_short_code;

pub struct RedirectService {}

impl RedirectService {
    /// `GET /{code}` and `GET /api/{code}`
    pub async fn handle_redirect(
        path: web::Path<String>,
        ctx: web::Data<AppContext>,
    ) -> impl Responder {
        let code = path.into_inner();

        // 非法短码直接 404，不查库
        if !is_valid_short_code(&code) {
            trace!("Invalid short code rejected: {}", code);
            return Self::not_found_response();
        }

        match ctx.links.resolve_and_record(&code).await {
            Ok(link) => {
                debug!("Redirecting {} -> {}", code, link.destination_url);
                HttpResponse::MovedPermanently()
                    .insert_header(("Location", link.destination_url))
                    .finish()
            }
            Err(ShrtError::NotFound(_)) => {
                debug!("Redirect link not found: {}", code);
                Self::not_found_response()
            }
            Err(e) => {
                error!("Storage error during redirect lookup: {}", e);
                Self::error_response(&e)
            }
        }
    }

    /// `GET /`：有配置则跳到首页，否则 404
    pub async fn handle_root(ctx: web::Data<AppContext>) -> impl Responder {
        match ctx.links.settings().home_url.as_deref() {
            Some(home) if !home.is_empty() => HttpResponse::TemporaryRedirect()
                .insert_header(("Location", home))
                .finish(),
            _ => Self::not_found_response(),
        }
    }

    fn not_found_response() -> HttpResponse {
        HttpResponse::build(StatusCode::NOT_FOUND)
            .insert_header(("Cache-Control", "public, max-age=60"))
            .json(json!({ "code": 404, "message": "Link not found" }))
    }

    fn error_response(err: &ShrtError) -> HttpResponse {
        let status = err.http_status();
        HttpResponse::build(status).json(json!({
            "code": status.as_u16(),
            "message": status.canonical_reason().unwrap_or("Error"),
        }))
    }
}

/// 顶层跳转路由，必须最后注册
pub fn redirect_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(RedirectService::handle_root))
        .route("/api/{code}", web::get().to(RedirectService::handle_redirect))
        .route("/{code}", web::get().to(RedirectService::handle_redirect));
}
