//! 公开页面数据与用户文件下载

use actix_web::http::StatusCode;
use actix_web::http::header::{
    CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_SECURITY_POLICY, CONTENT_TYPE,
};
use actix_web::{HttpResponse, Responder, web};
use tracing::debug;

use crate::services::AppContext;

use super::v1::ErrorCode;
use super::v1::helpers::{api_result_in, error_from_shrt, error_response};

/// `GET /user/{username}`
pub async fn public_profile(
    path: web::Path<String>,
    ctx: web::Data<AppContext>,
) -> impl Responder {
    let username = path.into_inner();
    debug!("Public page requested: {}", username);
    api_result_in(
        ctx.profiles.public_page(&username).await,
        ErrorCode::ProfileNotFound,
    )
}

/// 可以内联展示的类型，其余一律按附件下载
const INLINE_CONTENT_TYPES: &[&str] = &["image/png", "image/jpeg", "image/gif", "image/webp"];

/// 决定下载时的 Content-Type 与是否作为附件
pub fn served_content_type(stored: &str) -> (&str, bool) {
    if INLINE_CONTENT_TYPES.contains(&stored) {
        (stored, false)
    } else {
        ("application/octet-stream", true)
    }
}

/// `GET /files/users/{uid}/{path..}`
pub async fn download_file(
    path: web::Path<(String, String)>,
    ctx: web::Data<AppContext>,
) -> impl Responder {
    let (uid, rest) = path.into_inner();
    let object_path = format!("users/{}/{}", uid, rest);

    match ctx.profiles.objects().get(&object_path).await {
        Ok(Some((meta, data))) => {
            let (content_type, attachment) = served_content_type(&meta.content_type);
            let mut response = HttpResponse::Ok();
            response
                .insert_header((CONTENT_TYPE, content_type.to_string()))
                .insert_header((CONTENT_SECURITY_POLICY, "sandbox"))
                .insert_header((CACHE_CONTROL, "public, max-age=300"));
            if attachment {
                response.insert_header((CONTENT_DISPOSITION, "attachment"));
            }
            response.body(data)
        }
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            ErrorCode::FileNotFound,
            "File not found",
        ),
        Err(e) => {
            debug!("Object read failed for {}: {}", object_path, e);
            error_from_shrt(&e)
        }
    }
}

/// 公开路由：`/user/{username}` 与 `/files/users/...`
pub fn public_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/user/{username}", web::get().to(public_profile))
        .route("/files/users/{uid}/{path:.*}", web::get().to(download_file));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_images_served_inline() {
        assert_eq!(served_content_type("image/png"), ("image/png", false));
        assert_eq!(
            served_content_type("text/html"),
            ("application/octet-stream", true)
        );
        assert_eq!(
            served_content_type("image/svg+xml"),
            ("application/octet-stream", true)
        );
    }
}
