//! API v1 路由配置

use actix_web::web;

use super::auth::{
    change_email, change_password, login_rate_limiter, refresh, session, sign_in, sign_out,
    sign_up,
};
use super::files::upload_file;
use super::links::{archive_link, get_link, link_stats, list_links, post_link};
use super::listeners::stream;
use super::profile::{
    add_plp_link, archive_plp_link, get_profile, list_plp_links, update_plp_link, update_profile,
};

/// 认证路由 `/auth`
///
/// - POST /auth/sign-up, /auth/sign-in（带限流）
/// - POST /auth/refresh, /auth/sign-out
/// - GET /auth/session
/// - PUT /auth/email, /auth/password
pub fn auth_routes() -> actix_web::Scope {
    web::scope("/auth")
        .route("/sign-up", web::post().to(sign_up).wrap(login_rate_limiter()))
        .route("/sign-in", web::post().to(sign_in).wrap(login_rate_limiter()))
        .route("/refresh", web::post().to(refresh))
        .route("/sign-out", web::post().to(sign_out))
        .route("/session", web::get().to(session))
        .route("/email", web::put().to(change_email))
        .route("/password", web::put().to(change_password))
}

/// 短链接路由 `/links`
pub fn links_routes() -> actix_web::Scope {
    web::scope("/links")
        .route("", web::get().to(list_links))
        .route("", web::post().to(post_link))
        // stats 必须在 /{code} 之前
        .route("/stats", web::get().to(link_stats))
        .route("/{code}/archive", web::post().to(archive_link))
        .route("/{code}", web::get().to(get_link))
}

/// 当前用户路由 `/me`
pub fn me_routes() -> actix_web::Scope {
    web::scope("/me")
        .route("/profile", web::get().to(get_profile))
        .route("/profile", web::patch().to(update_profile))
        .route("/plp", web::get().to(list_plp_links))
        .route("/plp", web::post().to(add_plp_link))
        .route("/plp/{id}", web::patch().to(update_plp_link))
        .route("/plp/{id}/archive", web::post().to(archive_plp_link))
        .route("/files/{name}", web::put().to(upload_file))
        .route("/stream", web::get().to(stream))
}

/// `/api/v1`
pub fn api_v1_routes() -> actix_web::Scope {
    web::scope("/api/v1")
        .service(auth_routes())
        .service(links_routes())
        .service(me_routes())
}
