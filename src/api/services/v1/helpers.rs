//! API v1 帮助函数

use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use tracing::error;

use crate::api::constants;
use crate::config::{AuthConfig, SameSitePolicy};
use crate::errors::ShrtError;

use super::error_code::ErrorCode;
use super::types::ApiResponse;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

pub fn created_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::CREATED, ErrorCode::Success, "Created", Some(data))
}

/// 构建错误响应
pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// 从 ShrtError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
pub fn error_from_shrt(err: &ShrtError) -> HttpResponse {
    if !err.is_client_error() {
        error!("API error: {}", err);
    }
    error_response(err.http_status(), ErrorCode::from(err), err.message())
}

/// 统一 Result → HttpResponse 转换
///
/// 成功时返回 200 OK + JSON 数据，失败时自动映射 ShrtError。
pub fn api_result<T: Serialize>(result: crate::errors::Result<T>) -> HttpResponse {
    match result {
        Ok(data) => success_response(data),
        Err(e) => error_from_shrt(&e),
    }
}

/// 同 [`api_result`]，但 NotFound 使用调用方给定的领域错误码
pub fn api_result_in<T: Serialize>(
    result: crate::errors::Result<T>,
    not_found: ErrorCode,
) -> HttpResponse {
    match result {
        Ok(data) => success_response(data),
        Err(e @ ShrtError::NotFound(_)) => {
            error_response(StatusCode::NOT_FOUND, not_found, e.message())
        }
        Err(e) => error_from_shrt(&e),
    }
}

/// 让 handler 和 extractor 可以直接用 `?` 返回 ShrtError
impl ResponseError for ShrtError {
    fn status_code(&self) -> StatusCode {
        self.http_status()
    }

    fn error_response(&self) -> HttpResponse {
        error_from_shrt(self)
    }
}

/// Cookie 构建器
pub struct CookieBuilder {
    same_site: SameSite,
    secure: bool,
    domain: Option<String>,
    access_token_minutes: u64,
    refresh_token_days: u64,
}

impl CookieBuilder {
    pub fn new(auth: &AuthConfig) -> Self {
        let same_site = match auth.cookie_same_site {
            SameSitePolicy::Strict => SameSite::Strict,
            SameSitePolicy::None => SameSite::None,
            SameSitePolicy::Lax => SameSite::Lax,
        };

        Self {
            same_site,
            secure: auth.cookie_secure,
            domain: auth.cookie_domain.clone(),
            access_token_minutes: auth.access_token_minutes,
            refresh_token_days: auth.refresh_token_days,
        }
    }

    pub fn from_config() -> Self {
        Self::new(&crate::config::get_config().auth)
    }

    fn build_cookie_base(
        &self,
        name: &str,
        value: String,
        path: &str,
        max_age: actix_web::cookie::time::Duration,
    ) -> Cookie<'static> {
        let mut cookie = Cookie::new(name.to_string(), value);
        cookie.set_path(path.to_string());
        cookie.set_http_only(true);
        cookie.set_secure(self.secure);
        cookie.set_same_site(self.same_site);
        cookie.set_max_age(max_age);
        if let Some(ref domain) = self.domain {
            cookie.set_domain(domain.clone());
        }
        cookie
    }

    pub fn build_access_cookie(&self, token: String) -> Cookie<'static> {
        self.build_cookie_base(
            constants::ACCESS_COOKIE_NAME,
            token,
            "/",
            actix_web::cookie::time::Duration::minutes(self.access_token_minutes as i64),
        )
    }

    pub fn build_refresh_cookie(&self, token: String) -> Cookie<'static> {
        self.build_cookie_base(
            constants::REFRESH_COOKIE_NAME,
            token,
            constants::AUTH_COOKIE_PATH,
            actix_web::cookie::time::Duration::days(self.refresh_token_days as i64),
        )
    }

    pub fn build_expired_access_cookie(&self) -> Cookie<'static> {
        self.build_cookie_base(
            constants::ACCESS_COOKIE_NAME,
            String::new(),
            "/",
            actix_web::cookie::time::Duration::ZERO,
        )
    }

    pub fn build_expired_refresh_cookie(&self) -> Cookie<'static> {
        self.build_cookie_base(
            constants::REFRESH_COOKIE_NAME,
            String::new(),
            constants::AUTH_COOKIE_PATH,
            actix_web::cookie::time::Duration::ZERO,
        )
    }
}
