//! 会话提取器
//!
//! 依次尝试 `Authorization: Bearer` 头和 access cookie。
//! 允许匿名访问的 handler 用 `OptionalUser`：没带凭证时为 `None`，
//! 带了但无效时仍然 401。

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::api::constants::ACCESS_COOKIE_NAME;
use crate::errors::ShrtError;
use crate::services::AppContext;

/// 已认证的调用方
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub uid: String,
}

/// 取请求中携带的 access token
pub fn access_token_from(req: &HttpRequest) -> Option<String> {
    let bearer = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    match bearer {
        Some(token) => Some(token.to_string()),
        None => req
            .cookie(ACCESS_COOKIE_NAME)
            .map(|c| c.value().to_string())
            .filter(|t| !t.is_empty()),
    }
}

fn authenticate(req: &HttpRequest) -> Result<CurrentUser, ShrtError> {
    let ctx = req
        .app_data::<web::Data<AppContext>>()
        .ok_or_else(|| ShrtError::internal("Application context not configured"))?;

    let token = access_token_from(req).ok_or_else(|| ShrtError::unauthorized("Not signed in"))?;

    match ctx.auth.authenticate(&token) {
        Ok(uid) => Ok(CurrentUser { uid }),
        Err(e) => {
            debug!("Rejected access token: {}", e);
            Err(ShrtError::token("Invalid or expired session"))
        }
    }
}

impl FromRequest for CurrentUser {
    type Error = ShrtError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

/// 可选登录：只有完全没带 token 才算匿名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionalUser(pub Option<CurrentUser>);

impl FromRequest for OptionalUser {
    type Error = ShrtError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        if access_token_from(req).is_none() {
            return ready(Ok(OptionalUser(None)));
        }
        ready(authenticate(req).map(|user| OptionalUser(Some(user))))
    }
}
