//! 认证相关端点

use actix_governor::{Governor, GovernorConfigBuilder, KeyExtractor, SimpleKeyExtractionError};
use actix_web::dev::ServiceRequest;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use governor::middleware::NoOpMiddleware;
use tracing::{debug, error, info};

use crate::api::constants::REFRESH_COOKIE_NAME;
use crate::api::extractors::CurrentUser;
use crate::errors::ShrtError;
use crate::services::{AppContext, AuthSession};

use super::error_code::ErrorCode;
use super::helpers::{CookieBuilder, api_result, error_from_shrt, json_response};
use super::types::{
    ChangeEmailRequest, ChangePasswordRequest, Credentials, MessageResponse, RefreshRequest,
    SessionResponse,
};

/// 按连接 IP 限流；拿不到 peer 地址时归入同一个桶
#[derive(Clone, Copy)]
pub struct LoginKeyExtractor;

impl KeyExtractor for LoginKeyExtractor {
    type Key = String;
    type KeyExtractionError = SimpleKeyExtractionError<&'static str>;

    fn extract(&self, req: &ServiceRequest) -> Result<Self::Key, Self::KeyExtractionError> {
        let key = req
            .connection_info()
            .peer_addr()
            .unwrap_or("unknown")
            .to_string();
        Ok(key)
    }
}

/// 登录 / 注册限流器
///
/// 每秒补充 1 个令牌，突发最多 5 次请求，超限返回 429
pub fn login_rate_limiter() -> Governor<LoginKeyExtractor, NoOpMiddleware> {
    let config = GovernorConfigBuilder::default()
        .seconds_per_request(1)
        .burst_size(5)
        .key_extractor(LoginKeyExtractor)
        .finish()
        .expect("Invalid rate limit config");

    debug!("Login rate limiter created: 1 req/s, burst 5");
    Governor::new(&config)
}

/// 写入 cookie 并返回 session
fn session_response(status: StatusCode, session: AuthSession) -> HttpResponse {
    let cookies = CookieBuilder::from_config();
    let access_cookie = cookies.build_access_cookie(session.tokens.access_token.clone());
    let refresh_cookie = cookies.build_refresh_cookie(session.tokens.refresh_token.clone());

    let mut response = json_response(
        status,
        ErrorCode::Success,
        "OK",
        Some(SessionResponse::from(session)),
    );
    for cookie in [access_cookie, refresh_cookie] {
        if let Err(e) = response.add_cookie(&cookie) {
            error!("Failed to set session cookie: {}", e);
        }
    }
    response
}

pub async fn sign_up(ctx: web::Data<AppContext>, body: web::Json<Credentials>) -> impl Responder {
    match ctx.auth.sign_up(&body.email, &body.password).await {
        Ok(session) => session_response(StatusCode::CREATED, session),
        Err(e) => error_from_shrt(&e),
    }
}

pub async fn sign_in(ctx: web::Data<AppContext>, body: web::Json<Credentials>) -> impl Responder {
    match ctx.auth.sign_in(&body.email, &body.password).await {
        Ok(session) => session_response(StatusCode::OK, session),
        Err(e) => error_from_shrt(&e),
    }
}

/// 用 refresh token 换新的一对 token（cookie 优先）
pub async fn refresh(
    req: HttpRequest,
    ctx: web::Data<AppContext>,
    body: Option<web::Json<RefreshRequest>>,
) -> impl Responder {
    let token = req
        .cookie(REFRESH_COOKIE_NAME)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
        .or_else(|| body.map(|b| b.into_inner().refresh_token));

    let Some(token) = token else {
        return error_from_shrt(&ShrtError::unauthorized("Refresh token missing"));
    };

    match ctx.auth.refresh(&token).await {
        Ok(session) => {
            debug!("Session refreshed for {}", session.account.uid);
            session_response(StatusCode::OK, session)
        }
        Err(e) => error_from_shrt(&e),
    }
}

/// 清除 cookie；token 本身无状态，到期自然失效
pub async fn sign_out(user: Option<CurrentUser>, ctx: web::Data<AppContext>) -> impl Responder {
    if let Some(user) = user {
        ctx.auth.sign_out(&user.uid);
    }

    let cookies = CookieBuilder::from_config();
    let mut response = json_response(
        StatusCode::OK,
        ErrorCode::Success,
        "OK",
        Some(MessageResponse {
            message: "Signed out".to_string(),
        }),
    );
    for cookie in [
        cookies.build_expired_access_cookie(),
        cookies.build_expired_refresh_cookie(),
    ] {
        if let Err(e) = response.add_cookie(&cookie) {
            error!("Failed to clear session cookie: {}", e);
        }
    }
    response
}

pub async fn session(user: CurrentUser, ctx: web::Data<AppContext>) -> impl Responder {
    api_result(ctx.auth.current_user(&user.uid).await)
}

pub async fn change_email(
    user: CurrentUser,
    ctx: web::Data<AppContext>,
    body: web::Json<ChangeEmailRequest>,
) -> impl Responder {
    api_result(ctx.auth.change_email(&user.uid, &body.email).await)
}

pub async fn change_password(
    user: CurrentUser,
    ctx: web::Data<AppContext>,
    body: web::Json<ChangePasswordRequest>,
) -> impl Responder {
    let result = ctx
        .auth
        .change_password(&user.uid, &body.current_password, &body.new_password)
        .await
        .map(|()| {
            info!("Password changed via API for {}", user.uid);
            MessageResponse {
                message: "Password updated".to_string(),
            }
        });
    api_result(result)
}
