//! API 模块常量定义

/// Access Token Cookie 名称
pub const ACCESS_COOKIE_NAME: &str = "shrt_access";

/// Refresh Token Cookie 名称
pub const REFRESH_COOKIE_NAME: &str = "shrt_refresh";

/// Refresh cookie 只在认证路由下发送
pub const AUTH_COOKIE_PATH: &str = "/api/v1/auth";
