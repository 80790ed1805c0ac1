//! API v1 类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::{AccountInfo, AuthSession};
use crate::storage::{PlpLink, ShortLink, UserProfile};

/// 统一响应信封；`code` 为 [`super::ErrorCode`]
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// 非浏览器客户端可以在 body 中提交 refresh token
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ChangeEmailRequest {
    pub email: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Body of `POST /api/v1/links`
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PostNewLink {
    pub url: String,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct LinksQuery {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MessageResponse {
    pub message: String,
}

/// Session returned by sign-up / sign-in / refresh
///
/// Tokens are also set as HttpOnly cookies; the body copy is for bearer clients.
#[derive(Serialize, Clone, Debug)]
pub struct SessionResponse {
    pub user: AccountInfo,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
}

impl From<AuthSession> for SessionResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            user: session.account,
            access_token: session.tokens.access_token,
            refresh_token: session.tokens.refresh_token,
            expires_in: session.tokens.expires_in,
        }
    }
}

/// 对外展示的短链接，附带完整 short_url
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LinkView {
    pub code: String,
    pub destination_url: String,
    pub short_url: String,
    pub owner_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub archived: bool,
    pub clicks: u64,
}

impl LinkView {
    pub fn new(link: ShortLink, short_url: String) -> Self {
        Self {
            code: link.code,
            destination_url: link.destination_url,
            short_url,
            owner_id: link.owner_id,
            created_at: link.created_at,
            archived: link.archived,
            clicks: link.clicks,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CreatedLink {
    #[serde(flatten)]
    pub link: LinkView,
    pub generated_code: bool,
}

/// 一次 SSE 推送的完整快照
#[derive(Serialize, Clone, Debug)]
pub struct ListenerSnapshot {
    pub profile: UserProfile,
    pub links: Vec<LinkView>,
    pub plp: Vec<PlpLink>,
}
