//! JSON API v1
//!
//! 所有响应使用 `{ code, message, data }` 信封。

pub mod auth;
pub mod error_code;
pub mod files;
pub mod helpers;
pub mod links;
pub mod listeners;
pub mod profile;
pub mod routes;
pub mod types;

pub use error_code::ErrorCode;
pub use routes::api_v1_routes;
pub use types::*;
