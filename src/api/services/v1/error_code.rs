//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::ShrtError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字。按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 认证错误
/// - 3000-3099: 短链接错误
/// - 4000-4099: 资料 / PLP 错误
/// - 5000-5099: 文件错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    Conflict = 1009,
    ServiceUnavailable = 1030,

    // 认证错误 2000-2099
    AuthFailed = 2000,
    TokenInvalid = 2002,

    // 短链接错误 3000-3099
    LinkNotFound = 3000,

    // 资料 / PLP 错误 4000-4099
    ProfileNotFound = 4000,
    PlpLinkNotFound = 4003,

    // 文件错误 5000-5099
    FileTooLarge = 5000,
    InvalidMultipartData = 5001,
    FileNotFound = 5003,
}

impl From<&ShrtError> for ErrorCode {
    fn from(err: &ShrtError) -> Self {
        match err {
            ShrtError::Validation(_) | ShrtError::Serialization(_) => ErrorCode::BadRequest,
            ShrtError::NotFound(_) => ErrorCode::NotFound,
            ShrtError::Conflict(_) => ErrorCode::Conflict,
            ShrtError::Unauthorized(_) => ErrorCode::AuthFailed,
            ShrtError::Token(_) => ErrorCode::TokenInvalid,
            ShrtError::Forbidden(_) => ErrorCode::Forbidden,
            ShrtError::PayloadTooLarge(_) => ErrorCode::FileTooLarge,
            ShrtError::DatabaseConnection(_) => ErrorCode::ServiceUnavailable,
            ShrtError::DatabaseConfig(_)
            | ShrtError::DatabaseOperation(_)
            | ShrtError::FileOperation(_)
            | ShrtError::Internal(_) => ErrorCode::InternalServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::Success).unwrap(), "0");
        assert_eq!(serde_json::to_string(&ErrorCode::LinkNotFound).unwrap(), "3000");
    }

    #[test]
    fn test_from_error() {
        assert_eq!(
            ErrorCode::from(&ShrtError::conflict("dup")),
            ErrorCode::Conflict
        );
        assert_eq!(
            ErrorCode::from(&ShrtError::token("bad")),
            ErrorCode::TokenInvalid
        );
    }
}
