use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum ShrtError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
    PayloadTooLarge(String),
    Serialization(String),
    Token(String),
    Internal(String),
}

impl ShrtError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ShrtError::DatabaseConfig(_) => "E001",
            ShrtError::DatabaseConnection(_) => "E002",
            ShrtError::DatabaseOperation(_) => "E003",
            ShrtError::FileOperation(_) => "E004",
            ShrtError::Validation(_) => "E005",
            ShrtError::NotFound(_) => "E006",
            ShrtError::Conflict(_) => "E007",
            ShrtError::Unauthorized(_) => "E008",
            ShrtError::Forbidden(_) => "E009",
            ShrtError::PayloadTooLarge(_) => "E010",
            ShrtError::Serialization(_) => "E011",
            ShrtError::Token(_) => "E012",
            ShrtError::Internal(_) => "E013",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ShrtError::DatabaseConfig(_) => "Database Configuration Error",
            ShrtError::DatabaseConnection(_) => "Database Connection Error",
            ShrtError::DatabaseOperation(_) => "Database Operation Error",
            ShrtError::FileOperation(_) => "File Operation Error",
            ShrtError::Validation(_) => "Validation Error",
            ShrtError::NotFound(_) => "Resource Not Found",
            ShrtError::Conflict(_) => "Resource Conflict",
            ShrtError::Unauthorized(_) => "Unauthorized",
            ShrtError::Forbidden(_) => "Forbidden",
            ShrtError::PayloadTooLarge(_) => "Payload Too Large",
            ShrtError::Serialization(_) => "Serialization Error",
            ShrtError::Token(_) => "Token Error",
            ShrtError::Internal(_) => "Internal Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ShrtError::DatabaseConfig(msg)
            | ShrtError::DatabaseConnection(msg)
            | ShrtError::DatabaseOperation(msg)
            | ShrtError::FileOperation(msg)
            | ShrtError::Validation(msg)
            | ShrtError::NotFound(msg)
            | ShrtError::Conflict(msg)
            | ShrtError::Unauthorized(msg)
            | ShrtError::Forbidden(msg)
            | ShrtError::PayloadTooLarge(msg)
            | ShrtError::Serialization(msg)
            | ShrtError::Token(msg)
            | ShrtError::Internal(msg) => msg,
        }
    }

    /// 对应的 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            ShrtError::Validation(_) | ShrtError::Serialization(_) => StatusCode::BAD_REQUEST,
            ShrtError::NotFound(_) => StatusCode::NOT_FOUND,
            ShrtError::Conflict(_) => StatusCode::CONFLICT,
            ShrtError::Unauthorized(_) | ShrtError::Token(_) => StatusCode::UNAUTHORIZED,
            ShrtError::Forbidden(_) => StatusCode::FORBIDDEN,
            ShrtError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ShrtError::DatabaseConnection(_) => StatusCode::SERVICE_UNAVAILABLE,
            ShrtError::DatabaseConfig(_)
            | ShrtError::DatabaseOperation(_)
            | ShrtError::FileOperation(_)
            | ShrtError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 是否应该把详情暴露给客户端
    pub fn is_client_error(&self) -> bool {
        self.http_status().is_client_error()
    }

    /// 格式化为彩色输出（用于 Server 模式）
    #[cfg(feature = "server")]
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ShrtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ShrtError {}

// 便捷的构造函数
impl ShrtError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        ShrtError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        ShrtError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        ShrtError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        ShrtError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        ShrtError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        ShrtError::NotFound(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        ShrtError::Conflict(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        ShrtError::Unauthorized(msg.into())
    }

    pub fn forbidden<T: Into<String>>(msg: T) -> Self {
        ShrtError::Forbidden(msg.into())
    }

    pub fn payload_too_large<T: Into<String>>(msg: T) -> Self {
        ShrtError::PayloadTooLarge(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        ShrtError::Serialization(msg.into())
    }

    pub fn token<T: Into<String>>(msg: T) -> Self {
        ShrtError::Token(msg.into())
    }

    pub fn internal<T: Into<String>>(msg: T) -> Self {
        ShrtError::Internal(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for ShrtError {
    fn from(err: sea_orm::DbErr) -> Self {
        ShrtError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for ShrtError {
    fn from(err: std::io::Error) -> Self {
        ShrtError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for ShrtError {
    fn from(err: serde_json::Error) -> Self {
        ShrtError::Serialization(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for ShrtError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        ShrtError::Token(err.to_string())
    }
}

impl From<crate::utils::password::PasswordError> for ShrtError {
    fn from(err: crate::utils::password::PasswordError) -> Self {
        ShrtError::Internal(err.to_string())
    }
}

impl From<crate::utils::url_validator::UrlValidationError> for ShrtError {
    fn from(err: crate::utils::url_validator::UrlValidationError) -> Self {
        ShrtError::Validation(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShrtError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            ShrtError::validation("x").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ShrtError::not_found("x").http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ShrtError::conflict("x").http_status(), StatusCode::CONFLICT);
        assert_eq!(
            ShrtError::token("x").http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ShrtError::database_operation("x").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_format_simple() {
        let err = ShrtError::not_found("Link not found");
        assert_eq!(err.format_simple(), "Resource Not Found: Link not found");
        assert_eq!(err.to_string(), err.format_simple());
    }

    #[test]
    fn test_client_error_flag() {
        assert!(ShrtError::forbidden("nope").is_client_error());
        assert!(!ShrtError::internal("boom").is_client_error());
    }

    #[test]
    fn test_from_db_err() {
        let err: ShrtError = sea_orm::DbErr::Custom("boom".into()).into();
        assert!(matches!(err, ShrtError::DatabaseOperation(_)));
    }
}
