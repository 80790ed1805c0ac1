//! URL 验证模块
//!
//! 阻止危险协议，只接受 http(s) 且带有 `name.tld` 形式主机名的地址

use url::{Host, Url};

/// URL 验证错误
#[derive(Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    InvalidProtocol(String),
    DangerousProtocol(String),
    InvalidHost(String),
    InvalidFormat(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::InvalidProtocol(proto) => write!(
                f,
                "Invalid protocol: {}. Only http:// and https:// are allowed",
                proto
            ),
            Self::DangerousProtocol(proto) => {
                write!(f, "Dangerous protocol blocked: {}", proto)
            }
            Self::InvalidHost(host) => write!(f, "Invalid host: {}", host),
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// 危险协议列表
const DANGEROUS_PROTOCOLS: &[&str] = &[
    "javascript:",
    "data:",
    "file:",
    "vbscript:",
    "about:",
    "blob:",
];

/// 主机名（不含 TLD）最大长度
const MAX_HOST_NAME_LEN: usize = 256;

/// 验证目标 URL
///
/// 检查项目：
/// 1. URL 不为空
/// 2. 不是危险协议（javascript:, data:, file: 等）
/// 3. 必须是 http:// 或 https://
/// 4. 能被解析，且主机形如 `name.tld`（TLD 1-6 位字母数字）或 IPv4
pub fn validate_url(url: &str) -> Result<(), UrlValidationError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    let url_lower = url.to_lowercase();

    for proto in DANGEROUS_PROTOCOLS {
        if url_lower.starts_with(proto) {
            return Err(UrlValidationError::DangerousProtocol(proto.to_string()));
        }
    }

    if !url_lower.starts_with("http://") && !url_lower.starts_with("https://") {
        let proto = url_lower
            .split(':')
            .next()
            .map(|s| format!("{}:", s))
            .unwrap_or_default();
        return Err(UrlValidationError::InvalidProtocol(proto));
    }

    let parsed = Url::parse(url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match parsed.host() {
        Some(Host::Domain(domain)) if is_valid_domain(domain) => Ok(()),
        Some(Host::Ipv4(_)) => Ok(()),
        Some(other) => Err(UrlValidationError::InvalidHost(other.to_string())),
        None => Err(UrlValidationError::InvalidHost(String::new())),
    }
}

fn is_valid_domain(domain: &str) -> bool {
    let Some((name, tld)) = domain.rsplit_once('.') else {
        return false;
    };

    !name.is_empty()
        && name.len() <= MAX_HOST_NAME_LEN
        && (1..=6).contains(&tld.len())
        && tld.chars().all(|c| c.is_ascii_alphanumeric())
}

/// 获取 URL 验证错误的用户友好消息
pub fn validation_error_message(error: &UrlValidationError) -> &'static str {
    match error {
        UrlValidationError::EmptyUrl => "URL cannot be empty",
        UrlValidationError::InvalidProtocol(_) => "URL must start with http:// or https://",
        UrlValidationError::DangerousProtocol(_) => "This URL protocol is not allowed",
        UrlValidationError::InvalidHost(_) => "URL must point to a domain such as example.com",
        UrlValidationError::InvalidFormat(_) => "Invalid URL format",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_urls() {
        assert!(validate_url("http://example.com").is_ok());
        assert!(validate_url("https://www.example.com").is_ok());
        assert!(validate_url("https://example.com/page").is_ok());
        assert!(validate_url("https://example.com/path?query=1&x=y#frag").is_ok());
        assert!(validate_url("https://sub.domain.example.co.uk/a/b").is_ok());
        assert!(validate_url("http://127.0.0.1:8080/x").is_ok());
    }

    #[test]
    fn test_hosts_without_tld_rejected() {
        assert!(matches!(
            validate_url("http://localhost:8080"),
            Err(UrlValidationError::InvalidHost(_))
        ));
        assert!(matches!(
            validate_url("https://example.toolongtld"),
            Err(UrlValidationError::InvalidHost(_))
        ));
        assert!(matches!(
            validate_url("http://[::1]/"),
            Err(UrlValidationError::InvalidHost(_))
        ));
    }

    #[test]
    fn test_dangerous_protocols() {
        assert!(matches!(
            validate_url("javascript:alert(1)"),
            Err(UrlValidationError::DangerousProtocol(_))
        ));
        assert!(matches!(
            validate_url("data:text/html,<script>alert(1)</script>"),
            Err(UrlValidationError::DangerousProtocol(_))
        ));
        assert!(matches!(
            validate_url("file:///etc/passwd"),
            Err(UrlValidationError::DangerousProtocol(_))
        ));
    }

    #[test]
    fn test_invalid_protocols() {
        assert!(matches!(
            validate_url("ftp://example.com"),
            Err(UrlValidationError::InvalidProtocol(_))
        ));
        assert!(matches!(
            validate_url("example.com"),
            Err(UrlValidationError::InvalidProtocol(_))
        ));
    }

    #[test]
    fn test_empty_url() {
        assert_eq!(validate_url(""), Err(UrlValidationError::EmptyUrl));
        assert_eq!(validate_url("   "), Err(UrlValidationError::EmptyUrl));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(matches!(
            validate_url("JAVASCRIPT:alert(1)"),
            Err(UrlValidationError::DangerousProtocol(_))
        ));
        assert!(validate_url("HTTPS://Example.COM").is_ok());
    }
}
