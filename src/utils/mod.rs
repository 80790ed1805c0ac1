pub mod password;
pub mod url_validator;

/// URL 安全字符表（与常见 nanoid 字母表一致）
const URL_SAFE_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// 自定义短码长度范围
pub const SHORT_CODE_MIN_LEN: usize = 2;
pub const SHORT_CODE_MAX_LEN: usize = 30;

/// 生成随机短码
pub fn generate_random_code(length: usize) -> String {
    std::iter::repeat_with(|| {
        URL_SAFE_ALPHABET[rand::random_range(0..URL_SAFE_ALPHABET.len())] as char
    })
    .take(length)
    .collect()
}

/// 生成随机 token（仅字母数字，用于 JWT secret 等）
pub fn generate_secure_token(length: usize) -> String {
    // 去掉末尾的 `_` 和 `-`
    let alnum = &URL_SAFE_ALPHABET[..62];
    std::iter::repeat_with(|| alnum[rand::random_range(0..alnum.len())] as char)
        .take(length)
        .collect()
}

/// 短码格式校验：`[A-Za-z0-9_-]{2,30}`
pub fn is_valid_short_code(code: &str) -> bool {
    (SHORT_CODE_MIN_LEN..=SHORT_CODE_MAX_LEN).contains(&code.len())
        && code
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// 用户名格式校验：`[A-Za-z0-9_.-]{2,30}`，可直接出现在 `/user/{username}` 路径中
pub fn is_valid_username(username: &str) -> bool {
    (2..=30).contains(&username.len())
        && username
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'-'))
        && !username.starts_with('.')
}

/// 拼接对外展示的短链接
pub fn build_short_url(base_url: &str, code: &str) -> String {
    if base_url.ends_with('/') {
        format!("{}{}", base_url, code)
    } else {
        format!("{}/{}", base_url, code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_random_code_length_and_alphabet() {
        for len in [2, 6, 30] {
            let code = generate_random_code(len);
            assert_eq!(code.len(), len);
            assert!(is_valid_short_code(&code));
        }
    }

    #[test]
    fn test_generate_secure_token_alnum() {
        let token = generate_secure_token(32);
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_short_code_boundaries() {
        assert!(!is_valid_short_code("a"));
        assert!(is_valid_short_code("ab"));
        assert!(is_valid_short_code(&"a".repeat(30)));
        assert!(!is_valid_short_code(&"a".repeat(31)));
        assert!(is_valid_short_code("my_link-01"));
        assert!(!is_valid_short_code("has space"));
        assert!(!is_valid_short_code("path/segment"));
        assert!(!is_valid_short_code("ünï"));
    }

    #[test]
    fn test_username_rules() {
        assert!(is_valid_username("jane.doe"));
        assert!(!is_valid_username(".hidden"));
        assert!(!is_valid_username("a/b"));
        assert!(!is_valid_username("x"));
    }

    #[test]
    fn test_build_short_url() {
        assert_eq!(build_short_url("https://s.io/", "abc"), "https://s.io/abc");
        assert_eq!(build_short_url("https://s.io", "abc"), "https://s.io/abc");
    }
}
