use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::AuthConfig;

const ACCESS: &str = "access";
const REFRESH: &str = "refresh";

/// Session token claims; `sub` is the user's uid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
    pub token_type: String,
}

/// Issued token pair
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
}

/// JWT Service for generating and validating session tokens
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_minutes: u64,
    refresh_token_days: u64,
}

impl JwtService {
    pub fn new(secret: &str, access_token_minutes: u64, refresh_token_days: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_minutes,
            refresh_token_days,
        }
    }

    /// Create JwtService from the `[auth]` section
    pub fn from_config(auth: &AuthConfig) -> Self {
        // 未配置时生成随机 secret，重启后旧 token 全部失效
        let secret = if auth.jwt_secret.is_empty() {
            warn!("JWT secret not configured, generating a random one for this process");
            crate::utils::generate_secure_token(48)
        } else {
            auth.jwt_secret.clone()
        };

        Self::new(&secret, auth.access_token_minutes, auth.refresh_token_days)
    }

    pub fn access_token_minutes(&self) -> u64 {
        self.access_token_minutes
    }

    fn issue(
        &self,
        uid: &str,
        token_type: &str,
        ttl: Duration,
    ) -> jsonwebtoken::errors::Result<String> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: uid.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: token_type.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    pub fn generate_access_token(&self, uid: &str) -> jsonwebtoken::errors::Result<String> {
        self.issue(uid, ACCESS, Duration::minutes(self.access_token_minutes as i64))
    }

    pub fn generate_refresh_token(&self, uid: &str) -> jsonwebtoken::errors::Result<String> {
        self.issue(uid, REFRESH, Duration::days(self.refresh_token_days as i64))
    }

    pub fn generate_pair(&self, uid: &str) -> jsonwebtoken::errors::Result<TokenPair> {
        Ok(TokenPair {
            access_token: self.generate_access_token(uid)?,
            refresh_token: self.generate_refresh_token(uid)?,
            expires_in: self.access_token_minutes * 60,
        })
    }

    fn validate(
        &self,
        token: &str,
        expected: &str,
    ) -> jsonwebtoken::errors::Result<SessionClaims> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &Validation::default())?;

        if data.claims.token_type != expected {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }

        Ok(data.claims)
    }

    pub fn validate_access_token(
        &self,
        token: &str,
    ) -> jsonwebtoken::errors::Result<SessionClaims> {
        self.validate(token, ACCESS)
    }

    pub fn validate_refresh_token(
        &self,
        token: &str,
    ) -> jsonwebtoken::errors::Result<SessionClaims> {
        self.validate(token, REFRESH)
    }
}
