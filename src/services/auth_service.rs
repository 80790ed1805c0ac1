//! Authentication service
//!
//! Email + password accounts with argon2 hashes. Sessions are stateless JWT
//! pairs; signing out clears the cookies and tells the user's listeners.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::events::{ChangeEvent, ChangeFeed};
use crate::api::jwt::{JwtService, TokenPair};
use crate::errors::{Result, ShrtError};
use crate::storage::{SeaOrmStorage, UserAccount};
use crate::utils::password::{check_new_password, hash_password, verify_password};

/// Public view of an account
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AccountInfo {
    pub uid: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&UserAccount> for AccountInfo {
    fn from(account: &UserAccount) -> Self {
        Self {
            uid: account.uid.clone(),
            email: account.email.clone(),
            created_at: account.created_at,
        }
    }
}

/// A freshly issued session
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub account: AccountInfo,
    pub tokens: TokenPair,
}

/// 统一小写、去空白，并做最基本的格式检查
pub fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid || email.chars().any(char::is_whitespace) {
        return Err(ShrtError::validation("Invalid email address"));
    }
    Ok(email)
}

pub struct AuthService {
    storage: Arc<SeaOrmStorage>,
    events: ChangeFeed,
    jwt: Arc<JwtService>,
    min_password_length: usize,
}

impl AuthService {
    pub fn new(
        storage: Arc<SeaOrmStorage>,
        events: ChangeFeed,
        jwt: Arc<JwtService>,
        min_password_length: usize,
    ) -> Self {
        Self {
            storage,
            events,
            jwt,
            min_password_length,
        }
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    fn open_session(&self, account: &UserAccount) -> Result<AuthSession> {
        let tokens = self.jwt.generate_pair(&account.uid)?;
        Ok(AuthSession {
            account: AccountInfo::from(account),
            tokens,
        })
    }

    /// Register and sign in
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession> {
        let email = normalize_email(email)?;
        check_new_password(password, self.min_password_length).map_err(ShrtError::validation)?;

        let account = UserAccount {
            uid: uuid::Uuid::new_v4().to_string(),
            email,
            password_hash: hash_password(password)?,
            created_at: Utc::now(),
        };
        self.storage.create_user(&account).await?;

        info!("AuthService: signed up {}", account.uid);
        self.events.publish(ChangeEvent::SessionChanged {
            uid: account.uid.clone(),
        });
        self.open_session(&account)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession> {
        // 邮箱或密码错误统一返回同一条消息
        let invalid = || ShrtError::unauthorized("Invalid email or password");

        let email = normalize_email(email).map_err(|_| invalid())?;
        let account = self
            .storage
            .find_account_by_email(&email)
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(password, &account.password_hash)? {
            warn!("AuthService: failed sign-in for {}", account.uid);
            return Err(invalid());
        }

        info!("AuthService: signed in {}", account.uid);
        self.events.publish(ChangeEvent::SessionChanged {
            uid: account.uid.clone(),
        });
        self.open_session(&account)
    }

    /// Exchange a refresh token for a new pair (sliding expiration)
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthSession> {
        let claims = self.jwt.validate_refresh_token(refresh_token)?;
        let account = self
            .storage
            .find_account_by_uid(&claims.sub)
            .await?
            .ok_or_else(|| ShrtError::unauthorized("Account no longer exists"))?;

        self.open_session(&account)
    }

    pub fn sign_out(&self, uid: &str) {
        info!("AuthService: signed out {}", uid);
        self.events.publish(ChangeEvent::SessionChanged {
            uid: uid.to_string(),
        });
    }

    /// Validate an access token and return the uid it was issued to
    pub fn authenticate(&self, access_token: &str) -> Result<String> {
        Ok(self.jwt.validate_access_token(access_token)?.sub)
    }

    pub async fn current_user(&self, uid: &str) -> Result<AccountInfo> {
        self.storage
            .find_account_by_uid(uid)
            .await?
            .as_ref()
            .map(AccountInfo::from)
            .ok_or_else(|| ShrtError::unauthorized("Account no longer exists"))
    }

    pub async fn change_email(&self, uid: &str, new_email: &str) -> Result<AccountInfo> {
        let email = normalize_email(new_email)?;
        self.storage.update_email(uid, &email).await?;

        info!("AuthService: email changed for {}", uid);
        self.events.publish(ChangeEvent::ProfileChanged {
            uid: uid.to_string(),
        });
        self.current_user(uid).await
    }

    pub async fn change_password(
        &self,
        uid: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<()> {
        let account = self
            .storage
            .find_account_by_uid(uid)
            .await?
            .ok_or_else(|| ShrtError::unauthorized("Account no longer exists"))?;

        if !verify_password(current_password, &account.password_hash)? {
            return Err(ShrtError::unauthorized("Current password is incorrect"));
        }
        check_new_password(new_password, self.min_password_length)
            .map_err(ShrtError::validation)?;

        self.storage
            .update_password_hash(uid, &hash_password(new_password)?)
            .await?;

        info!("AuthService: password changed for {}", uid);
        Ok(())
    }
}
