//! Link registry service
//!
//! Business rules for short links, shared by the HTTP handlers, the
//! redirect path and the CLI.

use std::sync::Arc;

use tracing::{info, warn};

use super::events::{ChangeEvent, ChangeFeed};
use crate::config::LinksConfig;
use crate::errors::{Result, ShrtError};
use crate::storage::{LinkStats, SeaOrmStorage, ShortLink};
use crate::utils::url_validator::validate_url;
use crate::utils::{build_short_url, generate_random_code, is_valid_short_code};

/// 与顶层路由或 `/api/v1` 冲突的短码
const RESERVED_CODES: &[&str] = &["api", "user", "files", "health", "v1"];

/// Request to create a new link
#[derive(Debug, Clone, Default)]
pub struct CreateLinkRequest {
    pub destination_url: String,
    /// 为空时自动生成
    pub code: Option<String>,
}

/// Result of link creation
#[derive(Debug, Clone)]
pub struct LinkCreateResult {
    pub link: ShortLink,
    pub generated_code: bool,
}

pub struct LinkService {
    storage: Arc<SeaOrmStorage>,
    events: ChangeFeed,
    settings: LinksConfig,
}

impl LinkService {
    pub fn new(storage: Arc<SeaOrmStorage>, events: ChangeFeed, settings: LinksConfig) -> Self {
        Self {
            storage,
            events,
            settings,
        }
    }

    pub fn settings(&self) -> &LinksConfig {
        &self.settings
    }

    pub fn short_url(&self, code: &str) -> String {
        build_short_url(&self.settings.base_url, code)
    }

    fn notify(&self, owner_id: Option<&str>) {
        if let Some(owner) = owner_id {
            self.events.publish(ChangeEvent::LinksChanged {
                owner_id: owner.to_string(),
            });
        }
    }

    /// 校验自定义短码（已去掉首尾空白）
    fn check_custom_code(code: &str) -> Result<()> {
        if !is_valid_short_code(code) {
            return Err(ShrtError::validation(format!(
                "Invalid short code '{}'. Use 2-30 letters, digits, '_' or '-'",
                code
            )));
        }
        if RESERVED_CODES.contains(&code.to_ascii_lowercase().as_str()) {
            return Err(ShrtError::validation(format!(
                "Short code '{}' is reserved",
                code
            )));
        }
        Ok(())
    }

    /// Create a short link
    ///
    /// Both the code and the URL are validated before anything is written.
    /// With `allow_overwrite` the record is upserted by code, so an existing
    /// link with the same code is replaced.
    pub async fn create_link(
        &self,
        owner_id: Option<&str>,
        req: CreateLinkRequest,
    ) -> Result<LinkCreateResult> {
        if owner_id.is_none() && !self.settings.allow_anonymous {
            return Err(ShrtError::unauthorized("Sign in to create links"));
        }

        let custom = req
            .code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        if let Some(ref code) = custom {
            Self::check_custom_code(code)?;
        }

        let destination_url = req.destination_url.trim().to_string();
        validate_url(&destination_url)?;

        let (code, generated_code) = match custom {
            Some(code) => (code, false),
            None => (self.generate_code(), true),
        };

        let link = ShortLink::new(code, destination_url, owner_id.map(str::to_string));

        if self.settings.allow_overwrite {
            self.storage.upsert_link(&link).await?;
        } else {
            self.storage.insert_link(&link).await?;
        }

        info!(
            "LinkService: created link '{}' -> '{}'",
            link.code, link.destination_url
        );
        self.notify(owner_id);

        Ok(LinkCreateResult {
            link,
            generated_code,
        })
    }

    fn generate_code(&self) -> String {
        loop {
            let code = generate_random_code(self.settings.code_length.max(2));
            if !RESERVED_CODES.contains(&code.to_ascii_lowercase().as_str()) {
                return code;
            }
        }
    }

    pub async fn get_link(&self, code: &str) -> Result<ShortLink> {
        self.storage
            .get_link(code)
            .await?
            .ok_or_else(|| ShrtError::not_found(format!("Link '{}' not found", code)))
    }

    /// fetch-by-url
    pub async fn find_by_destination(
        &self,
        destination_url: &str,
        owner_id: Option<&str>,
    ) -> Result<Vec<ShortLink>> {
        self.storage
            .find_links_by_destination(destination_url.trim(), owner_id)
            .await
    }

    pub async fn list_active_for_owner(&self, owner_id: &str) -> Result<Vec<ShortLink>> {
        self.storage.list_active_links(owner_id).await
    }

    pub async fn list_links(&self, owner_id: Option<&str>, limit: u64) -> Result<Vec<ShortLink>> {
        self.storage.list_links(owner_id, limit).await
    }

    /// 归档；`caller` 为 None 表示本地管理操作（CLI），不做归属检查
    pub async fn archive_link(&self, caller: Option<&str>, code: &str) -> Result<ShortLink> {
        let mut link = self.get_link(code).await?;

        if let Some(uid) = caller
            && link.owner_id.as_deref() != Some(uid)
        {
            return Err(ShrtError::forbidden(format!(
                "Link '{}' belongs to another user",
                code
            )));
        }

        if !link.archived {
            self.storage.archive_link(code).await?;
            link.archived = true;
            info!("LinkService: archived link '{}'", code);
            self.notify(link.owner_id.as_deref());
        }

        Ok(link)
    }

    /// Resolve a code for redirection and record the visit
    ///
    /// The click increment is awaited. If it fails the error is logged and
    /// the link is still returned so the redirect goes out.
    pub async fn resolve_and_record(&self, code: &str) -> Result<ShortLink> {
        if !is_valid_short_code(code) {
            return Err(ShrtError::not_found("Link not found"));
        }

        let mut link = self
            .storage
            .get_link(code)
            .await?
            .filter(|l| !l.destination_url.trim().is_empty())
            .ok_or_else(|| ShrtError::not_found("Link not found"))?;

        if link.archived && !self.settings.resolve_archived {
            return Err(ShrtError::not_found("Link not found"));
        }

        match self.storage.increment_clicks(code).await {
            Ok(true) => {
                link.clicks += 1;
                self.notify(link.owner_id.as_deref());
            }
            Ok(false) => warn!("Link '{}' vanished before its click was recorded", code),
            Err(e) => warn!("Failed to record click for '{}': {}", code, e),
        }

        Ok(link)
    }

    pub async fn stats(&self, owner_id: &str) -> Result<LinkStats> {
        self.storage.link_stats(owner_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_codes_rejected() {
        assert!(LinkService::check_custom_code("api").is_err());
        assert!(LinkService::check_custom_code("Health").is_err());
        assert!(LinkService::check_custom_code("V1").is_err());
        assert!(LinkService::check_custom_code("apis").is_ok());
    }

    #[test]
    fn test_custom_code_format() {
        assert!(LinkService::check_custom_code("a").is_err());
        assert!(LinkService::check_custom_code("bad code").is_err());
        assert!(LinkService::check_custom_code("good_code-1").is_ok());
    }
}
