//! PLP link service

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use super::events::{ChangeEvent, ChangeFeed};
use crate::errors::{Result, ShrtError};
use crate::storage::{PlpLink, SeaOrmStorage};
use crate::utils::url_validator::validate_url;

#[derive(Debug, Clone, Deserialize)]
pub struct NewPlpLink {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlpLinkPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub order: Option<i32>,
}

fn required_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ShrtError::validation("Title must not be empty"));
    }
    Ok(title.to_string())
}

fn checked_url(url: &str) -> Result<String> {
    let url = url.trim();
    validate_url(url)?;
    Ok(url.to_string())
}

pub struct PlpService {
    storage: Arc<SeaOrmStorage>,
    events: ChangeFeed,
}

impl PlpService {
    pub fn new(storage: Arc<SeaOrmStorage>, events: ChangeFeed) -> Self {
        Self { storage, events }
    }

    fn notify(&self, uid: &str) {
        self.events.publish(ChangeEvent::PlpChanged {
            uid: uid.to_string(),
        });
    }

    /// 取出链接并确认归属
    async fn owned_link(&self, uid: &str, id: &str) -> Result<PlpLink> {
        let link = self
            .storage
            .get_plp_link(id)
            .await?
            .ok_or_else(|| ShrtError::not_found(format!("PLP link '{}' not found", id)))?;

        if link.owner_id != uid {
            return Err(ShrtError::forbidden(format!(
                "PLP link '{}' belongs to another user",
                id
            )));
        }
        Ok(link)
    }

    pub async fn add_link(&self, uid: &str, new: NewPlpLink) -> Result<PlpLink> {
        let link = PlpLink {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: uid.to_string(),
            title: required_title(&new.title)?,
            url: checked_url(&new.url)?,
            description: new
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            order: 0,
            archived: false,
            created_at: Utc::now(),
        };

        self.storage.insert_plp_link(&link).await?;
        self.notify(uid);
        Ok(link)
    }

    pub async fn update_link(&self, uid: &str, id: &str, patch: PlpLinkPatch) -> Result<PlpLink> {
        let mut link = self.owned_link(uid, id).await?;

        if let Some(title) = patch.title {
            link.title = required_title(&title)?;
        }
        if let Some(url) = patch.url {
            link.url = checked_url(&url)?;
        }
        if let Some(description) = patch.description {
            let description = description.trim();
            link.description = (!description.is_empty()).then(|| description.to_string());
        }
        if let Some(order) = patch.order {
            link.order = order;
        }

        self.storage.save_plp_link(&link).await?;
        info!("PlpService: updated link {} for {}", id, uid);
        self.notify(uid);
        Ok(link)
    }

    pub async fn archive_link(&self, uid: &str, id: &str) -> Result<PlpLink> {
        let mut link = self.owned_link(uid, id).await?;
        if !link.archived {
            self.storage.archive_plp_link(id).await?;
            link.archived = true;
            info!("PlpService: archived link {} for {}", id, uid);
            self.notify(uid);
        }
        Ok(link)
    }

    pub async fn list_links(&self, uid: &str) -> Result<Vec<PlpLink>> {
        self.storage.list_active_plp_links(uid).await
    }
}
