//! Profile service
//!
//! 用户资料、公开 PLP 页面数据以及资料图片上传。

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::auth_service::normalize_email;
use super::events::{ChangeEvent, ChangeFeed};
use crate::config::ObjectStorageConfig;
use crate::errors::{Result, ShrtError};
use crate::storage::{
    ContactInfo, ObjectStore, PlpLink, SeaOrmStorage, SocialHandles, SocialLink, StoredObject,
    UserProfile,
};
use crate::utils::is_valid_username;

pub const AVATAR: &str = "avatar";
pub const BACKGROUND: &str = "background";

const IMAGE_CONTENT_TYPES: &[&str] = &["image/png", "image/jpeg"];

/// 资料局部更新：字段缺省表示不修改，空字符串表示清空
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilePatch {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub contact: Option<ContactInfo>,
    #[serde(default)]
    pub social: Option<SocialHandles>,
}

/// Data behind `/user/{username}`
#[derive(Debug, Clone, Serialize)]
pub struct PublicPage {
    pub username: String,
    pub display_name: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub bio: Option<String>,
    pub contact: ContactInfo,
    pub social: Vec<SocialLink>,
    pub links: Vec<PlpLink>,
    pub avatar_url: String,
    pub background_url: String,
}

fn apply(target: &mut Option<String>, value: Option<String>) {
    if let Some(v) = value {
        let v = v.trim();
        *target = (!v.is_empty()).then(|| v.to_string());
    }
}

pub fn profile_object_path(uid: &str, name: &str) -> String {
    format!("users/{}/profile/{}", uid, name)
}

pub struct ProfileService {
    storage: Arc<SeaOrmStorage>,
    objects: Arc<dyn ObjectStore>,
    events: ChangeFeed,
    settings: ObjectStorageConfig,
}

impl ProfileService {
    pub fn new(
        storage: Arc<SeaOrmStorage>,
        objects: Arc<dyn ObjectStore>,
        events: ChangeFeed,
        settings: ObjectStorageConfig,
    ) -> Self {
        Self {
            storage,
            objects,
            events,
            settings,
        }
    }

    pub fn objects(&self) -> &Arc<dyn ObjectStore> {
        &self.objects
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.settings.max_upload_bytes
    }

    pub async fn get_profile(&self, uid: &str) -> Result<UserProfile> {
        self.storage
            .get_profile(uid)
            .await?
            .ok_or_else(|| ShrtError::not_found(format!("User not found: {}", uid)))
    }

    pub async fn find_by_username(&self, username: &str) -> Result<UserProfile> {
        if !is_valid_username(username) {
            return Err(ShrtError::not_found("Profile not found"));
        }
        self.storage
            .find_profile_by_username(username)
            .await?
            .ok_or_else(|| ShrtError::not_found("Profile not found"))
    }

    /// Apply a partial update
    ///
    /// A changed contact email is written to the account as well, so sign-in
    /// uses the new address.
    pub async fn update_profile(&self, uid: &str, patch: ProfilePatch) -> Result<UserProfile> {
        let mut profile = self.get_profile(uid).await?;

        if let Some(username) = patch.username {
            let username = username.trim();
            if username.is_empty() {
                profile.username = None;
            } else if !is_valid_username(username) {
                return Err(ShrtError::validation(format!(
                    "Invalid username '{}'. Use 2-30 letters, digits, '_', '.' or '-'",
                    username
                )));
            } else {
                profile.username = Some(username.to_string());
            }
        }

        apply(&mut profile.display_name, patch.display_name);
        apply(&mut profile.title, patch.title);
        apply(&mut profile.company, patch.company);
        apply(&mut profile.bio, patch.bio);

        let mut new_email = None;
        if let Some(contact) = patch.contact {
            if let Some(email) = contact.email.as_deref().map(str::trim)
                && !email.is_empty()
            {
                let email = normalize_email(email)?;
                if profile.contact.email.as_deref() != Some(email.as_str()) {
                    new_email = Some(email);
                }
            }
            apply(&mut profile.contact.phone, contact.phone);
            apply(&mut profile.contact.date_of_birth, contact.date_of_birth);
            apply(&mut profile.contact.street, contact.street);
            apply(&mut profile.contact.city, contact.city);
            apply(&mut profile.contact.state, contact.state);
            apply(&mut profile.contact.zip, contact.zip);
        }

        if let Some(social) = patch.social {
            profile.social.merge(social);
        }

        profile.updated_at = Utc::now();
        self.storage
            .save_profile(&profile, new_email.as_deref())
            .await?;
        if let Some(email) = new_email {
            profile.contact.email = Some(email);
        }

        info!("ProfileService: profile updated for {}", uid);
        self.events.publish(ChangeEvent::ProfileChanged {
            uid: uid.to_string(),
        });
        Ok(profile)
    }

    /// Store a file under `users/{uid}/profile/{name}`
    pub async fn upload_file(
        &self,
        uid: &str,
        name: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<StoredObject> {
        if name.is_empty() || name.contains('/') {
            return Err(ShrtError::validation(format!("Invalid file name: {}", name)));
        }
        if data.is_empty() {
            return Err(ShrtError::validation("Empty upload"));
        }
        if data.len() > self.settings.max_upload_bytes {
            return Err(ShrtError::payload_too_large(format!(
                "File exceeds {} bytes",
                self.settings.max_upload_bytes
            )));
        }

        let content_type = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if (name == AVATAR || name == BACKGROUND)
            && !IMAGE_CONTENT_TYPES.contains(&content_type.as_str())
        {
            return Err(ShrtError::validation(format!(
                "{} must be a PNG or JPEG image",
                name
            )));
        }

        let stored = self
            .objects
            .put(&profile_object_path(uid, name), &content_type, data)
            .await?;

        info!("ProfileService: stored {} ({} bytes)", stored.path, stored.size);
        self.events.publish(ChangeEvent::ProfileChanged {
            uid: uid.to_string(),
        });
        Ok(stored)
    }

    /// 已上传则返回下载地址，否则返回默认图片
    pub async fn image_url(&self, uid: &str, name: &str) -> Result<String> {
        let path = profile_object_path(uid, name);
        if self.objects.head(&path).await?.is_some() {
            return Ok(format!("/files/{}", path));
        }
        Ok(match name {
            BACKGROUND => self.settings.default_background_url.clone(),
            _ => self.settings.default_avatar_url.clone(),
        })
    }

    pub async fn public_page(&self, username: &str) -> Result<PublicPage> {
        let profile = self.find_by_username(username).await?;
        let links = self.storage.list_active_plp_links(&profile.uid).await?;

        Ok(PublicPage {
            avatar_url: self.image_url(&profile.uid, AVATAR).await?,
            background_url: self.image_url(&profile.uid, BACKGROUND).await?,
            username: profile.username.unwrap_or_default(),
            display_name: profile.display_name,
            title: profile.title,
            company: profile.company,
            bio: profile.bio,
            contact: profile.contact,
            social: profile.social.links(),
            links,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_patch_field() {
        let mut field = Some("old".to_string());
        apply(&mut field, None);
        assert_eq!(field.as_deref(), Some("old"));
        apply(&mut field, Some("  new ".into()));
        assert_eq!(field.as_deref(), Some("new"));
        apply(&mut field, Some("".into()));
        assert_eq!(field, None);
    }

    #[test]
    fn test_profile_object_path() {
        assert_eq!(profile_object_path("u1", AVATAR), "users/u1/profile/avatar");
    }
}
