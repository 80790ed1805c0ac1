use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, IntoEnumIterator};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortLink {
    pub code: String,
    pub destination_url: String,
    #[serde(default)]
    pub owner_id: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub clicks: u64,
}

impl ShortLink {
    pub fn new(
        code: impl Into<String>,
        destination_url: impl Into<String>,
        owner_id: Option<String>,
    ) -> Self {
        Self {
            code: code.into(),
            destination_url: destination_url.into(),
            owner_id,
            created_at: Utc::now(),
            archived: false,
            clicks: 0,
        }
    }
}

/// 账号（认证信息）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub uid: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
}

/// 支持的社交平台
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum SocialPlatform {
    Twitter,
    Twitch,
    Youtube,
    Instagram,
    Linkedin,
    Github,
    Gitlab,
    Dev,
    Pinterest,
    Soundcloud,
}

impl SocialPlatform {
    /// 由用户名拼出主页地址
    pub fn profile_url(&self, handle: &str) -> String {
        match self {
            Self::Twitter => format!("https://twitter.com/{}", handle),
            Self::Twitch => format!("https://twitch.tv/{}", handle),
            Self::Youtube => format!("https://youtube.com/channel/{}", handle),
            Self::Instagram => format!("https://instagram.com/{}", handle),
            Self::Linkedin => format!("https://linkedin.com/in/{}", handle),
            Self::Github => format!("https://github.com/{}", handle),
            Self::Gitlab => format!("https://gitlab.com/{}", handle),
            Self::Dev => format!("https://dev.to/{}", handle),
            Self::Pinterest => format!("https://pinterest.com/{}/_created", handle),
            Self::Soundcloud => format!("https://soundcloud.com/{}", handle),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialHandles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gitlab: Option<String>,
    #[serde(default, alias = "DEV", skip_serializing_if = "Option::is_none")]
    pub dev: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinterest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soundcloud: Option<String>,
}

/// 渲染后的社交链接
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocialLink {
    pub platform: String,
    pub handle: String,
    pub href: String,
}

impl SocialHandles {
    pub fn get(&self, platform: SocialPlatform) -> Option<&str> {
        let value = match platform {
            SocialPlatform::Twitter => &self.twitter,
            SocialPlatform::Twitch => &self.twitch,
            SocialPlatform::Youtube => &self.youtube,
            SocialPlatform::Instagram => &self.instagram,
            SocialPlatform::Linkedin => &self.linkedin,
            SocialPlatform::Github => &self.github,
            SocialPlatform::Gitlab => &self.gitlab,
            SocialPlatform::Dev => &self.dev,
            SocialPlatform::Pinterest => &self.pinterest,
            SocialPlatform::Soundcloud => &self.soundcloud,
        };
        value.as_deref().filter(|v| !v.trim().is_empty())
    }

    /// 已填写的平台，按固定顺序输出
    pub fn links(&self) -> Vec<SocialLink> {
        SocialPlatform::iter()
            .filter_map(|platform| {
                self.get(platform).map(|handle| SocialLink {
                    platform: platform.as_ref().to_string(),
                    handle: handle.to_string(),
                    href: platform.profile_url(handle),
                })
            })
            .collect()
    }

    /// 只覆盖 patch 中出现的字段
    pub fn merge(&mut self, patch: SocialHandles) {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if patch.$field.is_some() { self.$field = patch.$field; })*
            };
        }
        take!(twitter, twitch, youtube, instagram, linkedin, github, gitlab, dev, pinterest, soundcloud);
    }
}

/// 用户资料（PLP 页面的数据来源）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: String,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub bio: Option<String>,
    pub contact: ContactInfo,
    pub social: SocialHandles,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlpLink {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub order: i32,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
}

/// 单个用户的短链接统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkStats {
    pub total_links: u64,
    pub active_links: u64,
    pub archived_links: u64,
    pub total_clicks: u64,
}

/// 对象存储中的文件元数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    pub path: String,
    pub content_type: String,
    pub size: u64,
    pub updated_at: DateTime<Utc>,
}
