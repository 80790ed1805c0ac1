use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};
use tracing::warn;

use crate::storage::models::{ContactInfo, PlpLink, ShortLink, SocialHandles, UserAccount, UserProfile};
use migration::entities::{plp_link, shrt, user};

/// Model -> ShortLink
pub fn model_to_shortlink(model: shrt::Model) -> ShortLink {
    ShortLink {
        code: model.code,
        destination_url: model.destination_url,
        owner_id: model.owner_id,
        created_at: model.created_at,
        archived: model.archived,
        clicks: model.clicks.max(0) as u64,
    }
}

/// ShortLink -> ActiveModel（整行写入，upsert 时覆盖旧记录）
pub fn shortlink_to_active_model(link: &ShortLink) -> shrt::ActiveModel {
    shrt::ActiveModel {
        code: Set(link.code.clone()),
        destination_url: Set(link.destination_url.clone()),
        owner_id: Set(link.owner_id.clone()),
        created_at: Set(link.created_at),
        archived: Set(link.archived),
        clicks: Set(link.clicks as i64),
    }
}

pub fn model_to_account(model: &user::Model) -> UserAccount {
    UserAccount {
        uid: model.uid.clone(),
        email: model.email.clone(),
        password_hash: model.password_hash.clone(),
        created_at: model.created_at,
    }
}

/// 社交账号以 JSON 文本存储；损坏时退回空值而不是让整行读取失败
pub fn decode_social(raw: &str) -> SocialHandles {
    if raw.trim().is_empty() {
        return SocialHandles::default();
    }
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!("Invalid social handles JSON, ignoring: {}", e);
        SocialHandles::default()
    })
}

pub fn encode_social(social: &SocialHandles) -> String {
    serde_json::to_string(social).unwrap_or_else(|_| "{}".to_string())
}

pub fn model_to_profile(model: user::Model) -> UserProfile {
    let social = decode_social(&model.social);
    UserProfile {
        uid: model.uid,
        username: model.username,
        display_name: model.display_name,
        title: model.title,
        company: model.company,
        bio: model.bio,
        contact: ContactInfo {
            email: Some(model.email),
            phone: model.phone,
            date_of_birth: model.date_of_birth,
            street: model.street,
            city: model.city,
            state: model.state,
            zip: model.zip,
        },
        social,
        updated_at: model.updated_at,
    }
}

/// 新账号（资料字段全部为空）
pub fn new_user_active_model(account: &UserAccount) -> user::ActiveModel {
    user::ActiveModel {
        uid: Set(account.uid.clone()),
        email: Set(account.email.clone()),
        password_hash: Set(account.password_hash.clone()),
        username: Set(None),
        display_name: Set(None),
        title: Set(None),
        company: Set(None),
        bio: Set(None),
        phone: Set(None),
        date_of_birth: Set(None),
        street: Set(None),
        city: Set(None),
        state: Set(None),
        zip: Set(None),
        social: Set(encode_social(&SocialHandles::default())),
        created_at: Set(account.created_at),
        updated_at: Set(account.created_at),
    }
}

/// 资料更新：email 与密码不经过这里
pub fn profile_to_active_model(profile: &UserProfile) -> user::ActiveModel {
    user::ActiveModel {
        uid: Set(profile.uid.clone()),
        email: NotSet,
        password_hash: NotSet,
        username: Set(profile.username.clone()),
        display_name: Set(profile.display_name.clone()),
        title: Set(profile.title.clone()),
        company: Set(profile.company.clone()),
        bio: Set(profile.bio.clone()),
        phone: Set(profile.contact.phone.clone()),
        date_of_birth: Set(profile.contact.date_of_birth.clone()),
        street: Set(profile.contact.street.clone()),
        city: Set(profile.contact.city.clone()),
        state: Set(profile.contact.state.clone()),
        zip: Set(profile.contact.zip.clone()),
        social: Set(encode_social(&profile.social)),
        created_at: NotSet,
        updated_at: Set(Utc::now()),
    }
}

pub fn model_to_plp_link(model: plp_link::Model) -> PlpLink {
    PlpLink {
        id: model.id,
        owner_id: model.owner_id,
        title: model.title,
        url: model.url,
        description: model.description,
        order: model.sort_order,
        archived: model.archived,
        created_at: model.created_at,
    }
}

pub fn plp_link_to_active_model(link: &PlpLink) -> plp_link::ActiveModel {
    plp_link::ActiveModel {
        id: Set(link.id.clone()),
        owner_id: Set(link.owner_id.clone()),
        title: Set(link.title.clone()),
        url: Set(link.url.clone()),
        description: Set(link.description.clone()),
        sort_order: Set(link.order),
        archived: Set(link.archived),
        created_at: Set(link.created_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;

    fn user_model() -> user::Model {
        user::Model {
            uid: "u1".into(),
            email: "jane@example.com".into(),
            password_hash: "$argon2id$stub".into(),
            username: Some("jane".into()),
            display_name: Some("Jane".into()),
            title: None,
            company: None,
            bio: Some("hi".into()),
            phone: None,
            date_of_birth: None,
            street: None,
            city: Some("Oslo".into()),
            state: None,
            zip: None,
            social: r#"{"github":"jane"}"#.into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_negative_clicks_clamped() {
        let link = model_to_shortlink(shrt::Model {
            code: "abc".into(),
            destination_url: "https://example.com".into(),
            owner_id: None,
            created_at: Utc::now(),
            archived: false,
            clicks: -4,
        });
        assert_eq!(link.clicks, 0);
    }

    #[test]
    fn test_shortlink_active_model_sets_every_column() {
        let link = ShortLink::new("abc", "https://example.com", Some("u1".into()));
        let am = shortlink_to_active_model(&link);
        assert!(matches!(am.clicks, ActiveValue::Set(0)));
        assert!(matches!(am.archived, ActiveValue::Set(false)));
        assert!(matches!(am.owner_id, ActiveValue::Set(Some(_))));
    }

    #[test]
    fn test_profile_contains_account_email_and_social() {
        let profile = model_to_profile(user_model());
        assert_eq!(profile.contact.email.as_deref(), Some("jane@example.com"));
        assert_eq!(profile.contact.city.as_deref(), Some("Oslo"));
        assert_eq!(profile.social.github.as_deref(), Some("jane"));
    }

    #[test]
    fn test_profile_active_model_leaves_credentials_untouched() {
        let profile = model_to_profile(user_model());
        let am = profile_to_active_model(&profile);
        assert!(matches!(am.email, ActiveValue::NotSet));
        assert!(matches!(am.password_hash, ActiveValue::NotSet));
        assert!(matches!(am.created_at, ActiveValue::NotSet));
    }

    #[test]
    fn test_broken_social_json_defaults() {
        assert_eq!(decode_social("{not json"), SocialHandles::default());
        assert_eq!(decode_social(""), SocialHandles::default());
    }
}
