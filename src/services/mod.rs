//! Service layer for business logic
//!
//! Shared by the HTTP API and the CLI. Handlers never talk to storage
//! directly except for health probes.

mod auth_service;
pub mod events;
mod link_service;
mod plp_service;
mod profile_service;

use std::sync::Arc;

use chrono::{DateTime, Utc};

pub use auth_service::*;
pub use events::{ChangeEvent, ChangeFeed, FeedItem, UserSubscription};
pub use link_service::*;
pub use plp_service::*;
pub use profile_service::*;

use crate::api::jwt::JwtService;
use crate::config::StaticConfig;
use crate::storage::{ObjectStore, SeaOrmStorage};

/// Everything a request handler needs, shared across workers
pub struct AppContext {
    pub storage: Arc<SeaOrmStorage>,
    pub events: ChangeFeed,
    pub links: LinkService,
    pub auth: AuthService,
    pub profiles: ProfileService,
    pub plp: PlpService,
    pub started_at: DateTime<Utc>,
}

impl AppContext {
    pub fn new(
        config: &StaticConfig,
        storage: Arc<SeaOrmStorage>,
        objects: Arc<dyn ObjectStore>,
    ) -> Self {
        let events = ChangeFeed::default();
        let jwt = Arc::new(JwtService::from_config(&config.auth));

        Self {
            links: LinkService::new(storage.clone(), events.clone(), config.links.clone()),
            auth: AuthService::new(
                storage.clone(),
                events.clone(),
                jwt,
                config.auth.min_password_length,
            ),
            profiles: ProfileService::new(
                storage.clone(),
                objects,
                events.clone(),
                config.storage.clone(),
            ),
            plp: PlpService::new(storage.clone(), events.clone()),
            storage,
            events,
            started_at: Utc::now(),
        }
    }
}
