pub mod health;
pub mod public;
pub mod redirect;
pub mod v1;

pub use health::{HealthService, health_routes};
pub use public::public_routes;
pub use redirect::{RedirectService, redirect_routes};
pub use v1::api_v1_routes;
