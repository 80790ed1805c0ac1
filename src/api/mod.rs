pub mod constants;
pub mod extractors;
pub mod jwt;
pub mod middleware;
pub mod services;
