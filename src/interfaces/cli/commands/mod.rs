//! CLI command implementations

mod config_gen;
mod links;
mod users;

pub use config_gen::*;
pub use links::*;
pub use users::*;
