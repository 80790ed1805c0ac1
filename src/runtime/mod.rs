//! Runtime: startup / shutdown and execution modes

pub mod lifetime;
pub mod modes;
