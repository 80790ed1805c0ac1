//! Shrt - URL shortener and personal landing pages
//!
//! # Features
//! - **server**: HTTP server mode (default)
//! - **cli**: Command-line management commands
//!
//! # Architecture
//! - `storage`: SeaORM storage backend and local object store
//! - `services`: link, auth, profile and landing page logic plus the change feed
//! - `api`: HTTP handlers, extractors and middleware
//! - `interfaces`: CLI commands
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging and panic handling

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
