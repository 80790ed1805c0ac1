//! CLI interface module
//!
//! 直接操作数据库，不经过 HTTP 服务器。

pub mod commands;

use std::fmt;
use std::sync::Arc;

use crate::cli::{Commands, ConfigCommands, LinkCommands, UserCommands};
use crate::errors::ShrtError;
use crate::services::{ChangeFeed, LinkService};
use crate::storage::SeaOrmStorage;

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<ShrtError> for CliError {
    fn from(err: ShrtError) -> Self {
        match err {
            ShrtError::Validation(msg) => CliError::ParseError(msg),
            ShrtError::NotFound(msg) | ShrtError::Conflict(msg) | ShrtError::Forbidden(msg) => {
                CliError::CommandError(msg)
            }
            other => CliError::StorageError(other.to_string()),
        }
    }
}

async fn open_storage() -> Result<Arc<SeaOrmStorage>, CliError> {
    crate::runtime::lifetime::startup::cli_pre_startup()
        .await
        .map_err(|e| CliError::StorageError(format!("{:#}", e)))
}

/// CLI 下没有订阅者，事件直接丢弃
fn link_service(storage: Arc<SeaOrmStorage>) -> LinkService {
    let config = crate::config::get_config();
    LinkService::new(storage, ChangeFeed::default(), config.links.clone())
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: Commands) -> Result<(), CliError> {
    match cmd {
        Commands::Serve => Err(CliError::CommandError(
            "serve is handled by the server entry point".to_string(),
        )),

        Commands::Config {
            action: ConfigCommands::Generate { output_path, force },
        } => commands::config_generate(output_path, force),

        Commands::Link { action } => {
            let storage = open_storage().await?;
            let links = link_service(storage.clone());
            let result = match action {
                LinkCommands::Add { url, code, owner } => {
                    commands::add_link(&links, url, code, owner).await
                }
                LinkCommands::Get { code } => commands::get_link(&links, &code).await,
                LinkCommands::List { owner, url, limit } => {
                    commands::list_links(&links, owner, url, limit).await
                }
                LinkCommands::Archive { code } => commands::archive_link(&links, &code).await,
            };
            storage.close().await;
            result
        }

        Commands::User {
            action: UserCommands::List { limit },
        } => {
            let storage = open_storage().await?;
            let result = commands::list_users(&storage, limit).await;
            storage.close().await;
            result
        }
    }
}

