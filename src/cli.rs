//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// Shrt - URL shortener and personal landing pages
#[derive(Parser)]
#[command(name = "shrt")]
#[command(version)]
#[command(about = "URL shortener and personal landing page service", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short = 'c', global = true, default_value = crate::config::DEFAULT_CONFIG_PATH)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default when no command is given)
    Serve,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Manage short links directly in the database
    Link {
        #[command(subcommand)]
        action: LinkCommands,
    },

    /// Inspect user accounts
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum LinkCommands {
    /// Add a short link
    Add {
        /// Destination URL
        url: String,

        /// Custom short code (random when omitted)
        #[arg(long)]
        code: Option<String>,

        /// Owner uid
        #[arg(long)]
        owner: Option<String>,
    },

    /// Show one short link
    Get { code: String },

    /// List short links
    List {
        /// Only links owned by this uid
        #[arg(long)]
        owner: Option<String>,

        /// Only links pointing at this destination URL
        #[arg(long)]
        url: Option<String>,

        #[arg(long, default_value_t = 100)]
        limit: u64,
    },

    /// Archive a short link
    Archive { code: String },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// List user accounts
    List {
        #[arg(long, default_value_t = 50)]
        limit: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_link_add() {
        let cli = Cli::try_parse_from([
            "shrt",
            "link",
            "add",
            "https://example.com",
            "--code",
            "abc",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Link {
                action: LinkCommands::Add { url, code, owner },
            }) => {
                assert_eq!(url, "https://example.com");
                assert_eq!(code.as_deref(), Some("abc"));
                assert!(owner.is_none());
            }
            _ => panic!("expected link add"),
        }
        assert_eq!(cli.config, "config.toml");
    }

    #[test]
    fn test_no_command_defaults_to_none() {
        let cli = Cli::try_parse_from(["shrt", "-c", "other.toml"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, "other.toml");
    }
}
