//! User account commands

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::storage::SeaOrmStorage;

pub async fn list_users(storage: &SeaOrmStorage, limit: u64) -> Result<(), CliError> {
    let accounts = storage.list_accounts(limit).await?;

    if accounts.is_empty() {
        println!("{}", "No users found".yellow());
        return Ok(());
    }

    println!("{}", format!("Users ({}):", accounts.len()).bold());
    for account in &accounts {
        let username = storage
            .get_profile(&account.uid)
            .await?
            .and_then(|p| p.username)
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {}  {}  {}  {}",
            account.uid.cyan(),
            account.email,
            username.magenta(),
            account
                .created_at
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string()
                .dimmed()
        );
    }
    Ok(())
}
