//! Short link commands

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::{CreateLinkRequest, LinkService};
use crate::storage::ShortLink;

fn print_link(links: &LinkService, link: &ShortLink) {
    let status = if link.archived {
        "archived".yellow()
    } else {
        "active".green()
    };
    println!(
        "  {} -> {}",
        links.short_url(&link.code).cyan(),
        link.destination_url.blue().underline()
    );
    println!(
        "    {} {}  {} {}  {} {}  {}",
        "owner:".dimmed(),
        link.owner_id.as_deref().unwrap_or("-"),
        "clicks:".dimmed(),
        link.clicks.to_string().magenta(),
        "created:".dimmed(),
        link.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
        status
    );
}

pub async fn add_link(
    links: &LinkService,
    url: String,
    code: Option<String>,
    owner: Option<String>,
) -> Result<(), CliError> {
    let result = links
        .create_link(
            owner.as_deref(),
            CreateLinkRequest {
                destination_url: url,
                code,
            },
        )
        .await?;

    if result.generated_code {
        println!(
            "{} Generated random code: {}",
            "ℹ".bold().blue(),
            result.link.code.magenta()
        );
    }
    println!(
        "{} Added short link: {} -> {}",
        "✓".bold().green(),
        result.link.code.cyan(),
        result.link.destination_url.blue().underline()
    );
    Ok(())
}

pub async fn get_link(links: &LinkService, code: &str) -> Result<(), CliError> {
    let link = links.get_link(code).await?;
    print_link(links, &link);
    Ok(())
}

pub async fn list_links(
    links: &LinkService,
    owner: Option<String>,
    url: Option<String>,
    limit: u64,
) -> Result<(), CliError> {
    let found = match url {
        Some(url) => links.find_by_destination(&url, owner.as_deref()).await?,
        None => links.list_links(owner.as_deref(), limit).await?,
    };

    if found.is_empty() {
        println!("{}", "No short links found".yellow());
        return Ok(());
    }

    println!("{}", format!("Short links ({}):", found.len()).bold());
    for link in &found {
        print_link(links, link);
    }
    Ok(())
}

pub async fn archive_link(links: &LinkService, code: &str) -> Result<(), CliError> {
    let link = links.archive_link(None, code).await?;
    println!(
        "{} Archived short link: {}",
        "✓".bold().green(),
        link.code.cyan()
    );
    Ok(())
}
