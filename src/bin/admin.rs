//! CLI administration tool for tinylink.
//!
//! Manages links and the database directly, without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List all links
//! cargo run --bin admin -- links list
//!
//! # Create a link with a custom code
//! cargo run --bin admin -- links create https://example.com/docs --code docs24
//!
//! # Delete a link without a prompt
//! cargo run --bin admin -- links delete docs24 -y
//!
//! # Apply migrations
//! cargo run --bin admin -- db init
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (or `DB_HOST`/`DB_USER`/`DB_PASSWORD`/`DB_NAME`): PostgreSQL connection

use tinylink::api::dto::links::CreateLinkRequest;
use tinylink::application::services::LinkService;
use tinylink::config::Config;
use tinylink::domain::entities::Link;
use tinylink::infrastructure::Database;
use tinylink::infrastructure::persistence::PgLinkRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::sync::Arc;

/// CLI tool for managing tinylink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage short links
    Links {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum LinkAction {
    /// List all links, newest first
    List,

    /// Create a short link
    Create {
        /// Destination URL (http or https)
        url: String,

        /// Custom code, 6-8 letters or digits (generated if omitted)
        #[arg(short, long)]
        code: Option<String>,
    },

    /// Show a single link
    Show { code: String },

    /// Delete a link
    Delete {
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Create the links table if it does not exist
    Init,
}

type PgLinkService = LinkService<PgLinkRepository>;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set")?;

    let database = Database::connect(database_url, config.pool_settings())
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Links { action } => {
            database
                .initialize()
                .await
                .context("Failed to apply database migrations")?;

            let service = LinkService::new(Arc::new(PgLinkRepository::new(
                database.pool().clone(),
            )));
            handle_link_action(action, &service).await?;
        }
        Commands::Db { action } => handle_db_action(action, &database).await?,
    }

    Ok(())
}

/// Dispatches link management commands.
async fn handle_link_action(action: LinkAction, service: &PgLinkService) -> Result<()> {
    match action {
        LinkAction::List => list_links(service).await,
        LinkAction::Create { url, code } => create_link(service, url, code).await,
        LinkAction::Show { code } => show_link(service, &code).await,
        LinkAction::Delete { code, yes } => delete_link(service, &code, yes).await,
    }
}

/// Prints every link as a table.
///
/// ```text
///   Code     URL                                      Clicks   Last clicked
///   ───────────────────────────────────────────────────────────────────────────
///   docs24   https://example.com/docs                 12       2025-01-15 10:30
/// ```
async fn list_links(service: &PgLinkService) -> Result<()> {
    println!("{}", "📋 Links".bright_blue().bold());
    println!();

    let links = service.list_links().await?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        println!();
        println!(
            "  Create one with: {} admin links create <url>",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<8} {:<40} {:<8} {:<16}",
        "Code".bright_white().bold(),
        "URL".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Last clicked".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &links {
        println!(
            "  {:<8} {:<40} {:<8} {}",
            link.code.cyan(),
            truncate(&link.url, 40),
            link.clicks.to_string().bright_green(),
            last_clicked(link).bright_black()
        );
    }

    let total_clicks: i64 = links.iter().map(|link| link.clicks).sum();

    println!();
    println!(
        "  Total: {} links, {} clicks",
        links.len().to_string().bright_white().bold(),
        total_clicks.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn create_link(service: &PgLinkService, url: String, code: Option<String>) -> Result<()> {
    println!("{}", "🔗 Create Link".bright_blue().bold());
    println!();

    let input = CreateLinkRequest {
        url: Some(url),
        code,
    }
    .into_input()?;

    let link = service.create_link(input).await?;

    println!("{}", "✅ Link created".green().bold());
    println!();
    print_link(&link);

    Ok(())
}

async fn show_link(service: &PgLinkService, code: &str) -> Result<()> {
    let link = service
        .get_link(code)
        .await?
        .with_context(|| format!("Link '{code}' not found"))?;

    print_link(&link);

    Ok(())
}

/// Deletes a link after confirmation (default: No) unless `--yes` is given.
async fn delete_link(service: &PgLinkService, code: &str, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑  Delete Link".bright_blue().bold());
    println!();

    let link = service
        .get_link(code)
        .await?
        .with_context(|| format!("Link '{code}' not found"))?;

    print_link(&link);

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    if service.delete_link(code).await? {
        println!("{}", "✅ Link deleted".green().bold());
    } else {
        println!("{}", "⚠️  Link was already deleted".yellow());
    }
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, database: &Database) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(database.pool()).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Init => {
            println!("{}", "🛠  Applying migrations...".bright_blue());

            database.initialize().await?;

            println!("{}", "✅ Database initialized".green().bold());
        }
    }

    Ok(())
}

fn print_link(link: &Link) {
    println!("  Code:         {}", link.code.cyan());
    println!("  URL:          {}", link.url.bright_white());
    println!("  Clicks:       {}", link.clicks.to_string().bright_green());
    println!("  Last clicked: {}", last_clicked(link).bright_black());
    println!(
        "  Created:      {}",
        link.created_at
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .bright_black()
    );
    println!();
}

fn last_clicked(link: &Link) -> String {
    link.last_clicked
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "never".to_string())
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }

    let mut truncated: String = value.chars().take(max_chars - 1).collect();
    truncated.push('…');
    truncated
}
