//! CLI administration tool for link-shortener.
//!
//! Reads statistics and link records straight from the database, without
//! going through the HTTP API and without counting clicks.
//!
//! # Usage
//!
//! ```bash
//! # View totals and the newest links
//! cargo run --bin admin -- stats --limit 20
//!
//! # Inspect a single link
//! cargo run --bin admin -- lookup aZ3_k-9Q
//!
//! # Check the connection and list unapplied migrations (read-only)
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (default: `sqlite://urls.db`): SQLite connection string

use link_shortener::application::services::StatsService;
use link_shortener::domain::repositories::LinkRepository;
use link_shortener::infrastructure::persistence::{self, SqliteLinkRepository};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::sync::Arc;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// CLI tool for managing link-shortener.
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
    /// Show link and click totals
    Stats {
        /// Number of recent links to list
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Show a single link by short code
    Lookup {
        /// Short code to look up
        code: String,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection and report pending migrations without applying them
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://urls.db".to_string());

    match cli.command {
        Commands::Db { action } => handle_db_action(action, &database_url).await,
        command => run_with_store(command, &database_url).await,
    }
}

/// Runs a command against the link store, applying pending migrations first.
async fn run_with_store(command: Commands, database_url: &str) -> Result<()> {
    let pool = persistence::connect(database_url, 1, CONNECT_TIMEOUT)
        .await
        .context("Failed to connect to database")?;
    let repo = Arc::new(SqliteLinkRepository::new(Arc::new(pool.clone())));

    match command {
        Commands::Stats { limit } => handle_stats(repo, limit).await?,
        Commands::Lookup { code } => handle_lookup(repo.as_ref(), &code).await?,
        Commands::Db { action } => handle_db_action(action, database_url).await?,
    }

    pool.close().await;
    Ok(())
}

/// Displays totals and the newest links.
async fn handle_stats(repo: Arc<SqliteLinkRepository>, limit: usize) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let stats = StatsService::new(repo, limit).get_summary().await?;

    println!(
        "  Links:  {}",
        stats.total_urls.to_string().bright_green().bold()
    );
    println!(
        "  Clicks: {}",
        stats.total_clicks.to_string().bright_green().bold()
    );
    println!();

    if stats.recent.is_empty() {
        println!("{}", "  No links yet".yellow());
        println!();
        return Ok(());
    }

    println!(
        "  {:<10} {:>8}  {:<20}  {}",
        "Code".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Created".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &stats.recent {
        println!(
            "  {:<10} {:>8}  {:<20}  {}",
            link.short_code.cyan(),
            link.click_count,
            link.created_at.format("%Y-%m-%d %H:%M:%S").to_string().bright_black(),
            link.original_url
        );
    }
    println!();

    Ok(())
}

/// Prints a single link record.
async fn handle_lookup(repo: &SqliteLinkRepository, code: &str) -> Result<()> {
    match repo.find_by_code(code).await? {
        Some(link) => {
            println!("{}", "🔗 Link".bright_blue().bold());
            println!();
            println!("  ID:       {}", link.id.to_string().bright_black());
            println!("  Code:     {}", link.short_code.cyan());
            println!("  URL:      {}", link.original_url);
            println!("  Created:  {}", link.created_at.to_rfc3339());
            println!(
                "  Clicks:   {}",
                link.click_count.to_string().bright_green().bold()
            );
            println!();
        }
        None => {
            println!("{}", format!("❌ No link with code '{}'", code).red());
        }
    }

    Ok(())
}

/// Handles database diagnostic commands.
///
/// Opens the database read-only; nothing is created or migrated.
async fn handle_db_action(action: DbAction, database_url: &str) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            let pool = persistence::connect_existing(database_url, CONNECT_TIMEOUT)
                .await
                .context("Failed to open database")?;
            SqliteLinkRepository::new(Arc::new(pool.clone()))
                .ping()
                .await?;
            println!("{}", "✅ Database connection OK".green().bold());

            let pending = persistence::pending_migrations(&pool).await?;
            pool.close().await;

            if pending.is_empty() {
                println!("{}", "✅ All migrations applied".green().bold());
            } else {
                println!(
                    "{}",
                    format!("⚠️  {} pending migration(s):", pending.len()).yellow()
                );
                for migration in &pending {
                    println!(
                        "  {} {}",
                        migration.version.to_string().cyan(),
                        migration.description
                    );
                }
                println!();
                println!(
                    "{}",
                    "  Start the server or run any other admin command to apply them.".bright_black()
                );
            }
        }
    }

    Ok(())
}
