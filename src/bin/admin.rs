//! CLI administration tool for linkstat.
//!
//! Provisions accounts and API keys and inspects the database without going
//! through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create an account (prompts for the email when omitted)
//! cargo run --bin admin -- user create --email alice@example.com --tier pro
//!
//! # List accounts
//! cargo run --bin admin -- user list
//!
//! # Change an account's tier
//! cargo run --bin admin -- user tier 1 business
//!
//! # Issue (or rotate) an account's API key
//! cargo run --bin admin -- key issue 1
//!
//! # Revoke an account's API key
//! cargo run --bin admin -- key revoke 1
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (or the `DB_*` components): PostgreSQL connection
//! - `API_KEY_SIGNING_SECRET`: required by `key issue`, must match the server's

use linkstat::application::services::auth_service::{generate_api_key, hash_api_key};
use linkstat::config::Config;
use linkstat::domain::entities::{NewUser, SubscriptionTier};
use linkstat::domain::repositories::UserRepository;
use linkstat::infrastructure::persistence::PgUserRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing linkstat.
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
    /// Manage accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage API keys
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new account
    Create {
        /// Account email
        #[arg(short, long)]
        email: Option<String>,

        /// Subscription tier: free, pro or business
        #[arg(short, long, default_value = "free")]
        tier: SubscriptionTier,
    },

    /// List all accounts
    List,

    /// Change an account's subscription tier
    Tier {
        user_id: i64,
        tier: SubscriptionTier,
    },
}

#[derive(Subcommand)]
enum KeyAction {
    /// Issue a new API key, replacing any existing one
    Issue {
        user_id: i64,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Revoke the account's API key
    Revoke { user_id: i64 },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = Config::load_database_url()?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Key { action } => handle_key_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

fn user_repository(pool: &PgPool) -> PgUserRepository {
    PgUserRepository::new(Arc::new(pool.clone()))
}

async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let repo = user_repository(pool);

    match action {
        UserAction::Create { email, tier } => create_user(&repo, email, tier).await?,
        UserAction::List => list_users(&repo).await?,
        UserAction::Tier { user_id, tier } => {
            let user = repo
                .set_tier(user_id, tier)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to change tier: {}", e))?;

            println!(
                "{} {} is now on the {} tier (link limit {})",
                "✅".green(),
                user.email.cyan(),
                user.subscription_tier.to_string().bright_white().bold(),
                user.link_limit()
            );
        }
    }

    Ok(())
}

async fn create_user(
    repo: &PgUserRepository,
    email: Option<String>,
    tier: SubscriptionTier,
) -> Result<()> {
    println!("{}", "👤 Create Account".bright_blue().bold());
    println!();

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };

    let email = email.trim().to_string();
    if email.is_empty() || !email.contains('@') {
        anyhow::bail!("'{}' is not a valid email address", email);
    }

    let user = repo
        .create(NewUser {
            email,
            subscription_tier: tier,
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create account: {}", e))?;

    println!("{}", "✅ Account created".green().bold());
    println!("  ID:    {}", user.id.to_string().bright_white().bold());
    println!("  Email: {}", user.email.cyan());
    println!("  Tier:  {}", user.subscription_tier);
    println!();
    println!(
        "  Issue an API key with: {} admin -- key issue {}",
        "cargo run --bin".bright_cyan(),
        user.id
    );

    Ok(())
}

/// Lists all accounts.
///
/// # Output Format
///
/// ```text
/// 📋 Accounts
///
///   ID   Email                          Tier       Created            API key
///   ───────────────────────────────────────────────────────────────────────────
///   1    alice@example.com              pro        2024-01-15 10:30   yes
/// ```
async fn list_users(repo: &PgUserRepository) -> Result<()> {
    println!("{}", "📋 Accounts".bright_blue().bold());
    println!();

    let users = repo
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list accounts: {}", e))?;

    if users.is_empty() {
        println!("{}", "  No accounts found".yellow());
        return Ok(());
    }

    println!(
        "  {:<4} {:<30} {:<10} {:<18} {}",
        "ID".bright_white().bold(),
        "Email".bright_white().bold(),
        "Tier".bright_white().bold(),
        "Created".bright_white().bold(),
        "API key".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for user in &users {
        let key = if user.has_api_key {
            "yes".green()
        } else {
            "no".red()
        };

        println!(
            "  {:<4} {:<30} {:<10} {:<18} {}",
            user.id.to_string().bright_black(),
            user.email.cyan(),
            user.subscription_tier.to_string(),
            user.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            key
        );
    }

    println!();
    println!("  Total: {}", users.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

async fn handle_key_action(action: KeyAction, pool: &PgPool) -> Result<()> {
    let repo = user_repository(pool);

    match action {
        KeyAction::Issue { user_id, yes } => issue_key(&repo, user_id, yes).await?,
        KeyAction::Revoke { user_id } => revoke_key(&repo, user_id).await?,
    }

    Ok(())
}

/// Issues a fresh API key for an account.
///
/// Only the HMAC of the key is stored; the raw key is printed once.
async fn issue_key(repo: &PgUserRepository, user_id: i64, skip_confirm: bool) -> Result<()> {
    println!("{}", "🔑 Issue API Key".bright_blue().bold());
    println!();

    let secret = std::env::var("API_KEY_SIGNING_SECRET")
        .context("API_KEY_SIGNING_SECRET must be set")?;
    if secret.is_empty() {
        anyhow::bail!("API_KEY_SIGNING_SECRET must not be empty");
    }

    let user = repo
        .find_by_id(user_id)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("Account not found")?;

    println!("  Account: {}", user.email.cyan());
    if user.has_api_key {
        println!(
            "{}",
            "⚠️  The current key will stop working immediately".yellow()
        );
    }
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Issue a new key?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let api_key = generate_api_key();
    repo.set_api_key_hash(user.id, Some(hash_api_key(&secret, &api_key)))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to store key: {}", e))?;

    println!();
    println!("{}", "✅ Key issued".green().bold());
    println!("  Key: {}", api_key.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "⚠️  IMPORTANT: Save this key now! You won't be able to see it again."
            .red()
            .bold()
    );
    println!();
    println!("{}", "Example:".bright_white());
    println!(
        "  curl -H \"X-API-Key: {}\" http://localhost:3000/api/v1/links",
        api_key.bright_yellow()
    );
    println!();

    Ok(())
}

async fn revoke_key(repo: &PgUserRepository, user_id: i64) -> Result<()> {
    println!("{}", "🔒 Revoke API Key".bright_blue().bold());
    println!();

    let user = repo
        .find_by_id(user_id)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("Account not found")?;

    if !user.has_api_key {
        println!("{}", "⚠️  This account has no API key".yellow());
        return Ok(());
    }

    println!("  Account: {}", user.email.cyan());
    println!();

    let confirmed = Confirm::new()
        .with_prompt("Revoke this key?")
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    repo.set_api_key_hash(user.id, None)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke key: {}", e))?;

    println!("{}", "✅ Key revoked".green().bold());
    println!();

    Ok(())
}

/// Displays account, link and click totals.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let users_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
        .fetch_one(pool)
        .await?;

    let clicks_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clicks")
        .fetch_one(pool)
        .await?;

    println!(
        "  Accounts: {}",
        users_count.to_string().bright_green().bold()
    );
    println!(
        "  Links:    {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Clicks:   {}",
        clicks_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let migrations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await
                .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations: {}", migrations.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}
