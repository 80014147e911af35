//! Create a user out of band; the HTTP API has no registration endpoint.

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use merch_store::{auth::services::register_user, db, ledger::PgLedger};

#[derive(Debug, Parser)]
#[command(name = "add-user", about = "Create a merch-store user")]
struct Args {
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
    #[arg(long)]
    username: String,
    #[arg(long, env = "ADD_USER_PASSWORD", hide_env_values = true)]
    password: String,
    /// Starting balance.
    #[arg(long, default_value_t = 1000)]
    coins: i64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "merch_store=info".into()))
        .init();

    let args = Args::parse();
    let pool = db::connect(&args.database_url, 1, Duration::from_secs(10)).await?;
    db::migrate(&pool).await?;

    let ledger = PgLedger::new(pool, Duration::from_secs(10));
    let user = register_user(&ledger, &args.username, &args.password, args.coins)
        .await
        .with_context(|| format!("create user {}", args.username))?;

    tracing::info!(user_id = %user.id, username = %user.username, coins = user.coins, "user created");
    Ok(())
}
