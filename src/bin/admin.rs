//! Admin CLI: toggles a user's role by email, directly against the
//! database. Run with the same DATABASE_URL as the server.

use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

use finwell_server::{DbOperations, Settings};

#[derive(Parser)]
#[command(name = "finwell-admin", about = "Admin tooling for the FinWell backend")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Grant the admin role to a user
    Promote { email: String },
    /// Revert a user to the standard role
    Demote { email: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();
    let settings = Settings::new().context("loading configuration")?;

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&settings.database.url)
        .await
        .context("connecting to database")?;
    let db = DbOperations::new(Arc::new(pool));

    let (email, role) = match &cli.command {
        Command::Promote { email } => (email, "admin"),
        Command::Demote { email } => (email, "user"),
    };

    let updated = db.set_user_role(email, role).await?;
    if updated == 0 {
        anyhow::bail!("no user with email {}", email);
    }

    println!("Set role '{}' for {}", role, email);
    Ok(())
}
