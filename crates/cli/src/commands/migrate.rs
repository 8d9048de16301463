//! Database migration command.
//!
//! Applies `crates/server/migrations/` to the database named by
//! `SHETI_DATABASE_URL`. The server never migrates on startup.

use super::{CommandError, database_url};

/// Apply pending migrations.
///
/// # Errors
///
/// Returns an error if the URL is missing, the database is unreachable, or a
/// migration fails.
pub async fn run() -> Result<(), CommandError> {
    let url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = sheti_server::db::create_pool(&url).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
