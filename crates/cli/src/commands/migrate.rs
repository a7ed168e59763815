//! Database migration commands.
//!
//! Migrations live in `crates/api/migrations/` as reversible
//! `<version>_<name>.up.sql` / `.down.sql` pairs and are embedded in this
//! binary at compile time.
//!
//! # Environment Variables
//!
//! - `ECOM_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)

use secrecy::SecretString;
use sqlx::PgPool;
use sqlx::migrate::{Migrate, Migrator};

static MIGRATOR: Migrator = sqlx::migrate!("../api/migrations");

#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Apply every pending migration.
///
/// # Errors
///
/// Returns `MigrationError` if the database is unreachable or a migration fails.
pub async fn up() -> Result<(), MigrationError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    MIGRATOR.run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}

/// Revert every applied migration, newest first.
///
/// # Errors
///
/// Returns `MigrationError` if the database is unreachable or a revert fails.
pub async fn down() -> Result<(), MigrationError> {
    let pool = connect().await?;

    tracing::info!("Reverting migrations...");
    MIGRATOR.undo(&pool, 0).await?;

    tracing::info!("All migrations reverted");
    Ok(())
}

/// Print each known migration and whether it has been applied.
///
/// # Errors
///
/// Returns `MigrationError` if the database is unreachable.
pub async fn status() -> Result<(), MigrationError> {
    let pool = connect().await?;
    let mut conn = pool.acquire().await?;

    conn.ensure_migrations_table().await?;
    let applied: Vec<i64> = conn
        .list_applied_migrations()
        .await?
        .into_iter()
        .map(|m| m.version)
        .collect();

    #[allow(clippy::print_stdout)]
    for migration in MIGRATOR
        .iter()
        .filter(|m| !m.migration_type.is_down_migration())
    {
        let state = if applied.contains(&migration.version) {
            "applied"
        } else {
            "pending"
        };
        println!("{:>16}  {state:<8}  {}", migration.version, migration.description);
    }

    Ok(())
}

async fn connect() -> Result<PgPool, MigrationError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("ECOM_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| MigrationError::MissingEnvVar("ECOM_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    Ok(ecom_api::db::create_pool(&SecretString::from(database_url)).await?)
}
