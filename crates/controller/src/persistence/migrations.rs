use std::str::FromStr;

use sqlx::{
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use super::Db;
use crate::Result;

pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Open (and create if missing) the SQLite pool for the registry.
pub async fn init_pool(url: &str) -> Result<Db> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &Db) -> Result<()> {
    MIGRATOR.run(pool).await?;
    Ok(())
}
