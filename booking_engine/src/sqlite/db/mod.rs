//! # SQLite Database methods
//!
//! This module contains "low-level" SQLite database interactions.
//!
//! All these interactions are maintained by simple functions (rather than stateful structs) that accept a
//! `&mut SqliteConnection` argument. Callers can obtain a connection from a pool, or create an atomic transaction
//! as the need arises and call through to the functions without any other changes.
use std::{env, str::FromStr};

use log::info;
use sqlx::{
    migrate,
    migrate::MigrateError,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Error as SqlxError,
    SqlitePool,
};

pub mod bookings;
pub mod tours;
pub mod users;

const SQLITE_DB_URL: &str = "sqlite://data/bookings.db";

pub fn db_url() -> String {
    let result = env::var("TBS_DATABASE_URL").unwrap_or_else(|_| {
        info!("TBS_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("Using database URL: {result}");
    result
}

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await?;
    Ok(pool)
}

/// Applies the embedded migrations to the given pool. Safe to call on every startup; already-applied migrations
/// are skipped.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), MigrateError> {
    migrate!("./migrations").run(pool).await?;
    info!("🗃️ Database migrations complete");
    Ok(())
}
