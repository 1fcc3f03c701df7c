//! PostgreSQL connection pool initialization.
//!
//! The connection string is read from `DATABASE_URL`. The pool is created
//! once at startup and cloned into the application state; request handlers
//! never open their own connections.

use sqlx::PgPool;
use std::env;

/// Initializes the PostgreSQL connection pool.
///
/// # Panics
///
/// Panics if `DATABASE_URL` is unset or the database is unreachable. Both
/// are startup configuration errors with no sensible recovery.
pub async fn init_db_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database")
}
