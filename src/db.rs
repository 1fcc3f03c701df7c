//! RLS-scoped transaction executor: the tenant-isolation backbone.
//!
//! Every privileged database operation runs inside a transaction whose first
//! statements bind `app.current_user_id` and `app.current_user_role` as
//! transaction-local settings via `set_config(..., true)`. The row-level
//! security policies defined in `migrations/` evaluate every statement in
//! the transaction against those settings, so queries run under the caller's
//! authority rather than a shared service identity.
//!
//! The bindings are parameter-bound, never interpolated, so a quote in the
//! identity value cannot alter the executed statement set. Because
//! `set_config` is called with `is_local = true`, the bindings die with the
//! transaction on commit or rollback; they can never leak into another
//! transaction when the pool reuses the connection.

use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use std::future::Future;
use std::pin::Pin;

use crate::middleware::auth::Principal;
use crate::utils::errors::AppError;

pub type ScopedFuture<'c, T> = Pin<Box<dyn Future<Output = Result<T, AppError>> + Send + 'c>>;

/// A transaction whose session context is bound to one principal.
///
/// Dropping the value without calling [`commit`](Self::commit) rolls the
/// transaction back, discarding the session bindings with it. There is no
/// path on which stale isolation context survives an aborted request.
pub struct RlsTransaction {
    tx: Transaction<'static, Postgres>,
}

impl RlsTransaction {
    /// Begins a transaction and binds the principal's identity and role as
    /// its first statements.
    pub async fn begin(pool: &PgPool, principal: &Principal) -> Result<Self, AppError> {
        let mut tx = pool.begin().await?;
        bind_session_context(&mut tx, &principal.user_id.to_string(), principal.role.as_str())
            .await?;
        Ok(Self { tx })
    }

    /// The connection handle scoped to this transaction. All queries issued
    /// through it are evaluated under the bound principal's RLS policies.
    pub fn conn(&mut self) -> &mut PgConnection {
        &mut self.tx
    }

    pub async fn commit(self) -> Result<(), AppError> {
        self.tx.commit().await.map_err(AppError::from)
    }
}

/// Binds the two session variables consumed by the RLS policies.
///
/// Values are passed as bind parameters; a failure here is a fatal storage
/// error for the request and is never retried.
pub async fn bind_session_context(
    conn: &mut PgConnection,
    user_id: &str,
    role: &str,
) -> Result<(), AppError> {
    sqlx::query("SELECT set_config('app.current_user_id', $1, true)")
        .bind(user_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            AppError::internal(anyhow::anyhow!("failed to bind isolation context: {}", e))
        })?;

    sqlx::query("SELECT set_config('app.current_user_role', $1, true)")
        .bind(role)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            AppError::internal(anyhow::anyhow!("failed to bind isolation context: {}", e))
        })?;

    Ok(())
}

/// Runs `work` inside an RLS-scoped transaction for `principal`.
///
/// Commits when `work` succeeds; any failure rolls the transaction back,
/// which also discards the session bindings.
pub async fn with_isolated_transaction<T, F>(
    pool: &PgPool,
    principal: &Principal,
    work: F,
) -> Result<T, AppError>
where
    F: for<'c> FnOnce(&'c mut PgConnection) -> ScopedFuture<'c, T>,
{
    let mut tx = RlsTransaction::begin(pool, principal).await?;
    let output = work(tx.conn()).await?;
    tx.commit().await?;
    Ok(output)
}
