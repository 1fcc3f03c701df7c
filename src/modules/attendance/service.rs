use sqlx::PgPool;
use tracing::instrument;

use crate::db::with_isolated_transaction;
use crate::middleware::auth::Principal;
use crate::utils::errors::AppError;

use super::model::AttendanceRecord;

const ATTENDANCE_COLUMNS: &str = "id, user_id, clock_in, clock_out";

pub struct AttendanceService;

impl AttendanceService {
    /// Opens an attendance record for the caller. Rejected while a previous
    /// record is still open.
    #[instrument(skip(db, principal))]
    pub async fn clock_in(
        db: &PgPool,
        principal: &Principal,
    ) -> Result<AttendanceRecord, AppError> {
        let user_id = principal.user_id;
        with_isolated_transaction(db, principal, move |conn| {
            Box::pin(async move {
                let open: Option<(uuid::Uuid,)> = sqlx::query_as(
                    "SELECT id FROM attendance_records WHERE user_id = $1 AND clock_out IS NULL",
                )
                .bind(user_id)
                .fetch_optional(&mut *conn)
                .await?;

                if open.is_some() {
                    return Err(AppError::conflict("Already clocked in"));
                }

                let record = sqlx::query_as::<_, AttendanceRecord>(&format!(
                    r#"INSERT INTO attendance_records (user_id, clock_in)
                       VALUES ($1, now())
                       RETURNING {ATTENDANCE_COLUMNS}"#
                ))
                .bind(user_id)
                .fetch_one(&mut *conn)
                .await?;
                Ok(record)
            })
        })
        .await
    }

    /// Closes the caller's open attendance record.
    #[instrument(skip(db, principal))]
    pub async fn clock_out(
        db: &PgPool,
        principal: &Principal,
    ) -> Result<AttendanceRecord, AppError> {
        let user_id = principal.user_id;
        with_isolated_transaction(db, principal, move |conn| {
            Box::pin(async move {
                sqlx::query_as::<_, AttendanceRecord>(&format!(
                    r#"UPDATE attendance_records SET clock_out = now()
                       WHERE user_id = $1 AND clock_out IS NULL
                       RETURNING {ATTENDANCE_COLUMNS}"#
                ))
                .bind(user_id)
                .fetch_optional(&mut *conn)
                .await?
                .ok_or_else(|| AppError::conflict("Not clocked in"))
            })
        })
        .await
    }

    /// Lists attendance visible to the caller under the row policies.
    #[instrument(skip(db, principal))]
    pub async fn list(
        db: &PgPool,
        principal: &Principal,
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        with_isolated_transaction(db, principal, |conn| {
            Box::pin(async move {
                let records = sqlx::query_as::<_, AttendanceRecord>(&format!(
                    "SELECT {ATTENDANCE_COLUMNS} FROM attendance_records ORDER BY clock_in DESC"
                ))
                .fetch_all(&mut *conn)
                .await?;
                Ok(records)
            })
        })
        .await
    }
}
