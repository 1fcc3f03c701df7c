use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::db::with_isolated_transaction;
use crate::middleware::auth::Principal;
use crate::utils::errors::AppError;

use super::model::{CreateLeaveRequestDto, LeaveRequest, LeaveStatus};

const LEAVE_COLUMNS: &str = "id, user_id, start_date, end_date, reason, status, created_at";

pub struct LeaveService;

impl LeaveService {
    /// Files a leave request for the caller. The owning `user_id` always
    /// comes from the principal, never from the request body.
    #[instrument(skip(db, principal, dto))]
    pub async fn create(
        db: &PgPool,
        principal: &Principal,
        dto: CreateLeaveRequestDto,
    ) -> Result<LeaveRequest, AppError> {
        if dto.end_date < dto.start_date {
            return Err(AppError::bad_request("end_date must not precede start_date"));
        }

        let user_id = principal.user_id;
        with_isolated_transaction(db, principal, move |conn| {
            Box::pin(async move {
                let request = sqlx::query_as::<_, LeaveRequest>(&format!(
                    r#"INSERT INTO leave_requests (user_id, start_date, end_date, reason, status)
                       VALUES ($1, $2, $3, $4, $5)
                       RETURNING {LEAVE_COLUMNS}"#
                ))
                .bind(user_id)
                .bind(dto.start_date)
                .bind(dto.end_date)
                .bind(&dto.reason)
                .bind(LeaveStatus::Pending.as_str())
                .fetch_one(&mut *conn)
                .await?;
                Ok(request)
            })
        })
        .await
    }

    /// Lists leave requests visible to the caller. Employees see their own
    /// rows; managers and above see everything, all enforced by row policies
    /// rather than a WHERE clause here.
    #[instrument(skip(db, principal))]
    pub async fn list(db: &PgPool, principal: &Principal) -> Result<Vec<LeaveRequest>, AppError> {
        with_isolated_transaction(db, principal, |conn| {
            Box::pin(async move {
                let requests = sqlx::query_as::<_, LeaveRequest>(&format!(
                    "SELECT {LEAVE_COLUMNS} FROM leave_requests ORDER BY created_at DESC"
                ))
                .fetch_all(&mut *conn)
                .await?;
                Ok(requests)
            })
        })
        .await
    }

    #[instrument(skip(db, principal))]
    pub async fn update_status(
        db: &PgPool,
        principal: &Principal,
        id: Uuid,
        status: LeaveStatus,
    ) -> Result<LeaveRequest, AppError> {
        with_isolated_transaction(db, principal, move |conn| {
            Box::pin(async move {
                sqlx::query_as::<_, LeaveRequest>(&format!(
                    r#"UPDATE leave_requests SET status = $2
                       WHERE id = $1
                       RETURNING {LEAVE_COLUMNS}"#
                ))
                .bind(id)
                .bind(status.as_str())
                .fetch_optional(&mut *conn)
                .await?
                .ok_or_else(|| AppError::not_found("Leave request not found"))
            })
        })
        .await
    }
}
