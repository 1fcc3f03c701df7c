use axum::{Json, extract::State, http::StatusCode};

use crate::audit::{AuditEntry, ClientMeta};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

use super::model::AttendanceRecord;
use super::service::AttendanceService;

pub async fn clock_in(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    meta: ClientMeta,
) -> Result<(StatusCode, Json<AttendanceRecord>), AppError> {
    let record = AttendanceService::clock_in(&state.db, &principal).await?;

    state.audit.record(
        AuditEntry::new("attendance.clock_in", "attendance_records")
            .actor(principal.user_id)
            .resource_id(record.id.to_string())
            .client(&meta),
    );

    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn clock_out(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    meta: ClientMeta,
) -> Result<Json<AttendanceRecord>, AppError> {
    let record = AttendanceService::clock_out(&state.db, &principal).await?;

    state.audit.record(
        AuditEntry::new("attendance.clock_out", "attendance_records")
            .actor(principal.user_id)
            .resource_id(record.id.to_string())
            .client(&meta),
    );

    Ok(Json(record))
}

pub async fn list_attendance(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<Json<Vec<AttendanceRecord>>, AppError> {
    let records = AttendanceService::list(&state.db, &principal).await?;
    Ok(Json(records))
}
