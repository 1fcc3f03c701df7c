use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::json;
use uuid::Uuid;

use crate::audit::{AuditEntry, ClientMeta};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{CreateLeaveRequestDto, LeaveRequest, UpdateLeaveStatusDto};
use super::service::LeaveService;

pub async fn create_leave_request(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    meta: ClientMeta,
    ValidatedJson(dto): ValidatedJson<CreateLeaveRequestDto>,
) -> Result<(StatusCode, Json<LeaveRequest>), AppError> {
    let request = LeaveService::create(&state.db, &principal, dto).await?;

    state.audit.record(
        AuditEntry::new("leave.create", "leave_requests")
            .actor(principal.user_id)
            .resource_id(request.id.to_string())
            .client(&meta),
    );

    Ok((StatusCode::CREATED, Json(request)))
}

pub async fn list_leave_requests(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<Json<Vec<LeaveRequest>>, AppError> {
    let requests = LeaveService::list(&state.db, &principal).await?;
    Ok(Json(requests))
}

pub async fn update_leave_status(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    meta: ClientMeta,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateLeaveStatusDto>,
) -> Result<Json<LeaveRequest>, AppError> {
    let request = LeaveService::update_status(&state.db, &principal, id, dto.status).await?;

    state.audit.record(
        AuditEntry::new("leave.status", "leave_requests")
            .actor(principal.user_id)
            .resource_id(id.to_string())
            .details(json!({ "status": request.status }))
            .client(&meta),
    );

    Ok(Json(request))
}
