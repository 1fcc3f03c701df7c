use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::audit::{AuditEntry, ClientMeta};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{CreateDepartmentDto, Department, UpdateDepartmentDto};
use super::service::DepartmentService;

pub async fn list_departments(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<Json<Vec<Department>>, AppError> {
    let departments = DepartmentService::list(&state.db, &principal).await?;
    Ok(Json(departments))
}

pub async fn get_department(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Department>, AppError> {
    let department = DepartmentService::get(&state.db, &principal, id).await?;
    Ok(Json(department))
}

pub async fn create_department(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    meta: ClientMeta,
    ValidatedJson(dto): ValidatedJson<CreateDepartmentDto>,
) -> Result<(StatusCode, Json<Department>), AppError> {
    let department = DepartmentService::create(&state.db, &principal, dto).await?;

    state.audit.record(
        AuditEntry::new("department.create", "departments")
            .actor(principal.user_id)
            .resource_id(department.id.to_string())
            .client(&meta),
    );

    Ok((StatusCode::CREATED, Json(department)))
}

pub async fn update_department(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    meta: ClientMeta,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateDepartmentDto>,
) -> Result<Json<Department>, AppError> {
    let department = DepartmentService::update(&state.db, &principal, id, dto).await?;

    state.audit.record(
        AuditEntry::new("department.update", "departments")
            .actor(principal.user_id)
            .resource_id(id.to_string())
            .client(&meta),
    );

    Ok(Json(department))
}

pub async fn delete_department(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    meta: ClientMeta,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    DepartmentService::delete(&state.db, &principal, id).await?;

    state.audit.record(
        AuditEntry::new("department.delete", "departments")
            .actor(principal.user_id)
            .resource_id(id.to_string())
            .client(&meta),
    );

    Ok(StatusCode::NO_CONTENT)
}
