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

use super::model::{CreateEmployeeDto, Employee, UpdateEmployeeDto};
use super::service::EmployeeService;

pub async fn list_employees(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<Json<Vec<Employee>>, AppError> {
    let employees = EmployeeService::list(&state.db, &principal).await?;
    Ok(Json(employees))
}

pub async fn get_employee(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Employee>, AppError> {
    let employee = EmployeeService::get(&state.db, &principal, id).await?;
    Ok(Json(employee))
}

pub async fn create_employee(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    meta: ClientMeta,
    ValidatedJson(dto): ValidatedJson<CreateEmployeeDto>,
) -> Result<(StatusCode, Json<Employee>), AppError> {
    let employee = EmployeeService::create(&state.db, &principal, dto).await?;

    state.audit.record(
        AuditEntry::new("employee.create", "employees")
            .actor(principal.user_id)
            .resource_id(employee.id.to_string())
            .details(json!({ "email": employee.email }))
            .client(&meta),
    );

    Ok((StatusCode::CREATED, Json(employee)))
}

pub async fn update_employee(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    meta: ClientMeta,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateEmployeeDto>,
) -> Result<Json<Employee>, AppError> {
    let employee = EmployeeService::update(&state.db, &principal, id, dto).await?;

    state.audit.record(
        AuditEntry::new("employee.update", "employees")
            .actor(principal.user_id)
            .resource_id(id.to_string())
            .client(&meta),
    );

    Ok(Json(employee))
}

pub async fn delete_employee(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    meta: ClientMeta,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    EmployeeService::delete(&state.db, &principal, id).await?;

    state.audit.record(
        AuditEntry::new("employee.delete", "employees")
            .actor(principal.user_id)
            .resource_id(id.to_string())
            .client(&meta),
    );

    Ok(StatusCode::NO_CONTENT)
}
