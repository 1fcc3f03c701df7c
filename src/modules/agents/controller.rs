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

use super::model::{Agent, CreateAgentDto, UpdateAgentDto};
use super::service::AgentService;

pub async fn list_agents(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<Json<Vec<Agent>>, AppError> {
    let agents = AgentService::list(&state.db, &principal).await?;
    Ok(Json(agents))
}

pub async fn get_agent(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Agent>, AppError> {
    let agent = AgentService::get(&state.db, &principal, id).await?;
    Ok(Json(agent))
}

pub async fn create_agent(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    meta: ClientMeta,
    ValidatedJson(dto): ValidatedJson<CreateAgentDto>,
) -> Result<(StatusCode, Json<Agent>), AppError> {
    let agent = AgentService::create(&state.db, &principal, dto).await?;

    state.audit.record(
        AuditEntry::new("agent.create", "agents")
            .actor(principal.user_id)
            .resource_id(agent.id.to_string())
            .details(json!({ "model": agent.model }))
            .client(&meta),
    );

    Ok((StatusCode::CREATED, Json(agent)))
}

pub async fn update_agent(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    meta: ClientMeta,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateAgentDto>,
) -> Result<Json<Agent>, AppError> {
    let agent = AgentService::update(&state.db, &principal, id, dto).await?;

    state.audit.record(
        AuditEntry::new("agent.update", "agents")
            .actor(principal.user_id)
            .resource_id(id.to_string())
            .client(&meta),
    );

    Ok(Json(agent))
}

pub async fn delete_agent(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    meta: ClientMeta,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    AgentService::delete(&state.db, &principal, id).await?;

    state.audit.record(
        AuditEntry::new("agent.delete", "agents")
            .actor(principal.user_id)
            .resource_id(id.to_string())
            .client(&meta),
    );

    Ok(StatusCode::NO_CONTENT)
}
