use axum::{Json, extract::State, http::StatusCode};
use serde_json::json;

use crate::audit::{AuditEntry, ClientMeta};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{LoginRequest, LoginResponse, RefreshRequest, RegisterRequestDto, TokenPairResponse, User};
use super::service::AuthService;

pub async fn register_user(
    State(state): State<AppState>,
    meta: ClientMeta,
    ValidatedJson(dto): ValidatedJson<RegisterRequestDto>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = AuthService::register_user(&state.db, dto).await?;

    state.audit.record(
        AuditEntry::new("user.register", "users")
            .actor(user.id)
            .resource_id(user.id.to_string())
            .details(json!({ "email": user.email }))
            .client(&meta),
    );

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login_user(
    State(state): State<AppState>,
    meta: ClientMeta,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthService::login_user(&state.db, dto, &state.jwt_config).await?;

    state.audit.record(
        AuditEntry::new("auth.login", "users")
            .actor(response.user.id)
            .resource_id(response.user.id.to_string())
            .client(&meta),
    );

    Ok(Json(response))
}

pub async fn refresh_token(
    State(state): State<AppState>,
    meta: ClientMeta,
    ValidatedJson(dto): ValidatedJson<RefreshRequest>,
) -> Result<Json<TokenPairResponse>, AppError> {
    let (user_id, tokens) = AuthService::refresh_tokens(&state.db, dto, &state.jwt_config).await?;

    state.audit.record(
        AuditEntry::new("auth.refresh", "users")
            .actor(user_id)
            .resource_id(user_id.to_string())
            .client(&meta),
    );

    Ok(Json(tokens))
}
