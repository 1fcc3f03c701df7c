use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use uuid::Uuid;

use crate::modules::auth::model::Role;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::verify_access_token;

/// The authenticated identity attached to a request.
///
/// Built from a verified access token; lives only for the duration of one
/// request and is never persisted by this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub role: Role,
}

/// Extractor that verifies the bearer token and yields the [`Principal`].
///
/// Every failure mode here (missing header, malformed header, bad signature,
/// expired token, wrong signature domain) is reported as the same opaque 401.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(AppError::unauthorized)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(AppError::unauthorized)?;

        let claims = verify_access_token(token, &state.jwt_config)?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::unauthorized())?;

        Ok(AuthUser(Principal {
            user_id,
            role: claims.role,
        }))
    }
}
