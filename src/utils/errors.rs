use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-level error, mapped to the wire format in [`IntoResponse`].
///
/// Authentication failures are deliberately opaque: every token problem
/// (missing, malformed, expired, wrong signature domain) collapses into
/// `Unauthorized` so callers cannot probe token validity.
#[derive(Debug)]
pub enum AppError {
    Unauthorized,
    Forbidden,
    Validation { field: String, reason: String },
    RateLimited,
    BadRequest(String),
    Unprocessable(String),
    NotFound(String),
    Conflict(String),
    Internal(anyhow::Error),
}

impl AppError {
    pub fn unauthorized() -> Self {
        Self::Unauthorized
    }

    pub fn forbidden() -> Self {
        Self::Forbidden
    }

    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::Unprocessable(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self::Internal(err.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Validation { .. } | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Unauthorized => json!({ "error": "Unauthorized" }),
            Self::Forbidden => json!({
                "error": "Forbidden",
                "message": "Insufficient permissions"
            }),
            Self::Validation { field, reason } => json!({
                "error": "Bad Request",
                "message": format!("Invalid input in field '{}': {}", field, reason)
            }),
            Self::BadRequest(message) => json!({
                "error": "Bad Request",
                "message": message
            }),
            Self::Unprocessable(message) => json!({
                "error": "Unprocessable Entity",
                "message": message
            }),
            Self::RateLimited => json!({
                "error": "Too Many Requests",
                "message": "Rate limit exceeded. Please try again later."
            }),
            Self::NotFound(message) => json!({
                "error": "Not Found",
                "message": message
            }),
            Self::Conflict(message) => json!({
                "error": "Conflict",
                "message": message
            }),
            Self::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                json!({ "error": "Internal Server Error" })
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::Internal(err.into())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}
