//! Per-client request rate limiting.
//!
//! Two keyed limiters share the process: a general one covering all `/api`
//! traffic and a stricter one layered on credential endpoints. Counters are
//! keyed by client identity (forwarded IP falling back to peer address),
//! updated atomically by the governor state store, and reset as their
//! window replenishes. State is process-local; nothing survives a restart.

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use governor::{RateLimiter, clock::DefaultClock, state::keyed::DefaultKeyedStateStore};
use std::net::SocketAddr;

use crate::config::rate_limit::RateLimitConfig;
use crate::state::AppState;
use crate::utils::errors::AppError;

type KeyedLimiter = RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

/// The shared limiter pair, constructed once from config at startup.
pub struct ApiRateLimiter {
    general: KeyedLimiter,
    auth: KeyedLimiter,
}

impl ApiRateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            general: RateLimiter::keyed(config.general_quota()),
            auth: RateLimiter::keyed(config.auth_quota()),
        }
    }

    pub fn check_general(&self, key: &str) -> Result<(), AppError> {
        self.general
            .check_key(&key.to_string())
            .map_err(|_| AppError::RateLimited)
    }

    pub fn check_auth(&self, key: &str) -> Result<(), AppError> {
        self.auth
            .check_key(&key.to_string())
            .map_err(|_| AppError::RateLimited)
    }
}

fn client_key(req: &Request) -> String {
    if let Some(forwarded) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        return forwarded.to_string();
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Global limiter applied to the whole `/api` surface.
pub async fn general_rate_limit(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    state.rate_limiter.check_general(&client_key(&req))?;
    Ok(next.run(req).await)
}

/// Stricter limiter layered on login, registration, and refresh.
pub async fn auth_rate_limit(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    state.rate_limiter.check_auth(&client_key(&req))?;
    Ok(next.run(req).await)
}
