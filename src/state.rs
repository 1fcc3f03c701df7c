use sqlx::PgPool;
use std::sync::Arc;

use crate::audit::AuditLogger;
use crate::config::cors::CorsConfig;
use crate::config::database::init_db_pool;
use crate::config::jwt::JwtConfig;
use crate::config::rate_limit::RateLimitConfig;
use crate::middleware::rate_limit::ApiRateLimiter;

/// Shared application state. Configuration is loaded once at startup; the
/// rate limiter holds the only mutable state shared across requests.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
    pub rate_limiter: Arc<ApiRateLimiter>,
    pub audit: AuditLogger,
}

impl AppState {
    /// Builds state from an existing pool and explicit configs. Used by
    /// tests to inject strict rate limits and known secrets.
    pub fn new(
        db: PgPool,
        jwt_config: JwtConfig,
        cors_config: CorsConfig,
        rate_limit_config: RateLimitConfig,
    ) -> Self {
        Self {
            audit: AuditLogger::new(db.clone()),
            rate_limiter: Arc::new(ApiRateLimiter::new(&rate_limit_config)),
            db,
            jwt_config,
            cors_config,
            rate_limit_config,
        }
    }
}

pub async fn init_app_state() -> AppState {
    AppState::new(
        init_db_pool().await,
        JwtConfig::from_env(),
        CorsConfig::from_env(),
        RateLimitConfig::from_env(),
    )
}
