use axum::{
    Json, Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::get,
};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::config::cors::CorsConfig;
use crate::logging::logging_middleware;
use crate::middleware::rate_limit::{auth_rate_limit, general_rate_limit};
use crate::middleware::sanitize::sanitize_request;
use crate::modules::agents::router::init_agents_router;
use crate::modules::attendance::router::init_attendance_router;
use crate::modules::auth::router::init_auth_router;
use crate::modules::billing::router::init_billing_router;
use crate::modules::departments::router::init_departments_router;
use crate::modules::employees::router::init_employees_router;
use crate::modules::leave::router::init_leave_router;
use crate::state::AppState;

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// Builds the full application router.
///
/// Gate order on `/api` is rate limit, then sanitize, then per-route
/// authentication and role guards; each gate short-circuits the rest of the
/// pipeline on rejection. `/health` sits outside every gate.
pub fn init_router(state: AppState) -> Router {
    let cors = cors_layer(&state.cors_config);

    let api = Router::new()
        .nest(
            "/auth",
            init_auth_router().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_rate_limit,
            )),
        )
        .nest("/employees", init_employees_router(state.clone()))
        .nest("/departments", init_departments_router(state.clone()))
        .nest("/leave", init_leave_router(state.clone()))
        .nest("/attendance", init_attendance_router())
        .nest("/billing", init_billing_router(state.clone()))
        .nest("/agents", init_agents_router(state.clone()))
        .layer(middleware::from_fn(sanitize_request))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            general_rate_limit,
        ));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(cors)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}
