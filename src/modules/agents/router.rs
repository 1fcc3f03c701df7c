use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::middleware::role::require_super_admin;
use crate::state::AppState;

use super::controller::{create_agent, delete_agent, get_agent, list_agents, update_agent};

/// Agent management is the most privileged surface; the whole router sits
/// behind the super-admin guard.
pub fn init_agents_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_agents))
        .route("/", post(create_agent))
        .route("/{id}", get(get_agent))
        .route("/{id}", put(update_agent))
        .route("/{id}", delete(delete_agent))
        .route_layer(middleware::from_fn_with_state(state, require_super_admin))
}
