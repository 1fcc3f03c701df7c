use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

use crate::middleware::role::require_manager;
use crate::state::AppState;

use super::controller::{create_leave_request, list_leave_requests, update_leave_status};

/// Any authenticated user may file and list leave; row policies narrow what
/// a non-manager actually sees. Only managers and above change a status.
pub fn init_leave_router(state: AppState) -> Router<AppState> {
    let approvals = Router::new()
        .route("/{id}/status", patch(update_leave_status))
        .route_layer(middleware::from_fn_with_state(state, require_manager));

    Router::new()
        .route("/", post(create_leave_request))
        .route("/", get(list_leave_requests))
        .merge(approvals)
}
