use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::middleware::role::{require_hr_admin, require_manager};
use crate::state::AppState;

use super::controller::{
    create_employee, delete_employee, get_employee, list_employees, update_employee,
};

/// Reads are open to managers and above; writes to HR admins and above. The
/// two surfaces are separate sub-routers so each carries exactly one guard.
pub fn init_employees_router(state: AppState) -> Router<AppState> {
    let reads = Router::new()
        .route("/", get(list_employees))
        .route("/{id}", get(get_employee))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_manager,
        ));

    let writes = Router::new()
        .route("/", post(create_employee))
        .route("/{id}", put(update_employee))
        .route("/{id}", delete(delete_employee))
        .route_layer(middleware::from_fn_with_state(state, require_hr_admin));

    reads.merge(writes)
}
