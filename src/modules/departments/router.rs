use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::middleware::role::require_hr_admin;
use crate::state::AppState;

use super::controller::{
    create_department, delete_department, get_department, list_departments, update_department,
};

pub fn init_departments_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_departments))
        .route("/", post(create_department))
        .route("/{id}", get(get_department))
        .route("/{id}", put(update_department))
        .route("/{id}", delete(delete_department))
        .route_layer(middleware::from_fn_with_state(state, require_hr_admin))
}
