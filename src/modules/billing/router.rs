use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::middleware::role::require_hr_admin;
use crate::state::AppState;

use super::controller::{create_billing_record, list_billing_records};

pub fn init_billing_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_billing_records))
        .route("/", post(create_billing_record))
        .route_layer(middleware::from_fn_with_state(state, require_hr_admin))
}
