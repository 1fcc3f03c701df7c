use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{clock_in, clock_out, list_attendance};

/// Authentication only; visibility narrowing is left to the row policies.
pub fn init_attendance_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_attendance))
        .route("/clock-in", post(clock_in))
        .route("/clock-out", post(clock_out))
}
