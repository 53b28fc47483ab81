use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/records", post(handlers::submit_form))
        .route("/export", get(handlers::export))
        .route("/api/records", get(handlers::get_records).post(handlers::post_record))
        .route("/api/charts", get(handlers::get_charts))
        .with_state(state)
}
