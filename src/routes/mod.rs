use crate::models::AppState;
use axum::Router;

pub mod appointment_routes;
pub mod blocked_time_routes;
pub mod home_routes;
pub mod schedule_routes;

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", appointment_routes::router())
        .nest("/api/v1", blocked_time_routes::router())
        .nest("/api/v1", schedule_routes::router())
        .merge(home_routes::router())
        .with_state(state)
}
