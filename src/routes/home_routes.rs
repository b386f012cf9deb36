use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use crate::models::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "data": {
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "ok": true,
        }
    }))
}
