//! Routers de la API
//!
//! Monta los routers de cada recurso bajo `/api` con las capas de trazas y CORS.

pub mod report_routes;
pub mod trip_routes;
pub mod vehicle_routes;

use axum::{extract::State, response::Json, routing::get, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::config::StorageBackend;
use crate::middleware::cors_layer;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health))
        .nest("/api/vehicles", vehicle_routes::create_vehicle_router())
        .nest("/api/trips", trip_routes::create_trip_router())
        .nest("/api/reports", report_routes::create_report_router())
        .route("/api/owner-group", get(report_routes::get_owner_group))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Endpoint de salud
async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let storage = match state.config.storage_backend {
        StorageBackend::Postgres => "postgres",
        StorageBackend::Memory => "memory",
    };
    Json(json!({
        "status": "ok",
        "storage": storage,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
