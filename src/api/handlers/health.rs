use crate::api::models::HealthResponse;
use crate::services::EnergyService;
use axum::{extract::State, Json};
use chrono::Utc;

/// Reports whether the Emporia cloud is reachable. Always 200; a failed
/// login shows up as `vue_connected: false`.
pub async fn health(State(service): State<EnergyService>) -> Json<HealthResponse> {
    let vue = service.health().await;

    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now(),
        vue_connected: vue.connected,
        devices_count: vue.devices_count,
        message: vue.message,
    })
}
