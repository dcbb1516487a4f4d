use crate::api::models::{
    CustomRangeRequest, CustomRangeResponse, LiveResponse, StandardQuery, StandardResponse,
};
use crate::error::Result;
use crate::services::EnergyService;
use axum::{
    extract::{Query, State},
    Json,
};

pub async fn live(State(service): State<EnergyService>) -> Result<Json<LiveResponse>> {
    let live = service.live_power().await?;
    Ok(Json(LiveResponse { live }))
}

pub async fn custom(
    State(service): State<EnergyService>,
    Json(request): Json<CustomRangeRequest>,
) -> Result<Json<CustomRangeResponse>> {
    let usage = service
        .custom_range(
            request.start_time.as_deref(),
            request.end_time.as_deref(),
            request.scale.as_deref(),
        )
        .await?;
    Ok(Json(CustomRangeResponse { usage }))
}

pub async fn standard(
    State(service): State<EnergyService>,
    Query(params): Query<StandardQuery>,
) -> Result<Json<StandardResponse>> {
    let energy_data = service.standard_usage(params.scale.as_deref()).await?;
    Ok(Json(StandardResponse { energy_data }))
}
