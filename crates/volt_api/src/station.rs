use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use volt_core::{AmenityCategory, ChargingStation, StationFilter};

use crate::app_state::SharedState;
use crate::error::ApiError;

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationsResponse {
    pub stations: Vec<ChargingStation>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmenitiesResponse {
    pub categories: Vec<AmenityCategory>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotsResponse {
    pub slots: Vec<NaiveTime>,
}

/// List the stations of the marketplace matching the query filter
pub async fn list_stations(
    State(app_state): State<SharedState>,
    Query(filter): Query<StationFilter>,
) -> Result<Json<StationsResponse>, ApiError> {
    let marketplace = app_state.lock()?;
    let stations: Vec<ChargingStation> = filter
        .apply(&marketplace.stations)
        .into_iter()
        .cloned()
        .collect();
    tracing::info!(
        "Listing {} of {} stations",
        stations.len(),
        marketplace.stations.len()
    );
    Ok(Json(StationsResponse { stations }))
}

pub async fn get_station(
    State(app_state): State<SharedState>,
    Path(station_id): Path<String>,
) -> Result<Json<ChargingStation>, ApiError> {
    let marketplace = app_state.lock()?;
    Ok(Json(marketplace.station(&station_id)?.clone()))
}

/// Get the amenity catalog, grouped by category
pub async fn list_amenities(
    State(app_state): State<SharedState>,
) -> Result<Json<AmenitiesResponse>, ApiError> {
    let marketplace = app_state.lock()?;
    Ok(Json(AmenitiesResponse {
        categories: marketplace.catalog.categories().to_vec(),
    }))
}

pub async fn list_time_slots(
    State(app_state): State<SharedState>,
) -> Result<Json<TimeSlotsResponse>, ApiError> {
    let marketplace = app_state.lock()?;
    Ok(Json(TimeSlotsResponse {
        slots: marketplace.policy.slots.slots(),
    }))
}
