use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use headway::resolver::active_trips;
use serde::Serialize;

use crate::{dto::TripDto, state::AppState};

use super::{parse_date, ApiError};

pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<TripDto>>, ApiError> {
    let dataset = state.dataset().ok_or(ApiError::NotReady)?;
    Ok(Json(dataset.trips().iter().map(TripDto::from).collect()))
}

pub async fn detail(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<TripDto>, ApiError> {
    let dataset = state.dataset().ok_or(ApiError::NotReady)?;
    let trip = dataset.trip_by_id(&id).ok_or(ApiError::NotFound(id))?;
    Ok(Json(TripDto::from(trip)))
}

#[derive(Serialize)]
pub struct TripsOnDate {
    date: String,
    trip_count: usize,
    trip_ids: Vec<String>,
}

pub async fn on_date(
    Path(date): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<TripsOnDate>, ApiError> {
    let dataset = state.dataset().ok_or(ApiError::NotReady)?;
    let parsed = parse_date(&date)?;
    let trip_ids: Vec<String> = active_trips(dataset, parsed)
        .into_iter()
        .map(|trip_idx| dataset.trip(trip_idx).id.to_string())
        .collect();
    Ok(Json(TripsOnDate {
        date,
        trip_count: trip_ids.len(),
        trip_ids,
    }))
}
