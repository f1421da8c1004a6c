use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

use super::ApiError;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthBody {
    status: &'static str,
    shapes_loaded: usize,
    stops_loaded: usize,
    routes_loaded: usize,
    trips_loaded: usize,
    stop_times_loaded: usize,
    calendar_loaded: usize,
    calendar_dates_loaded: usize,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthBody>, ApiError> {
    let dataset = state.dataset().ok_or(ApiError::NotReady)?;
    let counts = dataset.counts();
    Ok(Json(HealthBody {
        status: "ok",
        shapes_loaded: counts.shapes,
        stops_loaded: counts.stops,
        routes_loaded: counts.routes,
        trips_loaded: counts.trips,
        stop_times_loaded: counts.stop_times,
        calendar_loaded: counts.calendars,
        calendar_dates_loaded: counts.calendar_dates,
    }))
}
