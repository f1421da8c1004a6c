use std::{collections::HashSet, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    Json,
};
use headway::resolver::vehicles_at;
use serde::{Deserialize, Serialize};

use crate::{dto, state::AppState};

use super::{parse_datetime, ApiError};

#[derive(Deserialize)]
pub struct VehicleQuery {
    routes: Option<String>,
}

#[derive(Serialize)]
pub struct VehiclesAt {
    datetime: String,
    vehicle_count: usize,
    /// `serde_json::Map` keeps keys sorted, so repeated queries serialise
    /// byte-identically.
    vehicles: serde_json::Map<String, serde_json::Value>,
}

pub async fn at(
    Path(datetime): Path<String>,
    Query(query): Query<VehicleQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<VehiclesAt>, ApiError> {
    let dataset = state.dataset().ok_or(ApiError::NotReady)?;
    let instant = parse_datetime(&datetime)?;
    let routes: Option<HashSet<String>> = query.routes.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|route_id| !route_id.is_empty())
            .map(str::to_string)
            .collect()
    });

    let positions = vehicles_at(dataset, instant, routes.as_ref());
    let mut vehicles = serde_json::Map::new();
    for (trip_id, position) in &positions {
        let feature = dto::vehicle_feature(dataset, position).map_err(ApiError::internal)?;
        vehicles.insert(
            trip_id.to_string(),
            serde_json::to_value(feature).map_err(ApiError::internal)?,
        );
    }
    Ok(Json(VehiclesAt {
        datetime,
        vehicle_count: vehicles.len(),
        vehicles,
    }))
}
