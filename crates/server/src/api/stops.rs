use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use geojson::{Feature, FeatureCollection};

use crate::{dto, state::AppState};

use super::ApiError;

pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FeatureCollection>, ApiError> {
    let dataset = state.dataset().ok_or(ApiError::NotReady)?;
    let features = dataset.stops().iter().map(dto::stop_feature).collect();
    Ok(Json(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }))
}

pub async fn detail(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Feature>, ApiError> {
    let dataset = state.dataset().ok_or(ApiError::NotReady)?;
    let stop = dataset.stop_by_id(&id).ok_or(ApiError::NotFound(id))?;
    Ok(Json(dto::stop_feature(stop)))
}
