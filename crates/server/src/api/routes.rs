use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{dto::RouteDto, state::AppState};

use super::ApiError;

pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<RouteDto>>, ApiError> {
    let dataset = state.dataset().ok_or(ApiError::NotReady)?;
    Ok(Json(dataset.routes().iter().map(RouteDto::from).collect()))
}

pub async fn detail(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<RouteDto>, ApiError> {
    let dataset = state.dataset().ok_or(ApiError::NotReady)?;
    let route = dataset.route_by_id(&id).ok_or(ApiError::NotFound(id))?;
    Ok(Json(RouteDto::from(route)))
}
