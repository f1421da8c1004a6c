use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use headway::resolver::active_services;
use serde::Serialize;

use crate::state::AppState;

use super::{parse_date, ApiError};

#[derive(Serialize)]
pub struct ServicesOnDate {
    date: String,
    service_count: usize,
    service_ids: Vec<String>,
}

pub async fn on_date(
    Path(date): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ServicesOnDate>, ApiError> {
    let dataset = state.dataset().ok_or(ApiError::NotReady)?;
    let parsed = parse_date(&date)?;
    let mut service_ids: Vec<String> = active_services(dataset, parsed)
        .into_iter()
        .map(|service_id| service_id.to_string())
        .collect();
    service_ids.sort_unstable();
    Ok(Json(ServicesOnDate {
        date,
        service_count: service_ids.len(),
        service_ids,
    }))
}
