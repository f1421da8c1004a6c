use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::state::AppState;

mod health;
mod routes;
mod services;
mod shapes;
mod stops;
mod trips;
mod vehicles;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/shapes", get(shapes::list))
        .route("/shapes/{id}", get(shapes::detail))
        .route("/stops", get(stops::list))
        .route("/stops/{id}", get(stops::detail))
        .route("/routes", get(routes::list))
        .route("/routes/{id}", get(routes::detail))
        .route("/trips", get(trips::list))
        .route("/trips/{id}", get(trips::detail))
        .route("/services/on/{date}", get(services::on_date))
        .route("/trips/on/{date}", get(trips::on_date))
        .route("/vehicles/at/{datetime}", get(vehicles::at))
        .with_state(state)
}

/// Per-request failures, rendered as `{"error": "<message>"}` with the
/// status code as the machine-readable signal.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("unknown id \"{0}\"")]
    NotFound(String),
    #[error("dataset is not ready")]
    NotReady,
    #[error("internal error")]
    Internal,
}

impl ApiError {
    pub(crate) fn internal<E: std::fmt::Display>(err: E) -> Self {
        error!("internal error: {err}");
        Self::Internal
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::NotReady => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, ApiError> {
    let shaped = value.len() == 8 && value.bytes().all(|b| b.is_ascii_digit());
    if !shaped {
        return Err(ApiError::BadRequest(format!(
            "invalid date \"{value}\", expected YYYYMMDD"
        )));
    }
    NaiveDate::parse_from_str(value, "%Y%m%d")
        .map_err(|_| ApiError::BadRequest(format!("invalid date \"{value}\"")))
}

pub(crate) fn parse_datetime(value: &str) -> Result<NaiveDateTime, ApiError> {
    let shaped = value.len() == 19
        && value.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            10 => b == b'T',
            13 | 16 => b == b':',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return Err(ApiError::BadRequest(format!(
            "invalid datetime \"{value}\", expected YYYY-MM-DDTHH:MM:SS"
        )));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .map_err(|_| ApiError::BadRequest(format!("invalid datetime \"{value}\"")))
}
