use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

use crate::handlers::AppState;
use crate::models::error::{ApiError, ErrorResponse};
use crate::models::location_record::format_timestamp;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub message: &'static str,
    pub timestamp: String,
    pub locations_stored: usize,
}

pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    Ok(Json(HealthResponse {
        message: "API is running",
        timestamp: format_timestamp(Utc::now()),
        locations_stored: state.store.len().await?,
    }))
}

pub async fn index() -> Json<Value> {
    Json(json!({
        "message": "Location Tracking API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/api/health",
            "postLocation": "POST /api/location",
            "getLocations": "GET /api/location",
            "getLatest": "GET /api/location/latest"
        }
    }))
}

pub async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    let body = ErrorResponse { error: "Not found".to_string() };
    (StatusCode::NOT_FOUND, Json(body))
}
