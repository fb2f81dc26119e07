use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::handlers::AppState;
use crate::models::error::{ApiError, ValidationError};
use crate::models::location_record::LocationRecord;
use crate::models::payload::LocationPayload;

#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub message: &'static str,
    pub data: LocationRecord,
}

#[derive(Debug, Serialize)]
pub struct RecordsResponse {
    pub message: &'static str,
    pub count: usize,
    pub data: Vec<LocationRecord>,
}

/// First `limit` in the query string, read like `parseInt`: leading digits,
/// optional `+`. Zero, negative and non-numeric values fall back to the
/// store's default window.
fn limit_param(params: &[(String, String)]) -> Option<usize> {
    let raw = params.iter().find(|(key, _)| key == "limit")?.1.trim_start();
    let raw = raw.strip_prefix('+').unwrap_or(raw);
    let end = raw.find(|c: char| !c.is_ascii_digit()).unwrap_or(raw.len());
    raw[..end].parse::<usize>().ok().filter(|&n| n > 0)
}

pub async fn ingest(
    State(state): State<AppState>,
    payload: Result<Json<LocationPayload>, JsonRejection>,
) -> Result<Json<RecordResponse>, ApiError> {
    let Json(payload) =
        payload.map_err(|e| ValidationError::MalformedBody(e.body_text()))?;
    let fix = payload.validate(Utc::now())?;
    let record = state.store.append(fix).await?;

    Ok(Json(RecordResponse {
        message: "Location received successfully",
        data: record,
    }))
}

pub async fn recent(
    State(state): State<AppState>,
    params: Option<Query<Vec<(String, String)>>>,
) -> Result<Json<RecordsResponse>, ApiError> {
    let limit = params.and_then(|Query(params)| limit_param(&params));
    let records = state.store.recent(limit).await?;

    Ok(Json(RecordsResponse {
        message: "Location data retrieved successfully",
        count: records.len(),
        data: records,
    }))
}

pub async fn latest(State(state): State<AppState>) -> Result<Json<RecordResponse>, ApiError> {
    let record = state
        .store
        .latest()
        .await?
        .ok_or_else(|| ApiError::NotFound("No location data available".to_string()))?;

    Ok(Json(RecordResponse {
        message: "Latest location retrieved successfully",
        data: record,
    }))
}
