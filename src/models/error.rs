use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

/// Failures of the location store and the actor that owns it.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read location data from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("location data in {path} is corrupt: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write location data to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize location data: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The store actor has stopped and no longer answers commands.
    #[error("location store is unavailable")]
    Unavailable,
}

/// Rejections of an inbound fix, raised before anything is stored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Latitude and longitude are required")]
    MissingCoordinates,

    #[error("Latitude must be between -90 and 90")]
    LatitudeOutOfRange,

    #[error("Longitude must be between -180 and 180")]
    LongitudeOutOfRange,

    #[error("Timestamp must be an ISO-8601 string or epoch milliseconds")]
    InvalidTimestamp,

    #[error("Invalid request body: {0}")]
    MalformedBody(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Everything a handler can fail with, mapped to a status and JSON body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Internal(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(e) => {
                debug!("Rejected location: {}", e);
                let body = ErrorResponse { error: e.to_string() };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(MessageResponse { message })).into_response()
            }
            ApiError::Internal(e) => {
                error!("Error handling request: {}", e);
                let body = ErrorResponse { error: "Internal server error".to_string() };
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}
