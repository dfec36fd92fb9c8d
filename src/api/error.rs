use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::error::ForecastError;

/// Request-level failures with their fixed wire-format bodies.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The district parameter is missing or has no trained models.
    #[error("Invalid district")]
    InvalidDistrict,

    /// The date parameter is missing or empty.
    #[error("Missing future date")]
    MissingDate,

    /// Anything that failed inside the prediction chain.
    #[error("Prediction failed: {0}")]
    PredictionFailed(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidDistrict => {
                tracing::debug!("rejected request for unknown district");
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorBody {
                        error: "Invalid district",
                        message: None,
                    }),
                )
                    .into_response()
            }
            ApiError::MissingDate => {
                tracing::debug!("rejected request without a date");
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorBody {
                        error: "Missing future date",
                        message: None,
                    }),
                )
                    .into_response()
            }
            ApiError::PredictionFailed(message) => {
                tracing::error!(error = %message, "prediction failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody {
                        error: "Prediction failed",
                        message: Some(message),
                    }),
                )
                    .into_response()
            }
        }
    }
}

impl From<ForecastError> for ApiError {
    fn from(error: ForecastError) -> Self {
        match error {
            ForecastError::UnknownDistrict(_) => ApiError::InvalidDistrict,
            other => ApiError::PredictionFailed(other.to_string()),
        }
    }
}
