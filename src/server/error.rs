use crate::utils::error::FxError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// HTTP-facing wrapper around `FxError`.
#[derive(Debug)]
pub struct AppError(pub FxError);

impl From<FxError> for AppError {
    fn from(err: FxError) -> Self {
        AppError(err)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            FxError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            FxError::EmptyResult { .. } => StatusCode::NOT_FOUND,
            FxError::DataUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Converts an `AppError` into a JSON error response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match &self.0 {
            FxError::InvalidInput { .. } | FxError::EmptyResult { .. } => {
                tracing::warn!(error = %self.0, "Rejected summary request");
                self.0.user_friendly_message()
            }
            FxError::DataUnavailable { .. } => {
                tracing::error!(error = %self.0, "FX data unavailable");
                self.0.to_string()
            }
            other => {
                tracing::error!(error = ?other, "Error processing summary request");
                "Internal server error processing FX data".to_string()
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
