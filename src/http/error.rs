use crate::utils::error::AppError;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// `AppError` rendered as `{ "detail": ... }` with the matching status.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    /// Text shown to callers; internal failures keep their specifics in the logs.
    fn detail(&self) -> String {
        match &self.0 {
            AppError::ImageDecode { .. } => "Invalid or unreadable image file uploaded.".to_string(),
            AppError::ModelUnavailable { .. } => {
                "Model not loaded. Check server startup logs for model loading errors.".to_string()
            }
            AppError::InferenceFailure { .. } => "Model prediction failed due to an internal error.".to_string(),
            AppError::Io(_) | AppError::Serialization(_) | AppError::Storage { .. } => {
                "Could not save the submission. Please try again later.".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(
                "Request failed: {} (Category: {:?}). 💡 {}",
                self.0,
                self.0.category(),
                self.0.recovery_suggestion()
            );
        } else {
            tracing::debug!("Request rejected: {}", self.0);
        }

        let mut response = (status, Json(json!({ "detail": self.detail() }))).into_response();
        if matches!(self.0, AppError::Unauthorized) {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
