use crate::app::service::{InferenceService, FEEDBACK};
use crate::domain::model::{FeedbackRecord, Identity};
use crate::utils::error::{AppError, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackRequest {
    #[serde(default)]
    pub name_display: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackResponse {
    pub message: &'static str,
}

/// Unlike the AI history entries, a feedback write failure is reported to the caller.
pub async fn submit(service: &InferenceService, identity: &Identity, request: FeedbackRequest) -> Result<FeedbackResponse> {
    if request.message.trim().is_empty() {
        return Err(AppError::BadRequest {
            message: "Feedback message cannot be empty.".to_string(),
        });
    }

    let record = FeedbackRecord {
        user_id: identity.id,
        timestamp: Utc::now(),
        name_display: request.name_display.filter(|name| !name.trim().is_empty()),
        message: request.message,
    };
    service.records().append(FEEDBACK, &record).await?;
    tracing::info!(user_id = identity.id, "Feedback submitted");

    Ok(FeedbackResponse {
        message: "Feedback submitted.",
    })
}
