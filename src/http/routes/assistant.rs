use crate::app::chatbot::{self, ChatRequest, ChatResponse};
use crate::app::feedback::{self, FeedbackRequest, FeedbackResponse};
use crate::http::auth::CurrentUser;
use crate::http::error::ApiError;
use crate::http::extract::ApiJson;
use crate::http::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

pub async fn chatbot(
    State(state): State<AppState>,
    CurrentUser(_identity): CurrentUser,
    ApiJson(request): ApiJson<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    Ok(Json(chatbot::answer(&state.service, request).await?))
}

pub async fn submit_feedback(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    ApiJson(request): ApiJson<FeedbackRequest>,
) -> Result<(StatusCode, Json<FeedbackResponse>), ApiError> {
    let response = feedback::submit(&state.service, &identity, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
