use crate::app::notes::{self, TopicVideoRequest, TopicVideoResponse};
use crate::app::timetable::{self, TimetableRequest, TimetableResponse};
use crate::http::auth::CurrentUser;
use crate::http::error::ApiError;
use crate::http::extract::ApiJson;
use crate::http::AppState;
use axum::extract::State;
use axum::Json;

pub async fn generate_timetable(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    ApiJson(request): ApiJson<TimetableRequest>,
) -> Result<Json<TimetableResponse>, ApiError> {
    let response = timetable::generate_timetable(&state.service, &identity, request).await?;
    Ok(Json(response))
}

pub async fn topic_video_notes(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    ApiJson(request): ApiJson<TopicVideoRequest>,
) -> Result<Json<TopicVideoResponse>, ApiError> {
    let response = notes::topic_video_notes(&state.service, &identity, request).await?;
    Ok(Json(response))
}
