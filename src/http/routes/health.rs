use crate::app::HealthReport;
use crate::http::AppState;
use axum::extract::State;
use axum::Json;

pub async fn health_check(State(state): State<AppState>) -> Json<HealthReport> {
    Json(state.service.health())
}
