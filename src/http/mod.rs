pub mod auth;
pub mod error;
pub mod extract;
pub mod routes;

use crate::app::InferenceService;
use crate::config::toml_config::ServerConfig;
use crate::domain::ports::Authenticator;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<InferenceService>,
    pub auth: Arc<dyn Authenticator>,
    /// Mirrors the router's `DefaultBodyLimit`, for error messages.
    pub upload_limit: usize,
}

impl AppState {
    pub fn new(service: InferenceService, auth: Arc<dyn Authenticator>) -> Self {
        Self {
            service: Arc::new(service),
            auth,
            upload_limit: ServerConfig::default().max_upload_bytes,
        }
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    // credentials rule out wildcards, so methods and headers are mirrored
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

pub fn router(state: AppState, config: &ServerConfig) -> Router {
    let state = AppState {
        upload_limit: config.max_upload_bytes,
        ..state
    };

    let api = Router::new()
        .route("/agri-tech-disease-detect", post(routes::detect::detect_disease))
        .route("/generate-timetable", post(routes::study::generate_timetable))
        .route("/topic-video-notes", post(routes::study::topic_video_notes))
        .route("/chatbot", post(routes::assistant::chatbot))
        .route("/feedback", post(routes::assistant::submit_feedback))
        .route("/users/me", get(routes::users::read_users_me));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api/v1", api)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins))
        .with_state(state)
}
