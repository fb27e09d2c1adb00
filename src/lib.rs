pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod http;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::InferenceService;
pub use config::TomlConfig;
pub use http::{router, AppState};
pub use utils::error::{AppError, Result};

use crate::adapters::StaticTokenAuthenticator;
use std::sync::Arc;

/// Wires every dependency from configuration into a ready-to-serve router.
pub fn build_router(config: &TomlConfig) -> axum::Router {
    let service = InferenceService::from_config(config);
    let auth = StaticTokenAuthenticator::new(&config.auth.tokens);
    if auth.is_empty() {
        tracing::warn!("No bearer tokens configured; every protected endpoint will answer 401");
    }
    router(AppState::new(service, Arc::new(auth)), &config.server)
}
