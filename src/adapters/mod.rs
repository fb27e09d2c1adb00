// Adapters layer: concrete implementations of the domain ports for external systems.

pub mod auth;
pub mod gemini;
pub mod storage;
pub mod tract_model;
pub mod youtube;

pub use auth::StaticTokenAuthenticator;
pub use gemini::GeminiClient;
pub use storage::{LocalStorage, RecordStore};
pub use tract_model::TractClassifier;
pub use youtube::YouTubeClient;
