pub mod chatbot;
pub mod feedback;
pub mod notes;
pub mod service;
pub mod timetable;

pub use service::{HealthReport, InferenceService};
