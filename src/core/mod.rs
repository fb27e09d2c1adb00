pub mod advisor;
pub mod classifier;
pub mod decoder;
pub mod normalizer;
pub mod orchestrator;

pub use crate::domain::model::{Dependency, DetectionReport, NormalizedTensor, RawImage};
pub use crate::domain::ports::{Classifier, Storage, TextGenerator, VideoSearch};
pub use crate::utils::error::Result;
