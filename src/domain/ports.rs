use crate::domain::model::{Identity, NormalizedTensor, VideoHit};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn append_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// A loaded network. `forward` is called concurrently from the blocking pool.
pub trait Classifier: Send + Sync {
    /// One forward pass; returns the class scores for the single batch entry.
    fn forward(&self, input: &NormalizedTensor) -> Result<Vec<f32>>;

    /// Output dimension when the model declares it statically.
    fn output_classes(&self) -> Option<usize>;
}

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub temperature: Option<f32>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

#[async_trait]
pub trait VideoSearch: Send + Sync {
    /// Best match for `query`, `None` when the search returned nothing.
    async fn search(&self, query: &str) -> Result<Option<VideoHit>>;
}

pub trait Authenticator: Send + Sync {
    fn authenticate(&self, token: &str) -> Option<Identity>;
}
