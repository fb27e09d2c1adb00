use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Uploaded image bytes as received, before any decoding.
#[derive(Debug, Clone)]
pub struct RawImage {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    pub file_name: Option<String>,
}

impl RawImage {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            content_type: None,
            file_name: None,
        }
    }
}

/// Batched NHWC `f32` tensor of shape `(1, H, W, 3)`.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTensor {
    data: Vec<f32>,
    height: usize,
    width: usize,
}

impl NormalizedTensor {
    pub const CHANNELS: usize = 3;

    /// Returns `None` when `data` does not hold exactly `height * width * 3` values.
    pub fn from_nhwc(data: Vec<f32>, height: usize, width: usize) -> Option<Self> {
        if data.len() != height * width * Self::CHANNELS {
            return None;
        }
        Some(Self { data, height, width })
    }

    pub fn shape(&self) -> [usize; 4] {
        [1, self.height, self.width, Self::CHANNELS]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Value at `(0, y, x, c)`.
    pub fn get(&self, y: usize, x: usize, c: usize) -> Option<f32> {
        if y >= self.height || x >= self.width || c >= Self::CHANNELS {
            return None;
        }
        self.data.get((y * self.width + x) * Self::CHANNELS + c).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassIndex(pub usize);

/// Winning class of a forward pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub index: ClassIndex,
    pub confidence: f32,
}

/// Readiness of a dependency resolved once at startup.
#[derive(Debug, Clone)]
pub enum Dependency<T> {
    Ready(T),
    Unavailable { reason: String },
}

impl<T> Dependency<T> {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Dependency::Unavailable { reason: reason.into() }
    }

    pub fn status(&self) -> DependencyStatus {
        match self {
            Dependency::Ready(_) => DependencyStatus {
                ready: true,
                reason: None,
            },
            Dependency::Unavailable { reason } => DependencyStatus {
                ready: false,
                reason: Some(reason.clone()),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DependencyStatus {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub email: String,
    pub username: String,
}

/// Outcome of one completed detection.
#[derive(Debug, Clone)]
pub struct DetectionReport {
    pub raw_label: String,
    pub display_label: String,
    pub class_index: ClassIndex,
    pub confidence: f32,
    pub cure_text: String,
    pub advisory_degraded: bool,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoHit {
    pub title: String,
    pub video_id: String,
}

impl VideoHit {
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectLoad {
    pub subject: String,
    pub chapters: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub user_id: i64,
    pub timestamp: DateTime<Utc>,
    pub name_display: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableRecord {
    pub user_id: i64,
    pub timestamp: DateTime<Utc>,
    pub input_constraints_json: String,
    pub schedule_markdown: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoNoteRecord {
    pub user_id: i64,
    pub timestamp: DateTime<Utc>,
    pub topic: String,
    pub language: String,
    pub video_title: String,
    pub video_url: String,
    pub notes_markdown: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionRecord {
    pub user_id: i64,
    pub timestamp: DateTime<Utc>,
    pub disease: String,
    pub language: String,
    pub cure_text: String,
}
