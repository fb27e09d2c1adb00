use crate::adapters::{GeminiClient, LocalStorage, RecordStore, TractClassifier, YouTubeClient};
use crate::config::toml_config::{ModelConfig, TomlConfig};
use crate::core::advisor::{CureAdvisor, SharedTextGenerator};
use crate::core::classifier::DiseaseClassifier;
use crate::core::decoder::LabelDecoder;
use crate::core::normalizer::ImageNormalizer;
use crate::core::orchestrator::DetectionPipeline;
use crate::domain::model::{
    Dependency, DependencyStatus, DetectionRecord, DetectionReport, Identity, RawImage,
};
use crate::domain::ports::VideoSearch;
use crate::utils::error::{AppError, Result};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

pub type SharedVideoSearch = Arc<dyn VideoSearch>;

pub const DETECTIONS: &str = "detections";
pub const FEEDBACK: &str = "feedback";
pub const TIMETABLES: &str = "timetables";
pub const VIDEO_NOTES: &str = "video_notes";

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub uptime_seconds: u64,
    pub classifier: DependencyStatus,
    pub text_generation: DependencyStatus,
    pub video_search: DependencyStatus,
}

/// Every collaborator the request handlers need, resolved once at startup.
pub struct InferenceService {
    detection: DetectionPipeline,
    text: Dependency<SharedTextGenerator>,
    search: Dependency<SharedVideoSearch>,
    records: RecordStore<LocalStorage>,
    log_detections: bool,
    started_at: Instant,
}

impl InferenceService {
    pub fn new(
        normalizer: ImageNormalizer,
        classifier: Dependency<DiseaseClassifier>,
        text: Dependency<SharedTextGenerator>,
        search: Dependency<SharedVideoSearch>,
        records: RecordStore<LocalStorage>,
    ) -> Self {
        let advisor = CureAdvisor::new(text.clone());
        Self {
            detection: DetectionPipeline::new(normalizer, classifier, advisor),
            text,
            search,
            records,
            log_detections: false,
            started_at: Instant::now(),
        }
    }

    pub fn with_detection_log(mut self, enabled: bool) -> Self {
        self.log_detections = enabled;
        self
    }

    /// Never fails: a dependency that cannot be built is recorded as unavailable.
    pub fn from_config(config: &TomlConfig) -> Self {
        let normalizer = ImageNormalizer::new(
            config.model.input_height,
            config.model.input_width,
            config.model.architecture,
        );

        let classifier = match load_classifier(&config.model) {
            Ok(classifier) => {
                tracing::info!("✅ Disease classifier ready ({} classes)", classifier.decoder().len());
                Dependency::Ready(classifier)
            }
            Err(e) => {
                tracing::error!("❌ Failed to load classifier, detection will answer 503: {}", e);
                tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
                Dependency::unavailable(e.to_string())
            }
        };

        let text: Dependency<SharedTextGenerator> = match config.genai.resolved_api_key() {
            Some(key) => Dependency::Ready(Arc::new(GeminiClient::new(
                config.genai.base_url.clone(),
                config.genai.model.clone(),
                key,
            ))),
            None => {
                tracing::warn!("GEMINI_API_KEY not found. AI text features will return placeholders.");
                Dependency::unavailable("GEMINI_API_KEY not set")
            }
        };

        let search: Dependency<SharedVideoSearch> = match config.search.resolved_api_key() {
            Some(key) => Dependency::Ready(Arc::new(YouTubeClient::new(config.search.base_url.clone(), key))),
            None => {
                tracing::warn!("YOUTUBE_API_KEY not found. Video search will return placeholders.");
                Dependency::unavailable("YOUTUBE_API_KEY not set")
            }
        };

        let records = RecordStore::new(LocalStorage::new(config.storage.data_dir.clone()));

        Self::new(normalizer, classifier, text, search, records).with_detection_log(config.storage.log_detections)
    }

    pub fn text(&self) -> &Dependency<SharedTextGenerator> {
        &self.text
    }

    pub fn search(&self) -> &Dependency<SharedVideoSearch> {
        &self.search
    }

    pub fn records(&self) -> &RecordStore<LocalStorage> {
        &self.records
    }

    pub fn health(&self) -> HealthReport {
        let classifier = self.detection.classifier().status();
        HealthReport {
            status: if classifier.ready { "ok" } else { "degraded" },
            uptime_seconds: self.started_at.elapsed().as_secs(),
            classifier,
            text_generation: self.text.status(),
            video_search: self.search.status(),
        }
    }

    pub async fn detect(&self, identity: &Identity, image: RawImage, language: &str) -> Result<DetectionReport> {
        let report = self.detection.run(image, language).await?;

        if self.log_detections {
            let record = DetectionRecord {
                user_id: identity.id,
                timestamp: Utc::now(),
                disease: report.raw_label.clone(),
                language: report.language.clone(),
                cure_text: report.cure_text.clone(),
            };
            if let Err(e) = self.records.append(DETECTIONS, &record).await {
                tracing::warn!("Failed to log detection: {}", e);
            }
        }

        Ok(report)
    }
}

fn load_classifier(config: &ModelConfig) -> Result<DiseaseClassifier> {
    let decoder = LabelDecoder::from_file(&config.class_names_path).map_err(|e| AppError::Config {
        message: format!(
            "class-name artifact {} could not be loaded: {}",
            config.class_names_path.display(),
            e
        ),
    })?;
    let model = TractClassifier::load(&config.model_path, config.input_height, config.input_width)?;
    DiseaseClassifier::new(Arc::new(model), decoder)
}
