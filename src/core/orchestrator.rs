use crate::core::advisor::{cure_placeholder, CureAdvisor};
use crate::core::classifier::DiseaseClassifier;
use crate::core::decoder::display_label;
use crate::core::normalizer::ImageNormalizer;
use crate::domain::model::{Dependency, DetectionReport, RawImage};
use crate::utils::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionStage {
    Received,
    DecodedImage,
    Classified,
    LabelResolved,
    CureGenerated,
    Responded,
    RejectedBadImage,
    RejectedModelUnavailable,
}

struct StageTracker {
    current: DetectionStage,
}

impl StageTracker {
    fn new() -> Self {
        Self {
            current: DetectionStage::Received,
        }
    }

    fn enter(&mut self, next: DetectionStage) {
        tracing::debug!(from = ?self.current, to = ?next, "Detection stage");
        self.current = next;
    }
}

/// Image -> tensor -> class -> label -> cure text, one request at a time.
pub struct DetectionPipeline {
    normalizer: ImageNormalizer,
    classifier: Dependency<DiseaseClassifier>,
    advisor: CureAdvisor,
}

impl DetectionPipeline {
    pub fn new(normalizer: ImageNormalizer, classifier: Dependency<DiseaseClassifier>, advisor: CureAdvisor) -> Self {
        Self {
            normalizer,
            classifier,
            advisor,
        }
    }

    pub fn classifier(&self) -> &Dependency<DiseaseClassifier> {
        &self.classifier
    }

    pub async fn run(&self, image: RawImage, language: &str) -> Result<DetectionReport> {
        let mut stage = StageTracker::new();

        // checked before touching the upload
        let classifier = match &self.classifier {
            Dependency::Ready(classifier) => classifier.clone(),
            Dependency::Unavailable { reason } => {
                stage.enter(DetectionStage::RejectedModelUnavailable);
                return Err(AppError::ModelUnavailable { reason: reason.clone() });
            }
        };

        let normalizer = self.normalizer.clone();
        let tensor = match run_blocking(move || normalizer.normalize(&image)).await {
            Ok(tensor) => tensor,
            Err(e @ (AppError::ImageDecode { .. } | AppError::ImageShape { .. })) => {
                stage.enter(DetectionStage::RejectedBadImage);
                tracing::info!(error = %e, "Rejected upload");
                return Err(e);
            }
            Err(e) => return Err(into_inference_failure(e)),
        };
        stage.enter(DetectionStage::DecodedImage);

        let model = classifier.clone();
        let prediction = run_blocking(move || model.predict(&tensor))
            .await
            .map_err(into_inference_failure)?;
        stage.enter(DetectionStage::Classified);

        let raw_label = classifier.decoder().decode(prediction.index).to_string();
        stage.enter(DetectionStage::LabelResolved);
        tracing::info!(
            disease = %raw_label,
            class_index = prediction.index.0,
            confidence = prediction.confidence,
            "Classified upload"
        );

        let advisory = self.advisor.advise(&raw_label, language).await;
        let advisory_degraded = advisory.is_degraded();
        let cure_text = advisory.text_or_else(|reason| cure_placeholder(&raw_label, reason));
        stage.enter(DetectionStage::CureGenerated);

        let report = DetectionReport {
            display_label: display_label(&raw_label),
            raw_label,
            class_index: prediction.index,
            confidence: prediction.confidence,
            cure_text,
            advisory_degraded,
            language: language.to_string(),
        };
        stage.enter(DetectionStage::Responded);

        Ok(report)
    }
}

async fn run_blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::InferenceFailure {
            message: format!("inference task aborted: {}", e),
        })?
}

fn into_inference_failure(err: AppError) -> AppError {
    match err {
        AppError::InferenceFailure { .. } => err,
        other => AppError::InferenceFailure {
            message: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::advisor::SharedTextGenerator;
    use crate::core::decoder::LabelDecoder;
    use crate::core::normalizer::Architecture;
    use crate::domain::model::NormalizedTensor;
    use crate::domain::ports::{Classifier, GenerationRequest, TextGenerator};
    use async_trait::async_trait;
    use image::{DynamicImage, GrayImage, ImageFormat, Luma};
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingModel {
        calls: AtomicUsize,
        fail: bool,
    }

    impl Classifier for CountingModel {
        fn forward(&self, input: &NormalizedTensor) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(input.shape(), [1, 32, 32, 3]);
            if self.fail {
                return Err(AppError::InferenceFailure {
                    message: "kernel exploded".to_string(),
                });
            }
            Ok(vec![0.05, 0.9, 0.05])
        }

        fn output_classes(&self) -> Option<usize> {
            Some(3)
        }
    }

    struct Echo;

    #[async_trait]
    impl TextGenerator for Echo {
        async fn generate(&self, request: &GenerationRequest) -> Result<String> {
            Ok(format!("advice for: {}", request.prompt.len()))
        }
    }

    fn png_bytes() -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageLuma8(GrayImage::from_pixel(300, 300, Luma([120])))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn pipeline(model: Arc<CountingModel>, text: Dependency<SharedTextGenerator>) -> DetectionPipeline {
        let decoder = LabelDecoder::new(vec![
            "Tomato___Bacterial_spot".to_string(),
            "Tomato___Early_blight".to_string(),
            "Tomato___healthy".to_string(),
        ])
        .unwrap();
        let classifier = DiseaseClassifier::new(model, decoder).unwrap();
        DetectionPipeline::new(
            ImageNormalizer::new(32, 32, Architecture::ResNet50),
            Dependency::Ready(classifier),
            CureAdvisor::new(text),
        )
    }

    fn counting(fail: bool) -> Arc<CountingModel> {
        Arc::new(CountingModel {
            calls: AtomicUsize::new(0),
            fail,
        })
    }

    #[tokio::test]
    async fn test_successful_detection() {
        let model = counting(false);
        let pipeline = pipeline(model.clone(), Dependency::Ready(Arc::new(Echo)));

        let report = pipeline.run(RawImage::new(png_bytes()), "Hindi").await.unwrap();
        assert_eq!(report.raw_label, "Tomato___Early_blight");
        assert_eq!(report.display_label, "Tomato Early blight");
        assert_eq!(report.language, "Hindi");
        assert!(!report.advisory_degraded);
        assert!(report.cure_text.starts_with("advice for:"));
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unavailable_model_short_circuits_before_decode() {
        let pipeline = DetectionPipeline::new(
            ImageNormalizer::new(32, 32, Architecture::ResNet50),
            Dependency::unavailable("model file missing"),
            CureAdvisor::new(Dependency::Ready(Arc::new(Echo))),
        );

        // garbage bytes would be a decode error if decoding were attempted
        let err = pipeline
            .run(RawImage::new(b"garbage".to_vec()), "English")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ModelUnavailable { ref reason } if reason == "model file missing"));
    }

    #[tokio::test]
    async fn test_bad_image_never_reaches_the_model() {
        let model = counting(false);
        let pipeline = pipeline(model.clone(), Dependency::Ready(Arc::new(Echo)));

        let err = pipeline
            .run(RawImage::new(b"%PDF-1.4".to_vec()), "English")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ImageDecode { .. }));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_forward_pass_failure_is_internal() {
        let pipeline = pipeline(counting(true), Dependency::Ready(Arc::new(Echo)));
        let err = pipeline.run(RawImage::new(png_bytes()), "English").await.unwrap_err();
        assert!(matches!(err, AppError::InferenceFailure { .. }));
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn test_degraded_advice_still_responds() {
        let pipeline = pipeline(counting(false), Dependency::unavailable("no key"));
        let report = pipeline.run(RawImage::new(png_bytes()), "Telugu").await.unwrap();
        assert!(report.advisory_degraded);
        assert!(report.cure_text.contains("Tomato___Early_blight"));
        assert_eq!(report.display_label, "Tomato Early blight");
    }
}
