use crate::core::decoder::LabelDecoder;
use crate::domain::model::{ClassIndex, NormalizedTensor, Prediction};
use crate::domain::ports::Classifier;
use crate::utils::error::{AppError, Result};
use std::sync::Arc;

/// A loaded network paired with the class list it was trained on.
#[derive(Clone)]
pub struct DiseaseClassifier {
    model: Arc<dyn Classifier>,
    decoder: Arc<LabelDecoder>,
}

impl std::fmt::Debug for DiseaseClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiseaseClassifier")
            .field("classes", &self.decoder.len())
            .field("output_classes", &self.model.output_classes())
            .finish()
    }
}

impl DiseaseClassifier {
    /// Fails when the model's declared output width differs from the class list length.
    pub fn new(model: Arc<dyn Classifier>, decoder: LabelDecoder) -> Result<Self> {
        match model.output_classes() {
            Some(n) if n != decoder.len() => {
                return Err(AppError::Config {
                    message: format!(
                        "classifier outputs {} classes but the class-name list has {} entries",
                        n,
                        decoder.len()
                    ),
                });
            }
            Some(_) => {}
            None => tracing::warn!(
                classes = decoder.len(),
                "Model output width is not static; class-list consistency is checked per request"
            ),
        }

        Ok(Self {
            model,
            decoder: Arc::new(decoder),
        })
    }

    pub fn decoder(&self) -> &LabelDecoder {
        &self.decoder
    }

    /// One forward pass followed by greedy argmax. Low-confidence winners are still returned.
    pub fn predict(&self, input: &NormalizedTensor) -> Result<Prediction> {
        let scores = self.model.forward(input)?;
        argmax(&scores).ok_or_else(|| AppError::InferenceFailure {
            message: format!("model returned no usable scores ({} values)", scores.len()),
        })
    }
}

/// Index of the highest score; the first one wins ties and NaN never wins.
pub fn argmax(scores: &[f32]) -> Option<Prediction> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }

    best.map(|(i, confidence)| Prediction {
        index: ClassIndex(i),
        confidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedScores {
        scores: Vec<f32>,
        declared: Option<usize>,
    }

    impl Classifier for FixedScores {
        fn forward(&self, _input: &NormalizedTensor) -> Result<Vec<f32>> {
            Ok(self.scores.clone())
        }

        fn output_classes(&self) -> Option<usize> {
            self.declared
        }
    }

    fn labels(n: usize) -> LabelDecoder {
        LabelDecoder::new((0..n).map(|i| format!("Plant___Disease_{}", i)).collect()).unwrap()
    }

    fn tensor() -> NormalizedTensor {
        NormalizedTensor::from_nhwc(vec![0.0; 12], 2, 2).unwrap()
    }

    #[test]
    fn test_argmax_first_max_wins() {
        let p = argmax(&[0.1, 0.4, 0.4, 0.1]).unwrap();
        assert_eq!(p.index, ClassIndex(1));
        assert_eq!(p.confidence, 0.4);
    }

    #[test]
    fn test_argmax_skips_nan() {
        let p = argmax(&[f32::NAN, 0.2, 0.7]).unwrap();
        assert_eq!(p.index, ClassIndex(2));
        assert!(argmax(&[f32::NAN, f32::NAN]).is_none());
        assert!(argmax(&[]).is_none());
    }

    #[test]
    fn test_low_confidence_winner_is_still_returned() {
        // 38 near-uniform classes: no confidence gate is applied
        let mut scores = vec![1.0 / 38.0; 38];
        scores[17] += 0.001;
        let model = FixedScores {
            scores,
            declared: Some(38),
        };
        let classifier = DiseaseClassifier::new(Arc::new(model), labels(38)).unwrap();
        let p = classifier.predict(&tensor()).unwrap();
        assert_eq!(p.index, ClassIndex(17));
        assert!(p.confidence < 0.05);
    }

    #[test]
    fn test_output_width_mismatch_is_rejected_at_construction() {
        let model = FixedScores {
            scores: vec![0.5, 0.5],
            declared: Some(2),
        };
        let err = DiseaseClassifier::new(Arc::new(model), labels(3)).unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
    }

    #[test]
    fn test_dynamic_output_width_is_accepted() {
        let model = FixedScores {
            scores: vec![0.1, 0.2, 0.7],
            declared: None,
        };
        assert!(DiseaseClassifier::new(Arc::new(model), labels(3)).is_ok());
    }

    #[test]
    fn test_all_nan_output_is_an_inference_failure() {
        let model = FixedScores {
            scores: vec![f32::NAN; 3],
            declared: Some(3),
        };
        let classifier = DiseaseClassifier::new(Arc::new(model), labels(3)).unwrap();
        assert!(matches!(
            classifier.predict(&tensor()),
            Err(AppError::InferenceFailure { .. })
        ));
    }
}
