use crate::domain::model::NormalizedTensor;
use crate::domain::ports::Classifier;
use crate::utils::error::{AppError, Result};
use std::path::Path;
use tract_onnx::prelude::*;

type Plan = SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>;

/// ONNX classifier executed with tract, input pinned to `(1, H, W, 3)` f32.
pub struct TractClassifier {
    plan: Plan,
    height: usize,
    width: usize,
    output_classes: Option<usize>,
}

impl TractClassifier {
    pub fn load<P: AsRef<Path>>(path: P, height: u32, width: u32) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AppError::Config {
                message: format!("model artifact not found at {}", path.display()),
            });
        }

        let (height, width) = (height as usize, width as usize);
        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| {
                model.with_input_fact(
                    0,
                    InferenceFact::dt_shape(
                        f32::datum_type(),
                        tvec!(1, height, width, NormalizedTensor::CHANNELS),
                    ),
                )
            })
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| AppError::Config {
                message: format!("failed to load model {}: {}", path.display(), e),
            })?;

        let output_classes = plan
            .model()
            .output_fact(0)
            .ok()
            .and_then(|fact| fact.shape.as_concrete().map(|dims| dims.to_vec()))
            .and_then(|dims| dims.last().copied());

        tracing::info!(
            path = %path.display(),
            input = ?[1, height, width, NormalizedTensor::CHANNELS],
            output_classes = ?output_classes,
            "Loaded ONNX model"
        );

        Ok(Self {
            plan,
            height,
            width,
            output_classes,
        })
    }
}

impl Classifier for TractClassifier {
    fn forward(&self, input: &NormalizedTensor) -> Result<Vec<f32>> {
        let expected = [1, self.height, self.width, NormalizedTensor::CHANNELS];
        if input.shape() != expected {
            return Err(AppError::InferenceFailure {
                message: format!("input shape {:?} does not match model input {:?}", input.shape(), expected),
            });
        }

        let array = tract_ndarray::Array4::from_shape_vec(
            (1, self.height, self.width, NormalizedTensor::CHANNELS),
            input.as_slice().to_vec(),
        )
        .map_err(|e| AppError::InferenceFailure { message: e.to_string() })?;

        let outputs = self
            .plan
            .run(tvec!(array.into_tensor().into_tvalue()))
            .map_err(|e| AppError::InferenceFailure { message: e.to_string() })?;

        let output = outputs
            .first()
            .ok_or_else(|| AppError::InferenceFailure {
                message: "model produced no outputs".to_string(),
            })?
            .to_array_view::<f32>()
            .map_err(|e| AppError::InferenceFailure { message: e.to_string() })?;

        // (1, N) or (N,): scores of the single batch entry
        Ok(output.iter().copied().collect())
    }

    fn output_classes(&self) -> Option<usize> {
        self.output_classes
    }
}
