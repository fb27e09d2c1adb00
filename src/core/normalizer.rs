use crate::domain::model::{NormalizedTensor, RawImage};
use crate::utils::error::{AppError, Result};
use image::{imageops::FilterType, DynamicImage, ImageBuffer, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

/// ImageNet channel means in BGR order, 0..255 scale.
const CAFFE_BGR_MEAN: [f32; 3] = [103.939, 116.779, 123.68];
const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Pretrained backbone the deployed model was fine-tuned from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Architecture {
    #[default]
    #[serde(rename = "resnet50")]
    ResNet50,
    #[serde(rename = "vgg16")]
    Vgg16,
    #[serde(rename = "mobilenet_v2")]
    MobileNetV2,
    #[serde(rename = "inception_v3")]
    InceptionV3,
    #[serde(rename = "densenet121")]
    DenseNet121,
}

impl Architecture {
    /// Must match the training-time preprocessing; a mismatch only shows up as bad accuracy.
    pub fn preprocessing(self) -> Preprocessing {
        match self {
            Architecture::ResNet50 | Architecture::Vgg16 => Preprocessing::Caffe,
            Architecture::MobileNetV2 | Architecture::InceptionV3 => Preprocessing::Tf,
            Architecture::DenseNet121 => Preprocessing::Torch,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preprocessing {
    /// RGB -> BGR, subtract per-channel means, no scaling.
    Caffe,
    /// Scale to [-1, 1].
    Tf,
    /// Scale to [0, 1], then standardize with ImageNet mean/std.
    Torch,
}

impl Preprocessing {
    pub fn apply(self, [r, g, b]: [u8; 3]) -> [f32; 3] {
        let (r, g, b) = (r as f32, g as f32, b as f32);
        match self {
            Preprocessing::Caffe => [
                b - CAFFE_BGR_MEAN[0],
                g - CAFFE_BGR_MEAN[1],
                r - CAFFE_BGR_MEAN[2],
            ],
            Preprocessing::Tf => [r / 127.5 - 1.0, g / 127.5 - 1.0, b / 127.5 - 1.0],
            Preprocessing::Torch => [
                (r / 255.0 - IMAGENET_MEAN[0]) / IMAGENET_STD[0],
                (g / 255.0 - IMAGENET_MEAN[1]) / IMAGENET_STD[1],
                (b / 255.0 - IMAGENET_MEAN[2]) / IMAGENET_STD[2],
            ],
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageNormalizer {
    height: u32,
    width: u32,
    preprocessing: Preprocessing,
}

impl ImageNormalizer {
    pub fn new(height: u32, width: u32, architecture: Architecture) -> Self {
        Self {
            height,
            width,
            preprocessing: architecture.preprocessing(),
        }
    }

    pub fn normalize(&self, raw: &RawImage) -> Result<NormalizedTensor> {
        let image = image::load_from_memory(&raw.bytes).map_err(|e| AppError::ImageDecode {
            message: e.to_string(),
        })?;

        tracing::debug!(
            width = image.width(),
            height = image.height(),
            color = ?image.color(),
            content_type = raw.content_type.as_deref().unwrap_or("unknown"),
            "Decoded upload"
        );

        self.normalize_image(&image)
    }

    pub fn normalize_image(&self, image: &DynamicImage) -> Result<NormalizedTensor> {
        let resized = image.resize_exact(self.width, self.height, FilterType::CatmullRom);
        let rgb = to_three_channels(&resized)?;

        let mut data = Vec::with_capacity((self.height * self.width) as usize * NormalizedTensor::CHANNELS);
        for pixel in rgb.pixels() {
            data.extend_from_slice(&self.preprocessing.apply(pixel.0));
        }

        NormalizedTensor::from_nhwc(data, self.height as usize, self.width as usize).ok_or_else(|| {
            AppError::InferenceFailure {
                message: "normalized buffer does not match the configured input size".to_string(),
            }
        })
    }
}

fn to_three_channels(image: &DynamicImage) -> Result<RgbImage> {
    match image.color().channel_count() {
        1 => {
            let luma = image.to_luma8();
            Ok(ImageBuffer::from_fn(luma.width(), luma.height(), |x, y| {
                let v = luma.get_pixel(x, y)[0];
                Rgb([v, v, v])
            }))
        }
        3 => Ok(image.to_rgb8()),
        4 => {
            // alpha is dropped, not blended
            let rgba = image.to_rgba8();
            Ok(ImageBuffer::from_fn(rgba.width(), rgba.height(), |x, y| {
                let p = rgba.get_pixel(x, y);
                Rgb([p[0], p[1], p[2]])
            }))
        }
        channels => Err(AppError::ImageShape { channels }),
    }
}
