use image::ImageError;
use ort::Error as OrtError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DetectEntry {
    #[error("Failed to load model {0}: {1}")]
    ModelLoadError(String, OrtError),
    #[error("Model is not available")]
    ModelUnavailable,
    #[error("No image provided")]
    MissingImage,
    #[error("Invalid image: {0}")]
    InvalidImage(ImageError),
    #[error("Inference execution error: {0}")]
    InferenceError(OrtError),
    #[error("Unexpected model output shape {0:?}")]
    InvalidOutputShape(Vec<i64>),
    #[error("Request {0} completed with {1} detection(s)")]
    RequestComplete(Uuid, usize),
}

impl From<DetectEntry> for String {
    #[inline(always)]
    fn from(value: DetectEntry) -> Self {
        value.to_string()
    }
}
