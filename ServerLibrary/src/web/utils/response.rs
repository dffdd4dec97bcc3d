use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
pub struct OperationStatus {
    success: bool,
    error: Option<String>,
}

impl OperationStatus {
    pub fn new(success: bool, error: Option<String>) -> Self {
        Self {
            success,
            error,
        }
    }
}

#[derive(Serialize)]
pub struct PredictResponse {
    pub success: bool,
    pub annotated_image: Option<String>,
    pub report: Value,
}

impl PredictResponse {
    pub fn new(annotated_image: Option<String>, report: Value) -> Self {
        Self {
            success: annotated_image.is_some(),
            annotated_image,
            report,
        }
    }
}
