use crate::core::captions::CaptionError;
use crate::core::video::ExtractionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GlanceError {
    #[error("Caption error: {0}")]
    Caption(#[from] CaptionError),
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
