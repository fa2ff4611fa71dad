use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Caption parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },
    #[error("Invalid timestamp: {0}")]
    Timestamp(String),
    #[error("Unsupported caption format: {0}")]
    UnsupportedFormat(String),
}
