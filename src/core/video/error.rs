use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Decoder failed (exit code {code:?}): {command}\n{stderr}")]
    DecoderFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
    #[error("Probe failed: {0}")]
    Probe(String),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}
