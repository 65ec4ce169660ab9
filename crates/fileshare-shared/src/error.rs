use thiserror::Error;

/// Errors produced by the shared layer.
#[derive(Error, Debug)]
pub enum SharedError {
    /// JSON encoding/decoding of a wire message failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
