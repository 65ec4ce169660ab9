use thiserror::Error;

use fileshare_shared::constants::MAX_FILE_SIZE;

/// Errors produced by the client layer.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Generic I/O error (reading attachments, profile files, ...).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Profile or settings JSON was unreadable.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to determine a platform data directory.
    #[error("Could not determine application data directory")]
    NoDataDir,

    /// Attachment over the fixed ceiling; nothing is published.
    #[error("File too large: {size} bytes (max {MAX_FILE_SIZE})")]
    FileTooLarge { size: u64 },

    /// The broadcast channel rejected a publish.
    #[error("Bus error: {0}")]
    Bus(#[source] anyhow::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClientError>;
