use thiserror::Error;

/// Errors produced by the summarization flow.
///
/// Extraction problems never appear here; they are absorbed into a
/// placeholder before the generation call.
#[derive(Error, Debug)]
pub enum AiError {
    /// The HTTP request to the generation backend failed.
    #[error("Generation request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The generation backend answered with a non-success status.
    #[error("Generation backend returned {0}")]
    BackendStatus(reqwest::StatusCode),

    /// The response did not carry the expected completion text.
    #[error("Generation response missing completion text")]
    MalformedResponse,
}
