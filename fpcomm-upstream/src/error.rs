/// Errors that can occur while talking to the upstream catalog.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server error (HTTP {status}): {message}")]
    Status { status: u16, message: String },

    #[error("Failed to obtain access token: {0}")]
    Token(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
