/// Errors that can occur while talking to the PSN API.
#[derive(Debug, thiserror::Error)]
pub enum PsnError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PsnError {
    /// Authentication failures are fatal for the whole run; everything else
    /// can be recovered per stage.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PsnError::Authentication(_) | PsnError::Config(_))
    }
}
