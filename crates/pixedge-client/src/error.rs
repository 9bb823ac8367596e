use thiserror::Error;

/// Errors surfaced by the request composer and the HTTP client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("No image selected. Choose an image before processing")]
    NoImage,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Processing failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// HTTP status reported by the dispatcher, if the failure came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Request(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
