//! HTTP client and request composer for the Pixedge dispatcher.
//!
//! [`ApiClient`] posts an image and its processing options to the composite
//! route. [`Composer`] holds the user's current image, the processed result and
//! the browsable handles for both, and drives one round trip per attempt.

pub mod api;
pub mod composer;
pub mod error;
pub mod handles;
pub mod image;
pub mod transport;

use std::time::Duration;

use reqwest::Client;

pub use composer::{
    Composer, ComposerOptions, DownloadOutcome, Navigation, Phase, ProcessedResult, SessionFlags,
    View,
};
pub use error::ClientError;
pub use handles::{BlobHandle, BlobResource, HandleRegistry};
pub use image::UploadedImage;
pub use transport::{ProcessTransport, ProcessedPayload};

const DEFAULT_BASE_URL: &str = "http://localhost:4000";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Connection settings for the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Read PIXEDGE_API_URL (or API_URL) and PIXEDGE_TIMEOUT_SECS.
    pub fn from_env() -> Result<Self, ClientError> {
        let base_url = std::env::var("PIXEDGE_API_URL")
            .or_else(|_| std::env::var("API_URL"))
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout_secs = match std::env::var("PIXEDGE_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().map_err(|_| {
                ClientError::Config(format!("PIXEDGE_TIMEOUT_SECS must be a number, got '{}'", raw))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url,
            timeout_secs,
        })
    }
}

/// HTTP client for the dispatcher.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        if config.base_url.trim().is_empty() {
            return Err(ClientError::Config("base URL cannot be empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Raw client for custom requests.
    pub fn client(&self) -> &Client {
        &self.client
    }
}
