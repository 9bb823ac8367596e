use std::time::Duration;

use async_trait::async_trait;
use pixedge_core::constants::ACTIONS_HEADER;
use pixedge_core::AppError;
use reqwest::{header, Client};

use super::{ImageProvider, ProviderRequest, ProviderResponse};

/// Provider reached over HTTP.
///
/// The image bytes are POSTed with their declared content type. A non-empty
/// action list travels as compact JSON in the `X-Image-Process` header; an empty
/// list sends the bytes with no transform attached.
#[derive(Clone, Debug)]
pub struct HttpImageProvider {
    client: Client,
    endpoint: String,
}

impl HttpImageProvider {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, anyhow::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create provider HTTP client: {}", e))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ImageProvider for HttpImageProvider {
    #[tracing::instrument(
        skip(self, request),
        fields(
            endpoint = %self.endpoint,
            actions = request.actions.len(),
            bytes = request.body.len()
        )
    )]
    async fn transform(&self, request: ProviderRequest) -> Result<ProviderResponse, AppError> {
        let mut builder = self.client.post(&self.endpoint).body(request.body);

        if let Some(content_type) = request.content_type.as_deref() {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        if !request.actions.is_empty() {
            let actions = request.actions.to_header_value().map_err(|e| {
                AppError::Internal(format!("Failed to encode action list: {}", e))
            })?;
            builder = builder.header(ACTIONS_HEADER, actions);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!(error = %e, "Image provider request failed");
            AppError::ProviderUnavailable(e.to_string())
        })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(|e| {
            tracing::error!(error = %e, status, "Failed to read image provider response");
            AppError::ProviderUnavailable(e.to_string())
        })?;

        if !(200..300).contains(&status) {
            tracing::warn!(status, "Image provider returned a non-success status");
        } else {
            tracing::debug!(status, bytes = body.len(), "Image provider responded");
        }

        Ok(ProviderResponse {
            status,
            content_type,
            body,
        })
    }

    fn name(&self) -> &str {
        "http"
    }
}
