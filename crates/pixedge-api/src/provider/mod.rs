//! Image provider abstraction
//!
//! The transform itself happens in an external image pipeline. The dispatcher
//! only hands it bytes plus an ordered action list and relays what comes back.

mod http;

pub use http::HttpImageProvider;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use pixedge_core::{AppError, ProviderActionList};

/// One transform request for the provider.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub body: Bytes,
    pub content_type: Option<String>,
    pub actions: ProviderActionList,
}

/// Whatever the provider answered, success or not.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl ProviderResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// External image pipeline.
///
/// Implementations return `Err` only when the provider could not be reached or
/// its response could not be read; a non-2xx answer is returned as `Ok`.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn transform(&self, request: ProviderRequest) -> Result<ProviderResponse, AppError>;

    /// Human-readable name for logs
    fn name(&self) -> &str;
}

/// Relay a provider response as-is: status, content type and body.
pub fn relay(response: ProviderResponse) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut http_response = (status, Body::from(response.body)).into_response();
    if let Some(content_type) = response
        .content_type
        .as_deref()
        .and_then(|ct| HeaderValue::from_str(ct).ok())
    {
        http_response
            .headers_mut()
            .insert(header::CONTENT_TYPE, content_type);
    }
    http_response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_keeps_status_and_content_type() {
        let response = relay(ProviderResponse {
            status: 422,
            content_type: Some("application/json".to_string()),
            body: Bytes::from_static(b"{\"message\":\"unsupported\"}"),
        });
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_is_success() {
        let ok = ProviderResponse {
            status: 200,
            content_type: None,
            body: Bytes::new(),
        };
        let failed = ProviderResponse { status: 503, ..ok.clone() };
        assert!(ok.is_success());
        assert!(!failed.is_success());
    }
}
