//! Provider doubles: record what the dispatcher forwards.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use bytes::Bytes;
use pixedge_api::{ImageProvider, ProviderRequest, ProviderResponse};
use pixedge_core::AppError;

/// How the mock answers each call.
#[derive(Clone)]
pub enum MockReply {
    /// 200 with the request body and content type echoed back
    Echo,
    /// Fixed response
    Fixed(ProviderResponse),
}

pub struct MockProvider {
    reply: MockReply,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl MockProvider {
    pub fn echo() -> Self {
        Self {
            reply: MockReply::Echo,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn fixed(status: u16, content_type: &str, body: &'static [u8]) -> Self {
        Self {
            reply: MockReply::Fixed(ProviderResponse {
                status,
                content_type: Some(content_type.to_string()),
                body: Bytes::from_static(body),
            }),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// The only request seen so far; panics if there were zero or several.
    pub fn single_request(&self) -> ProviderRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one provider call");
        requests.into_iter().next().expect("one request")
    }

    /// Forwarded action list serialized the way the provider receives it.
    pub fn single_actions_json(&self) -> serde_json::Value {
        let header = self
            .single_request()
            .actions
            .to_header_value()
            .expect("serialize actions");
        serde_json::from_str(&header).expect("actions header is JSON")
    }
}

#[async_trait]
impl ImageProvider for MockProvider {
    async fn transform(&self, request: ProviderRequest) -> Result<ProviderResponse, AppError> {
        let response = match &self.reply {
            MockReply::Echo => ProviderResponse {
                status: 200,
                content_type: request.content_type.clone(),
                body: request.body.clone(),
            },
            MockReply::Fixed(response) => response.clone(),
        };
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        Ok(response)
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Provider that can never be reached.
pub struct UnreachableProvider;

#[async_trait]
impl ImageProvider for UnreachableProvider {
    async fn transform(&self, _request: ProviderRequest) -> Result<ProviderResponse, AppError> {
        Err(AppError::ProviderUnavailable(
            "connection refused".to_string(),
        ))
    }

    fn name(&self) -> &str {
        "unreachable"
    }
}

/// Provider whose call panics mid-request.
pub struct PanickingProvider;

#[async_trait]
impl ImageProvider for PanickingProvider {
    async fn transform(&self, _request: ProviderRequest) -> Result<ProviderResponse, AppError> {
        panic!("provider exploded");
    }

    fn name(&self) -> &str {
        "panicking"
    }
}
