use async_trait::async_trait;
use bytes::Bytes;
use pixedge_core::ProcessingConfig;

use crate::error::ClientError;
use crate::image::UploadedImage;

/// Bytes returned by a successful processing round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedPayload {
    pub bytes: Bytes,
    /// Declared `Content-Type` of the result, if any
    pub media_type: Option<String>,
}

/// One processing round trip: image and options out, processed bytes back.
#[async_trait]
pub trait ProcessTransport: Send + Sync {
    async fn process(
        &self,
        image: &UploadedImage,
        config: &ProcessingConfig,
    ) -> Result<ProcessedPayload, ClientError>;
}

#[async_trait]
impl<T: ProcessTransport + ?Sized> ProcessTransport for std::sync::Arc<T> {
    async fn process(
        &self,
        image: &UploadedImage,
        config: &ProcessingConfig,
    ) -> Result<ProcessedPayload, ClientError> {
        (**self).process(image, config).await
    }
}
