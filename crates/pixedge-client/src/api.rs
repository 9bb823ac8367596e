//! Composite processing over HTTP.

use async_trait::async_trait;
use pixedge_core::constants::{CONFIG_FIELD, FILE_FIELD, PROCESS_PREFIX};
use pixedge_core::ProcessingConfig;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};

use crate::error::ClientError;
use crate::image::UploadedImage;
use crate::transport::{ProcessTransport, ProcessedPayload};
use crate::ApiClient;

impl ApiClient {
    /// Multipart form: the raw file under `file`, the JSON config under `config`.
    fn composite_form(
        image: &UploadedImage,
        config: &ProcessingConfig,
    ) -> Result<Form, ClientError> {
        let file_part = Part::bytes(image.bytes.to_vec())
            .file_name(image.file_name.clone())
            .mime_str(image.upload_media_type())?;
        let config_json = serde_json::to_string(config)?;

        Ok(Form::new()
            .part(FILE_FIELD, file_part)
            .text(CONFIG_FIELD, config_json))
    }
}

#[async_trait]
impl ProcessTransport for ApiClient {
    async fn process(
        &self,
        image: &UploadedImage,
        config: &ProcessingConfig,
    ) -> Result<ProcessedPayload, ClientError> {
        let url = self.build_url(&format!("{}/composite", PROCESS_PREFIX));
        let form = Self::composite_form(image, config)?;

        tracing::debug!(
            url = %url,
            file_name = %image.file_name,
            bytes = image.bytes.len(),
            "Posting composite request"
        );

        let response = self.client().post(&url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let media_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?;

        Ok(ProcessedPayload { bytes, media_type })
    }
}
