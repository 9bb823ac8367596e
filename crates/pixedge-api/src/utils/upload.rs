//! Body extraction for the composite route.

use axum::extract::Multipart;
use bytes::Bytes;
use pixedge_core::constants::{CONFIG_FIELD, DEFAULT_UPLOAD_CONTENT_TYPE, FILE_FIELD};
use pixedge_core::{AppError, ProcessingConfig};
use serde_json::Value;

use crate::error::multipart_error;

/// File part of a composite upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub data: Bytes,
    pub file_name: Option<String>,
    pub content_type: String,
}

/// Parsed composite request: the optional file and its processing configuration.
#[derive(Debug, Clone, Default)]
pub struct CompositeForm {
    pub file: Option<UploadedFile>,
    pub config: ProcessingConfig,
}

impl CompositeForm {
    /// The file, or the input error returned to the caller when none was sent.
    pub fn require_file(self) -> Result<(UploadedFile, ProcessingConfig), AppError> {
        match self.file {
            Some(file) => Ok((file, self.config)),
            None => Err(AppError::MissingFile(
                "Please upload a valid image file".to_string(),
            )),
        }
    }
}

/// True when the `Content-Type` header declares multipart form data.
pub fn is_multipart(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.to_ascii_lowercase().contains("multipart/form-data"))
        .unwrap_or(false)
}

/// Extract the `file` and `config` fields from a multipart form.
/// Only one field named "file" is accepted; unknown fields are skipped.
pub async fn extract_composite_form(mut multipart: Multipart) -> Result<CompositeForm, AppError> {
    let mut form = CompositeForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if field_name == FILE_FIELD {
            if form.file.is_some() {
                return Err(AppError::InvalidInput(
                    "Multiple file fields are not allowed; send exactly one field named 'file'"
                        .to_string(),
                ));
            }
            let file_name = field.file_name().map(|s| s.to_string());
            let content_type = field
                .content_type()
                .map(|s| s.to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_UPLOAD_CONTENT_TYPE.to_string());
            let data = field.bytes().await.map_err(multipart_error)?;

            // An empty part is what browsers send for an untouched file input.
            if !data.is_empty() {
                form.file = Some(UploadedFile {
                    data,
                    file_name,
                    content_type,
                });
            }
        } else if field_name == CONFIG_FIELD {
            let raw = field.text().await.map_err(multipart_error)?;
            if !raw.trim().is_empty() {
                form.config = ProcessingConfig::from_json_str(&raw)?;
            }
        } else {
            tracing::debug!(field = %field_name, "Ignoring unexpected multipart field");
        }
    }

    Ok(form)
}

/// Parse a JSON body: the `config` member when present, otherwise the whole object.
/// A JSON body never carries a file.
pub fn parse_json_body(body: &[u8]) -> Result<CompositeForm, AppError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| AppError::InvalidInput(format!("Invalid JSON body: {}", e)))?;

    let config_value = match value {
        Value::Object(mut map) => match map.remove(CONFIG_FIELD) {
            Some(config) if !config.is_null() => config,
            _ => Value::Object(map),
        },
        other => {
            return Err(AppError::InvalidInput(format!(
                "JSON body must be an object, got {}",
                json_kind(&other)
            )))
        }
    };

    Ok(CompositeForm {
        file: None,
        config: ProcessingConfig::from_json_value(config_value)?,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
