use std::sync::Arc;

use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::{header, StatusCode},
    response::Response,
};
use bytes::Bytes;
use pixedge_core::{AppError, ProviderActionList};

use crate::error::HttpAppError;
use crate::provider::{relay, ProviderRequest};
use crate::state::AppState;
use crate::utils::upload::{extract_composite_form, is_multipart, parse_json_body};

/// Composite processing handler
///
/// Accepts either a multipart form (`file` + JSON-encoded `config`) or a JSON
/// body. The JSON form can never carry an image, so it always ends in a
/// missing-file error once the configuration has been validated.
///
/// The extracted file is re-sent to the provider under its declared media type
/// with the full action list derived from the configuration. An empty
/// configuration forwards the original bytes with no transform.
///
/// # Errors
/// - `AppError::MissingFile` - no `file` field (or a JSON body)
/// - `AppError::InvalidInput` - malformed `config` JSON or out-of-range values
/// - `AppError::PayloadTooLarge` - body exceeds the configured limit
/// - `AppError::ProviderUnavailable` - provider could not be reached
#[tracing::instrument(skip(state, request), fields(operation = "composite"))]
pub async fn composite_process(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Response, HttpAppError> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let form = if is_multipart(content_type.as_deref()) {
        let multipart = Multipart::from_request(request, &state).await?;
        extract_composite_form(multipart).await?
    } else {
        let body = Bytes::from_request(request, &state).await.map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                AppError::PayloadTooLarge(rejection.body_text())
            } else {
                AppError::BadRequest(format!("Failed to read request body: {}", rejection.body_text()))
            }
        })?;
        parse_json_body(&body)?
    };

    let (file, config) = form.require_file()?;
    let actions = ProviderActionList::from_config(&config);

    tracing::info!(
        file_name = ?file.file_name,
        content_type = %file.content_type,
        bytes = file.data.len(),
        actions = ?actions.kinds(),
        "Forwarding composite request"
    );
    if actions.is_empty() {
        tracing::debug!("Empty configuration, forwarding original bytes without transform");
    }

    let response = state
        .provider
        .transform(ProviderRequest {
            body: file.data,
            content_type: Some(file.content_type),
            actions,
        })
        .await?;

    Ok(relay(response))
}
