//! Single-operation routes
//!
//! Each route reads its parameters from the query string only, attaches a
//! one-step action list to the untouched request body and relays whatever the
//! provider answers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::Response,
};
use bytes::Bytes;
use pixedge_core::{ProviderAction, ProviderActionList};
use serde::Deserialize;

use crate::error::HttpAppError;
use crate::provider::{relay, ProviderRequest};
use crate::state::AppState;
use crate::utils::query::{
    parse_angle, parse_dimension, parse_format, parse_quality, parse_watermark_text,
};

#[derive(Debug, Deserialize)]
pub struct FormatQuery {
    format: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResizeQuery {
    width: Option<String>,
    height: Option<String>,
    quality: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RotateQuery {
    angle: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WatermarkQuery {
    text: Option<String>,
}

#[tracing::instrument(skip(state, headers, body), fields(operation = "format"))]
pub async fn format_image(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FormatQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, HttpAppError> {
    let format = parse_format(query.format.as_deref())?;
    forward(&state, &headers, body, ProviderAction::format(format)).await
}

#[tracing::instrument(skip(state, headers, body), fields(operation = "resize"))]
pub async fn resize_image(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ResizeQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, HttpAppError> {
    let action = ProviderAction::resize(
        parse_dimension(query.width.as_deref()),
        parse_dimension(query.height.as_deref()),
        Some(parse_quality(query.quality.as_deref())?),
    );
    forward(&state, &headers, body, action).await
}

#[tracing::instrument(skip(state, headers, body), fields(operation = "rotate"))]
pub async fn rotate_image(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RotateQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, HttpAppError> {
    let angle = parse_angle(query.angle.as_deref());
    forward(&state, &headers, body, ProviderAction::rotate(angle)).await
}

#[tracing::instrument(skip(state, headers, body), fields(operation = "watermark"))]
pub async fn watermark_image(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WatermarkQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, HttpAppError> {
    let text = parse_watermark_text(query.text.as_deref());
    forward(&state, &headers, body, ProviderAction::watermark(text)).await
}

async fn forward(
    state: &AppState,
    headers: &HeaderMap,
    body: Bytes,
    action: ProviderAction,
) -> Result<Response, HttpAppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    tracing::debug!(
        action = ?action.action,
        bytes = body.len(),
        provider = state.provider.name(),
        "Forwarding single-operation request"
    );

    let response = state
        .provider
        .transform(ProviderRequest {
            body,
            content_type,
            actions: ProviderActionList::single(action),
        })
        .await?;

    Ok(relay(response))
}
