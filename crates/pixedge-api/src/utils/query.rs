//! Lenient parsing of single-operation query parameters.
//!
//! Values arrive as raw strings so that a malformed number falls back to the
//! documented default instead of rejecting the whole request.

use pixedge_core::constants::{DEFAULT_ANGLE, DEFAULT_QUALITY, DEFAULT_WATERMARK_TEXT};
use pixedge_core::{AppError, OutputFormat};

/// `format`: defaults to png; an unknown format is an input error.
pub fn parse_format(raw: Option<&str>) -> Result<OutputFormat, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => value.parse(),
        None => Ok(OutputFormat::default()),
    }
}

/// `width` / `height`: absent, unparseable or zero values are dropped.
pub fn parse_dimension(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|v| *v > 0)
}

/// `quality`: defaults to 90 when absent or unparseable; must lie in 0..=100.
pub fn parse_quality(raw: Option<&str>) -> Result<u8, AppError> {
    match raw.and_then(|s| s.trim().parse::<i64>().ok()) {
        None => Ok(DEFAULT_QUALITY),
        Some(q) if (0..=100).contains(&q) => Ok(q as u8),
        Some(q) => Err(AppError::InvalidInput(format!(
            "quality must be between 0 and 100, got {}",
            q
        ))),
    }
}

/// `angle`: degrees, defaults to 0 when absent or unparseable.
pub fn parse_angle(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|a| a.is_finite())
        .unwrap_or(DEFAULT_ANGLE)
}

/// `text`: defaults to the placeholder watermark when absent or empty.
pub fn parse_watermark_text(raw: Option<&str>) -> String {
    raw.filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_WATERMARK_TEXT)
        .to_string()
}
