//! Processing options chosen by the user.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;

/// Target format understood by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    #[serde(alias = "jpg")]
    Jpeg,
    Webp,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Webp => "webp",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Webp => "image/webp",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "webp" => Ok(OutputFormat::Webp),
            other => Err(AppError::InvalidInput(format!(
                "Unsupported format '{}'. Allowed formats: png, jpeg, webp",
                other
            ))),
        }
    }
}

/// Processing configuration sent by the client.
///
/// Every field is optional; an absent field means no operation of that kind.
/// Unknown fields are ignored so older clients keep working.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<u8>,
    /// Rotation in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watermark_text: Option<String>,
}

impl ProcessingConfig {
    /// Parse a JSON-encoded configuration string (the multipart `config` field).
    pub fn from_json_str(raw: &str) -> Result<Self, AppError> {
        let config: ProcessingConfig = serde_json::from_str(raw)
            .map_err(|e| AppError::InvalidInput(format!("Invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Build a configuration from an already-parsed JSON value.
    ///
    /// A string value is treated as JSON-encoded configuration.
    pub fn from_json_value(value: Value) -> Result<Self, AppError> {
        if let Value::String(raw) = value {
            return Self::from_json_str(&raw);
        }
        let config: ProcessingConfig = serde_json::from_value(value)
            .map_err(|e| AppError::InvalidInput(format!("Invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(quality) = self.quality {
            if quality > 100 {
                return Err(AppError::InvalidInput(format!(
                    "quality must be between 0 and 100, got {}",
                    quality
                )));
            }
        }
        if let Some(angle) = self.angle {
            if !angle.is_finite() {
                return Err(AppError::InvalidInput(
                    "angle must be a finite number".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Width as a positive integer; zero counts as unset.
    pub fn target_width(&self) -> Option<u32> {
        self.width.filter(|w| *w > 0)
    }

    /// Height as a positive integer; zero counts as unset.
    pub fn target_height(&self) -> Option<u32> {
        self.height.filter(|h| *h > 0)
    }

    pub fn wants_resize(&self) -> bool {
        self.target_width().is_some() || self.target_height().is_some()
    }

    pub fn rotation(&self) -> Option<f64> {
        self.angle.filter(|a| *a != 0.0)
    }

    pub fn watermark(&self) -> Option<&str> {
        self.watermark_text.as_deref().filter(|t| !t.is_empty())
    }

    /// True when no provider action would be derived from this configuration.
    pub fn is_empty(&self) -> bool {
        self.format.is_none()
            && !self.wants_resize()
            && self.rotation().is_none()
            && self.watermark().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_camel_case_fields() {
        let config = ProcessingConfig::from_json_str(
            r#"{"format":"webp","width":320,"quality":75,"angle":45.5,"watermarkText":"draft"}"#,
        )
        .expect("valid config");
        assert_eq!(config.format, Some(OutputFormat::Webp));
        assert_eq!(config.width, Some(320));
        assert_eq!(config.height, None);
        assert_eq!(config.quality, Some(75));
        assert_eq!(config.angle, Some(45.5));
        assert_eq!(config.watermark_text.as_deref(), Some("draft"));
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let config = ProcessingConfig::from_json_value(json!({"format": "png", "filename": "a.png"}))
            .expect("valid config");
        assert_eq!(config.format, Some(OutputFormat::Png));
    }

    #[test]
    fn test_malformed_json_is_invalid_input() {
        let err = ProcessingConfig::from_json_str("{format: png").unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_unsupported_format_is_rejected() {
        let err = ProcessingConfig::from_json_value(json!({"format": "gif"})).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_quality_out_of_range_is_rejected() {
        let err = ProcessingConfig::from_json_value(json!({"quality": 101})).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_string_value_is_decoded_as_json() {
        let config =
            ProcessingConfig::from_json_value(Value::String(r#"{"angle":90}"#.to_string()))
                .expect("valid config");
        assert_eq!(config.angle, Some(90.0));
    }

    #[test]
    fn test_zero_and_empty_values_count_as_unset() {
        let config = ProcessingConfig {
            width: Some(0),
            height: Some(0),
            angle: Some(0.0),
            watermark_text: Some(String::new()),
            ..Default::default()
        };
        assert!(!config.wants_resize());
        assert!(config.rotation().is_none());
        assert!(config.watermark().is_none());
        assert!(config.is_empty());
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("JPG".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
        assert_eq!(" webp ".parse::<OutputFormat>().unwrap(), OutputFormat::Webp);
        assert!("bmp".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Jpeg.mime_type(), "image/jpeg");
    }
}
