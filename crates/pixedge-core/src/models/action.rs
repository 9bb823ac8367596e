//! Provider action list
//!
//! The external image pipeline accepts an ordered list of transform steps. Each
//! step names an action and carries a mode/parameter bag in the provider's own
//! vocabulary, e.g. `{"action":"resize","option":{"mode":"custom","param":{"p":90,"fw":200}}}`.

use serde::{Serialize, Serializer};

use crate::constants::{
    DEFAULT_QUALITY, WATERMARK_COLOR, WATERMARK_FONT_SIZE, WATERMARK_OFFSET_X,
    WATERMARK_OFFSET_Y, WATERMARK_ROTATE,
};
use crate::models::processing::{OutputFormat, ProcessingConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Format,
    Resize,
    Rotate,
    Watermark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionMode {
    Custom,
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatermarkParam {
    pub text: String,
    pub font_size: u32,
    pub color: String,
    pub dx: i32,
    pub dy: i32,
    pub rotate: i32,
}

impl WatermarkParam {
    /// Text watermark with the fixed house style.
    pub fn styled(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_size: WATERMARK_FONT_SIZE,
            color: WATERMARK_COLOR.to_string(),
            dx: WATERMARK_OFFSET_X,
            dy: WATERMARK_OFFSET_Y,
            rotate: WATERMARK_ROTATE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ActionParam {
    Format {
        f: OutputFormat,
    },
    Resize {
        p: u8,
        #[serde(skip_serializing_if = "Option::is_none")]
        fw: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        fh: Option<u32>,
    },
    Rotate {
        #[serde(serialize_with = "serialize_degrees")]
        a: f64,
    },
    Watermark(WatermarkParam),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionOption {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<ActionMode>,
    pub param: ActionParam,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderAction {
    pub action: ActionKind,
    pub option: ActionOption,
}

impl ProviderAction {
    pub fn format(format: OutputFormat) -> Self {
        Self {
            action: ActionKind::Format,
            option: ActionOption {
                mode: None,
                param: ActionParam::Format { f: format },
            },
        }
    }

    /// Resize step. Missing dimensions are left out of the parameter bag.
    pub fn resize(width: Option<u32>, height: Option<u32>, quality: Option<u8>) -> Self {
        Self {
            action: ActionKind::Resize,
            option: ActionOption {
                mode: Some(ActionMode::Custom),
                param: ActionParam::Resize {
                    p: quality.unwrap_or(DEFAULT_QUALITY),
                    fw: width,
                    fh: height,
                },
            },
        }
    }

    pub fn rotate(angle: f64) -> Self {
        Self {
            action: ActionKind::Rotate,
            option: ActionOption {
                mode: Some(ActionMode::Custom),
                param: ActionParam::Rotate { a: angle },
            },
        }
    }

    pub fn watermark(text: impl Into<String>) -> Self {
        Self {
            action: ActionKind::Watermark,
            option: ActionOption {
                mode: Some(ActionMode::Text),
                param: ActionParam::Watermark(WatermarkParam::styled(text)),
            },
        }
    }
}

/// Ordered transform steps sent to the provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProviderActionList(Vec<ProviderAction>);

impl ProviderActionList {
    /// Derive the action list for a configuration.
    ///
    /// Steps are always emitted in the order format, resize, rotate, watermark.
    pub fn from_config(config: &ProcessingConfig) -> Self {
        let mut actions = Vec::with_capacity(4);

        if let Some(format) = config.format {
            actions.push(ProviderAction::format(format));
        }
        if config.wants_resize() {
            actions.push(ProviderAction::resize(
                config.target_width(),
                config.target_height(),
                config.quality,
            ));
        }
        if let Some(angle) = config.rotation() {
            actions.push(ProviderAction::rotate(angle));
        }
        if let Some(text) = config.watermark() {
            actions.push(ProviderAction::watermark(text));
        }

        Self(actions)
    }

    pub fn single(action: ProviderAction) -> Self {
        Self(vec![action])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProviderAction> {
        self.0.iter()
    }

    pub fn kinds(&self) -> Vec<ActionKind> {
        self.0.iter().map(|a| a.action).collect()
    }

    /// Compact JSON form carried in the provider request header.
    pub fn to_header_value(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl<'a> IntoIterator for &'a ProviderActionList {
    type Item = &'a ProviderAction;
    type IntoIter = std::slice::Iter<'a, ProviderAction>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// Whole-degree angles go out as JSON integers, the way the provider documents them.
fn serialize_degrees<S: Serializer>(angle: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if angle.fract() == 0.0 && angle.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*angle as i64)
    } else {
        serializer.serialize_f64(*angle)
    }
}
