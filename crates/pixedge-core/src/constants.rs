//! Shared constants for the dispatcher and the composer.

/// Route prefix for all processing endpoints.
pub const PROCESS_PREFIX: &str = "/api/process";

/// Quality sent with a resize action when the caller gives none.
pub const DEFAULT_QUALITY: u8 = 90;

/// Rotation applied by the single-operation rotate route when `angle` is missing.
pub const DEFAULT_ANGLE: f64 = 0.0;

/// Watermark text used by the single-operation watermark route when `text` is missing.
pub const DEFAULT_WATERMARK_TEXT: &str = "ImageProcess";

// Fixed watermark styling understood by the provider.
pub const WATERMARK_FONT_SIZE: u32 = 16;
pub const WATERMARK_COLOR: &str = "#ffffff80";
pub const WATERMARK_OFFSET_X: i32 = 10;
pub const WATERMARK_OFFSET_Y: i32 = 10;
pub const WATERMARK_ROTATE: i32 = 30;

/// Plain-text body returned for any path that is not a processing route.
pub const BANNER: &str = "Image Process Edge Function";

/// Header carrying the JSON-encoded action list to the provider.
pub const ACTIONS_HEADER: &str = "X-Image-Process";

/// Media type assumed for an uploaded file that does not declare one.
pub const DEFAULT_UPLOAD_CONTENT_TYPE: &str = "image/jpeg";

/// Multipart field names used by the composite route.
pub const FILE_FIELD: &str = "file";
pub const CONFIG_FIELD: &str = "config";

/// Preflight responses may be cached by the browser for one day.
pub const CORS_MAX_AGE_SECS: u64 = 86_400;
