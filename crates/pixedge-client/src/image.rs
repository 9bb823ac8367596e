use std::path::Path;

use bytes::Bytes;
use pixedge_core::constants::DEFAULT_UPLOAD_CONTENT_TYPE;

use crate::error::ClientError;

const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";
const PLACEHOLDER_NAME: &str = "test.png";

/// 1x1 PNG used as the default selection.
const PLACEHOLDER_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00, 0x90, 0x77, 0x53,
    0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49, 0x44, 0x41, 0x54, 0x08, 0xD7, 0x63, 0xF8, 0x00, 0x00, 0x00,
    0x00, 0x01, 0x00, 0x01, 0x00, 0x18, 0xDD, 0x8D, 0x89, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E,
    0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// Image chosen by the user: raw bytes plus declared media type.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedImage {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Bytes,
}

impl UploadedImage {
    pub fn new(file_name: impl Into<String>, media_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Read an image from disk, guessing the media type from its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        if path
            .components()
            .any(|c| c == std::path::Component::ParentDir)
        {
            return Err(ClientError::Config(format!(
                "Refusing path with parent components: {}",
                path.display()
            )));
        }

        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();
        let media_type = guess_media_type(path).unwrap_or(FALLBACK_MEDIA_TYPE);

        Ok(Self::new(file_name, media_type, Bytes::from(bytes)))
    }

    /// Bundled placeholder image.
    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER_NAME, "image/png", Bytes::from_static(PLACEHOLDER_PNG))
    }

    /// Media type to declare on upload; blank types fall back to JPEG.
    pub fn upload_media_type(&self) -> &str {
        if self.media_type.trim().is_empty() {
            DEFAULT_UPLOAD_CONTENT_TYPE
        } else {
            &self.media_type
        }
    }
}

fn guess_media_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let media_type = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "avif" => "image/avif",
        "tif" | "tiff" => "image/tiff",
        "svg" => "image/svg+xml",
        _ => return None,
    };
    Some(media_type)
}
