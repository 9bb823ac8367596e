//! Client request composer
//!
//! Holds the current image, the last processed result and the browsable
//! handles for both. State lives behind a mutex that is never held across the
//! network round trip, so a second `process` may start while the first is in
//! flight. Each attempt takes a generation number; a result whose generation is
//! no longer current is dropped without creating a handle.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use pixedge_core::ProcessingConfig;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::error::ClientError;
use crate::handles::{BlobHandle, HandleRegistry};
use crate::image::UploadedImage;
use crate::transport::ProcessTransport;

const DEFAULT_DOWNLOAD_NAME: &str = "processed-image";
const DEFAULT_DOWNLOAD_EXTENSION: &str = "png";
const SUPERSEDED_MESSAGE: &str = "superseded by a newer request";

/// Outcome of one processing attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessedResult {
    Success { locator: BlobHandle },
    Failure { message: String },
}

impl ProcessedResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ProcessedResult::Success { .. })
    }
}

impl Serialize for ProcessedResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ProcessedResult", 2)?;
        match self {
            ProcessedResult::Success { locator } => {
                state.serialize_field("success", &true)?;
                state.serialize_field("locator", locator)?;
            }
            ProcessedResult::Failure { message } => {
                state.serialize_field("success", &false)?;
                state.serialize_field("message", message)?;
            }
        }
        state.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DownloadOutcome {
    NothingToDownload,
    Saved { path: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Empty,
    HasImage,
    Processing,
    Processed,
}

/// The two flags the navigation guard reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionFlags {
    pub has_image: bool,
    pub processed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Process,
    Result,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Allow,
    Redirect(View),
}

#[derive(Debug, Clone, Default)]
pub struct ComposerOptions {
    /// Image selected on construction and after every reset
    pub placeholder: Option<UploadedImage>,
}

impl ComposerOptions {
    pub fn with_placeholder() -> Self {
        Self {
            placeholder: Some(UploadedImage::placeholder()),
        }
    }
}

#[derive(Debug, Default)]
struct ComposerState {
    image: Option<UploadedImage>,
    selected: Option<BlobHandle>,
    processed: Option<BlobHandle>,
    error: Option<String>,
    loading: bool,
    generation: u64,
}

pub struct Composer<T> {
    transport: T,
    registry: HandleRegistry,
    options: ComposerOptions,
    state: Mutex<ComposerState>,
}

impl<T: ProcessTransport> Composer<T> {
    pub fn new(transport: T, options: ComposerOptions) -> Self {
        Self::with_registry(transport, options, HandleRegistry::new())
    }

    pub fn with_registry(transport: T, options: ComposerOptions, registry: HandleRegistry) -> Self {
        let composer = Self {
            transport,
            registry,
            options,
            state: Mutex::new(ComposerState::default()),
        };
        if let Some(placeholder) = composer.options.placeholder.clone() {
            composer.select_image(placeholder);
        }
        composer
    }

    fn lock(&self) -> MutexGuard<'_, ComposerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn registry(&self) -> &HandleRegistry {
        &self.registry
    }

    /// Hold a new image and return its preview handle.
    ///
    /// The previous preview and any processed result for the previous image
    /// are released, and an in-flight attempt for it becomes stale.
    pub fn select_image(&self, image: UploadedImage) -> BlobHandle {
        let handle = self
            .registry
            .create(image.bytes.clone(), image.media_type.clone());

        let mut state = self.lock();
        for old in [state.selected.take(), state.processed.take()]
            .into_iter()
            .flatten()
        {
            self.registry.revoke(&old);
        }
        tracing::debug!(
            file_name = %image.file_name,
            media_type = %image.media_type,
            bytes = image.bytes.len(),
            "Image selected"
        );
        state.generation += 1;
        state.loading = false;
        state.error = None;
        state.image = Some(image);
        state.selected = Some(handle.clone());
        handle
    }

    /// Run one processing round trip for the held image.
    pub async fn process(&self, config: &ProcessingConfig) -> ProcessedResult {
        let (image, generation) = {
            let mut state = self.lock();
            let Some(image) = state.image.clone() else {
                let message = ClientError::NoImage.to_string();
                state.error = Some(message.clone());
                state.loading = false;
                return ProcessedResult::Failure { message };
            };
            state.generation += 1;
            state.loading = true;
            state.error = None;
            (image, state.generation)
        };

        tracing::info!(generation, file_name = %image.file_name, "Processing image");
        let outcome = self.transport.process(&image, config).await;

        let mut state = self.lock();
        if state.generation != generation {
            tracing::debug!(
                generation,
                current = state.generation,
                "Discarding stale processing result"
            );
            return ProcessedResult::Failure {
                message: SUPERSEDED_MESSAGE.to_string(),
            };
        }
        state.loading = false;

        if let Some(old) = state.processed.take() {
            self.registry.revoke(&old);
        }

        match outcome {
            Ok(payload) => {
                let media_type = payload
                    .media_type
                    .unwrap_or_else(|| image.media_type.clone());
                let locator = self.registry.create(payload.bytes, media_type);
                state.processed = Some(locator.clone());
                ProcessedResult::Success { locator }
            }
            Err(err) => {
                tracing::warn!(error = %err, "Processing failed");
                let message = err.to_string();
                state.error = Some(message.clone());
                ProcessedResult::Failure { message }
            }
        }
    }

    /// Save the processed bytes as `<dir>/<name>.<ext>`.
    ///
    /// The extension is the subtype of the result's media type. A blank name
    /// falls back to `processed-image`.
    pub async fn download(
        &self,
        name: &str,
        dir: impl AsRef<Path>,
    ) -> Result<DownloadOutcome, ClientError> {
        let resource = {
            let state = self.lock();
            state
                .processed
                .as_ref()
                .and_then(|handle| self.registry.resolve(handle))
        };
        let Some(resource) = resource else {
            tracing::debug!("Nothing to download");
            return Ok(DownloadOutcome::NothingToDownload);
        };

        let name = match name.trim() {
            "" => DEFAULT_DOWNLOAD_NAME,
            trimmed => trimmed,
        };
        let dir = dir.as_ref();
        let path = dir.join(format!("{}.{}", name, extension_for(&resource.media_type)));

        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(&path, &resource.bytes).await?;
        tracing::info!(path = %path.display(), bytes = resource.bytes.len(), "Saved processed image");

        Ok(DownloadOutcome::Saved { path })
    }

    /// Release every handle and return to the initial selection.
    pub fn reset(&self) {
        {
            let mut state = self.lock();
            for old in [state.selected.take(), state.processed.take()]
                .into_iter()
                .flatten()
            {
                self.registry.revoke(&old);
            }
            let generation = state.generation + 1;
            *state = ComposerState {
                generation,
                ..ComposerState::default()
            };
        }
        tracing::debug!("Composer reset");

        if let Some(placeholder) = self.options.placeholder.clone() {
            self.select_image(placeholder);
        }
    }

    pub fn phase(&self) -> Phase {
        let state = self.lock();
        if state.loading {
            Phase::Processing
        } else if state.processed.is_some() {
            Phase::Processed
        } else if state.image.is_some() {
            Phase::HasImage
        } else {
            Phase::Empty
        }
    }

    /// User-visible error from the last attempt.
    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    pub fn selected_handle(&self) -> Option<BlobHandle> {
        self.lock().selected.clone()
    }

    pub fn processed_handle(&self) -> Option<BlobHandle> {
        self.lock().processed.clone()
    }

    pub fn session_flags(&self) -> SessionFlags {
        let state = self.lock();
        SessionFlags {
            has_image: state.image.is_some(),
            processed: state.processed.is_some(),
        }
    }

    /// Navigation guard for the three views.
    pub fn can_enter(&self, view: View) -> Navigation {
        let flags = self.session_flags();
        match view {
            View::Home => Navigation::Allow,
            View::Process if !flags.has_image => Navigation::Redirect(View::Home),
            View::Result if !flags.processed => Navigation::Redirect(View::Process),
            _ => Navigation::Allow,
        }
    }
}

impl<T> Drop for Composer<T> {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        for handle in [state.selected.take(), state.processed.take()]
            .into_iter()
            .flatten()
        {
            self.registry.revoke(&handle);
        }
    }
}

fn extension_for(media_type: &str) -> &str {
    media_type
        .split(';')
        .next()
        .and_then(|essence| essence.split_once('/'))
        .map(|(_, subtype)| subtype.trim())
        .filter(|subtype| {
            !subtype.is_empty()
                && subtype
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
        })
        .unwrap_or(DEFAULT_DOWNLOAD_EXTENSION)
}
