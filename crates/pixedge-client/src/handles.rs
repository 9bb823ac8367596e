//! Browsable handles for in-memory image bytes.
//!
//! A handle stands in for a locally viewable resource (a preview of the chosen
//! file or of a processed result). Every handle must be revoked once it is
//! superseded so repeated uploads do not accumulate live entries.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use serde::Serialize;
use uuid::Uuid;

const HANDLE_SCHEME: &str = "blob:pixedge/";

/// Opaque locator for bytes held in a [`HandleRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BlobHandle(String);

impl BlobHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bytes and media type behind a handle.
#[derive(Debug, Clone, PartialEq)]
pub struct BlobResource {
    pub bytes: Bytes,
    pub media_type: String,
}

/// Shared registry of live handles. Clones share the same store.
#[derive(Debug, Clone, Default)]
pub struct HandleRegistry {
    entries: Arc<Mutex<HashMap<BlobHandle, BlobResource>>>,
}

impl HandleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<BlobHandle, BlobResource>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn create(&self, bytes: Bytes, media_type: impl Into<String>) -> BlobHandle {
        let handle = BlobHandle(format!("{}{}", HANDLE_SCHEME, Uuid::new_v4()));
        self.lock().insert(
            handle.clone(),
            BlobResource {
                bytes,
                media_type: media_type.into(),
            },
        );
        handle
    }

    pub fn resolve(&self, handle: &BlobHandle) -> Option<BlobResource> {
        self.lock().get(handle).cloned()
    }

    /// Release a handle. Returns `false` if it was already gone.
    pub fn revoke(&self, handle: &BlobHandle) -> bool {
        self.lock().remove(handle).is_some()
    }

    pub fn live_count(&self) -> usize {
        self.lock().len()
    }
}
