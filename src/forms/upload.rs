use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named binary blob, as handed to `register_patient` when the user
/// attached an identification document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePayload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

const IMAGE_CONTENT_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/svg+xml",
    "image/gif",
    "image/webp",
];

/// The uploader only accepts image-like files (PNG, JPG, SVG, ...).
pub fn is_image_like(content_type: &str) -> bool {
    IMAGE_CONTENT_TYPES.contains(&content_type.trim())
}

/// Tracks preview URLs handed out for selected files, mirroring blob-URL
/// lifetime: a preview stays live until explicitly revoked. Previews that are
/// never revoked accumulate; `live()` exposes that so callers (and tests) can
/// observe the leak instead of it being silent.
#[derive(Debug, Default)]
pub struct PreviewRegistry {
    previews: BTreeMap<String, String>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a preview for `payload` and return its URL.
    pub fn create(&mut self, payload: &FilePayload) -> String {
        let url = format!("blob:{}", Uuid::new_v4());
        self.previews.insert(url.clone(), payload.file_name.clone());
        url
    }

    /// Release a preview. Returns false when the URL was never issued or was
    /// already revoked.
    pub fn revoke(&mut self, url: &str) -> bool {
        self.previews.remove(url).is_some()
    }

    pub fn live(&self) -> usize {
        self.previews.len()
    }
}
