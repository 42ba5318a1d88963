//! Session configuration.

use std::ffi::OsString;
use std::path::PathBuf;

use photoexpress_core::codec::MAX_JPEG_QUALITY;
use serde::{Deserialize, Serialize};

/// Default content authority handed out by the file provider.
const DEFAULT_AUTHORITY: &str = "com.zybooks.photoexpress.fileprovider";
/// Default media collection for exported photos.
const DEFAULT_COLLECTION: &str = "Pictures";
/// Default prefix for captured file names.
const DEFAULT_FILE_PREFIX: &str = "photo_";

const STORAGE_DIR_VAR: &str = "PHOTOEXPRESS_STORAGE_DIR";
const JPEG_QUALITY_VAR: &str = "PHOTOEXPRESS_JPEG_QUALITY";

/// Runtime configuration for a capture/export session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// App-private directory the camera writes captures into.
    pub storage_dir: PathBuf,
    /// Prefix for capture file names (`photo_20240101_120000.jpg`).
    pub file_prefix: String,
    /// Authority used when building shareable content URIs.
    pub authority: String,
    /// Media library collection exports are published to.
    pub collection: String,
    /// JPEG quality for export, 1–100.
    pub jpeg_quality: u8,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from_lookup(|key| std::env::var_os(key))
    }
}

impl SessionConfig {
    /// Defaults with overrides from `lookup`, keyed by environment variable
    /// name.
    ///
    /// `PHOTOEXPRESS_JPEG_QUALITY` is clamped to `1..=100`; values that do not
    /// parse as a number are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        Self {
            storage_dir: lookup(STORAGE_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join("photoexpress")),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            authority: DEFAULT_AUTHORITY.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            jpeg_quality: lookup(JPEG_QUALITY_VAR)
                .and_then(|s| s.to_str()?.trim().parse::<u32>().ok())
                .map(|q| q.clamp(1, u32::from(MAX_JPEG_QUALITY)) as u8)
                .unwrap_or(MAX_JPEG_QUALITY),
        }
    }

    /// Default configuration rooted at `storage_dir`.
    pub fn with_storage_dir(storage_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage_dir: storage_dir.into(),
            ..Self::default()
        }
    }
}
