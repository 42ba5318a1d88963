//! Shareable references to app-private files.
//!
//! The camera runs outside the app sandbox, so it gets a `content://` URI
//! instead of a filesystem path.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Opaque shareable reference to a local file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentUri(String);

impl ContentUri {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{} is outside the shared root {}", .path.display(), .root.display())]
    OutsideRoot { path: PathBuf, root: PathBuf },
}

/// Turns a local file path into a reference another process can write through.
pub trait FileProvider: Send + Sync {
    fn uri_for_file(&self, path: &Path) -> Result<ContentUri, ProviderError>;
}

/// Provider that shares files below a single root directory.
///
/// URIs have the form `content://<authority>/<relative path>`.
#[derive(Debug, Clone)]
pub struct LocalFileProvider {
    authority: String,
    root: PathBuf,
}

impl LocalFileProvider {
    pub fn new(authority: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            authority: authority.into(),
            root: root.into(),
        }
    }

    /// Map a URI issued by this provider back to its path.
    ///
    /// Returns `None` for foreign authorities and for paths that try to climb
    /// out of the root.
    pub fn resolve(&self, uri: &ContentUri) -> Option<PathBuf> {
        let rest = uri.as_str().strip_prefix("content://")?;
        let (authority, relative) = rest.split_once('/')?;
        if authority != self.authority || relative.is_empty() {
            return None;
        }
        let relative = Path::new(relative);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(self.root.join(relative))
    }
}

impl FileProvider for LocalFileProvider {
    fn uri_for_file(&self, path: &Path) -> Result<ContentUri, ProviderError> {
        let relative = path
            .strip_prefix(&self.root)
            .map_err(|_| ProviderError::OutsideRoot {
                path: path.to_path_buf(),
                root: self.root.clone(),
            })?;
        let segments: Vec<_> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect();
        Ok(ContentUri::new(format!(
            "content://{}/{}",
            self.authority,
            segments.join("/")
        )))
    }
}
