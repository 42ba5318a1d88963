//! User-visible media library collaborator.
//!
//! An entry becomes visible only when its sink is published. Dropping a sink
//! without publishing discards whatever was written, so a failed export never
//! leaves a partial image behind.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

/// MIME type of every exported image.
pub const JPEG_MIME_TYPE: &str = "image/jpeg";

/// Upper bound on ` (n)` suffixes tried when a display name is taken.
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Metadata for a new media library row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaEntry {
    pub display_name: String,
    pub mime_type: String,
    pub collection: String,
}

impl MediaEntry {
    pub fn jpeg(display_name: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            mime_type: JPEG_MIME_TYPE.to_string(),
            collection: collection.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid media name: {0:?}")]
    InvalidName(String),
    #[error("media library rejected {0}")]
    Rejected(String),
}

/// Writable, not-yet-visible media entry.
pub trait MediaSink: Write + Send {
    /// Make the entry visible. Returns a location string for the new entry.
    fn publish(self: Box<Self>) -> Result<String, MediaError>;
}

/// Public gallery store.
pub trait MediaLibrary: Send + Sync {
    fn insert(&self, entry: &MediaEntry) -> Result<Box<dyn MediaSink>, MediaError>;
}

fn validate_name(name: &str) -> Result<(), MediaError> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.starts_with('.');
    if bad {
        return Err(MediaError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Media library backed by `<root>/<collection>/` on the local filesystem.
#[derive(Debug, Clone)]
pub struct DirectoryMediaLibrary {
    root: PathBuf,
}

impl DirectoryMediaLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl MediaLibrary for DirectoryMediaLibrary {
    fn insert(&self, entry: &MediaEntry) -> Result<Box<dyn MediaSink>, MediaError> {
        validate_name(&entry.display_name)?;
        validate_name(&entry.collection)?;

        let dir = self.root.join(&entry.collection);
        std::fs::create_dir_all(&dir)?;
        // Hidden until persisted under its real name.
        let file = tempfile::Builder::new()
            .prefix(".pending-")
            .suffix(".tmp")
            .tempfile_in(&dir)?;

        Ok(Box::new(PendingFile {
            file,
            dir,
            display_name: entry.display_name.clone(),
        }))
    }
}

struct PendingFile {
    file: NamedTempFile,
    dir: PathBuf,
    display_name: String,
}

impl Write for PendingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl MediaSink for PendingFile {
    fn publish(self: Box<Self>) -> Result<String, MediaError> {
        let PendingFile {
            mut file,
            dir,
            display_name,
        } = *self;
        file.flush()?;
        file.as_file().sync_all()?;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let target = dir.join(numbered_name(&display_name, attempt));
            match file.persist_noclobber(&target) {
                Ok(_) => return Ok(target.display().to_string()),
                Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => file = e.file,
                Err(e) => return Err(MediaError::Io(e.error)),
            }
        }
        Err(MediaError::Rejected(display_name))
    }
}

/// `photo.jpg`, `photo (1).jpg`, `photo (2).jpg`, ...
fn numbered_name(display_name: &str, n: u32) -> String {
    if n == 0 {
        return display_name.to_string();
    }
    match display_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem} ({n}).{ext}"),
        _ => format!("{display_name} ({n})"),
    }
}

/// A published in-memory media entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMedia {
    pub entry: MediaEntry,
    pub bytes: Vec<u8>,
}

/// In-process media library. Clones share the same store.
#[derive(Debug, Clone, Default)]
pub struct MemoryMediaLibrary {
    entries: Arc<Mutex<Vec<StoredMedia>>>,
}

impl MemoryMediaLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every published entry, oldest first.
    pub fn entries(&self) -> Vec<StoredMedia> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl MediaLibrary for MemoryMediaLibrary {
    fn insert(&self, entry: &MediaEntry) -> Result<Box<dyn MediaSink>, MediaError> {
        validate_name(&entry.display_name)?;
        Ok(Box::new(MemorySink {
            entry: entry.clone(),
            bytes: Vec::new(),
            entries: Arc::clone(&self.entries),
        }))
    }
}

struct MemorySink {
    entry: MediaEntry,
    bytes: Vec<u8>,
    entries: Arc<Mutex<Vec<StoredMedia>>>,
}

impl Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl MediaSink for MemorySink {
    fn publish(self: Box<Self>) -> Result<String, MediaError> {
        let MemorySink {
            entry,
            bytes,
            entries,
        } = *self;
        let location = format!("memory://{}/{}", entry.collection, entry.display_name);
        entries.lock().push(StoredMedia { entry, bytes });
        Ok(location)
    }
}
