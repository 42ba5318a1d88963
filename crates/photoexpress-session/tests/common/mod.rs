//! Shared fakes for session integration tests.

#![allow(dead_code)]

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use photoexpress_core::PixelBuffer;
use photoexpress_core::codec;
use photoexpress_session::media::MediaError;
use photoexpress_session::{
    Camera, CameraOutcome, ContentUri, LocalFileProvider, MediaEntry, MediaLibrary, MediaSink,
    MemoryMediaLibrary, SessionConfig, SessionController,
};

pub const AUTHORITY: &str = "test.photoexpress.fileprovider";

/// What the fake camera does when asked for a picture.
#[derive(Debug, Clone)]
pub enum Shot {
    Save(PixelBuffer),
    SaveBytes(Vec<u8>),
    Cancel,
    Fail,
}

/// Camera that writes a prepared image through the content URI it is given.
pub struct FakeCamera {
    provider: LocalFileProvider,
    shot: Shot,
}

impl FakeCamera {
    pub fn new(storage: &Path, shot: Shot) -> Self {
        Self {
            provider: LocalFileProvider::new(AUTHORITY, storage),
            shot,
        }
    }
}

impl Camera for FakeCamera {
    async fn take_picture(&self, destination: &ContentUri) -> CameraOutcome {
        let Some(path) = self.provider.resolve(destination) else {
            return CameraOutcome::Failed(format!("cannot resolve {destination}"));
        };
        let bytes = match &self.shot {
            Shot::Save(buffer) => match codec::encode_jpeg(buffer, 100) {
                Ok(bytes) => bytes,
                Err(e) => return CameraOutcome::Failed(e.to_string()),
            },
            Shot::SaveBytes(bytes) => bytes.clone(),
            Shot::Cancel => return CameraOutcome::Cancelled,
            Shot::Fail => return CameraOutcome::Failed("sensor error".to_string()),
        };
        match std::fs::write(&path, bytes) {
            Ok(()) => CameraOutcome::Saved,
            Err(e) => CameraOutcome::Failed(e.to_string()),
        }
    }
}

/// Media library whose sinks fail on the first write.
#[derive(Debug, Default)]
pub struct FailingMediaLibrary;

struct FailingSink;

impl Write for FailingSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::other("disk full"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl MediaSink for FailingSink {
    fn publish(self: Box<Self>) -> Result<String, MediaError> {
        Err(MediaError::Rejected("failing sink".to_string()))
    }
}

impl MediaLibrary for FailingMediaLibrary {
    fn insert(&self, _entry: &MediaEntry) -> Result<Box<dyn MediaSink>, MediaError> {
        Ok(Box::new(FailingSink))
    }
}

/// Memory library whose `insert` blocks until the paired [`Gate`] opens.
pub struct GatedMediaLibrary {
    inner: MemoryMediaLibrary,
    gate: parking_lot::Mutex<mpsc::Receiver<()>>,
}

/// Holds a [`GatedMediaLibrary`] closed. Opening is permanent.
pub struct Gate(mpsc::Sender<()>);

impl Gate {
    pub fn open(self) {}
}

pub fn gated_library() -> (GatedMediaLibrary, Gate, MemoryMediaLibrary) {
    let (tx, rx) = mpsc::channel();
    let inner = MemoryMediaLibrary::new();
    let library = GatedMediaLibrary {
        inner: inner.clone(),
        gate: parking_lot::Mutex::new(rx),
    };
    (library, Gate(tx), inner)
}

impl MediaLibrary for GatedMediaLibrary {
    fn insert(&self, entry: &MediaEntry) -> Result<Box<dyn MediaSink>, MediaError> {
        // Returns once the sender is dropped.
        let _ = self.gate.lock().recv();
        self.inner.insert(entry)
    }
}

/// Poll `done` until it holds, failing the test after a generous deadline.
pub async fn wait_for(mut done: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while !done() {
        assert!(Instant::now() < deadline, "condition not reached in time");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

/// Smooth test image with opaque alpha.
pub fn gradient(width: u32, height: u32) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, |x, y| {
        [
            (40 + x * 160 / width) as u8,
            (60 + y * 140 / height) as u8,
            120,
            255,
        ]
    })
}

pub struct Harness {
    pub storage: tempfile::TempDir,
    pub controller: SessionController,
}

impl Harness {
    pub fn storage_path(&self) -> PathBuf {
        self.storage.path().to_path_buf()
    }

    pub fn camera(&self, shot: Shot) -> FakeCamera {
        FakeCamera::new(self.storage.path(), shot)
    }
}

/// Controller writing captures to a temp dir and exports to `library`.
pub fn harness(library: Arc<dyn MediaLibrary>) -> Harness {
    harness_with(library, |_| {})
}

/// Like [`harness`], with a chance to adjust the configuration first.
pub fn harness_with(
    library: Arc<dyn MediaLibrary>,
    configure: impl FnOnce(&mut SessionConfig),
) -> Harness {
    let storage = tempfile::tempdir().expect("temp dir");
    let mut config = SessionConfig::with_storage_dir(storage.path());
    configure(&mut config);
    let provider = Arc::new(LocalFileProvider::new(AUTHORITY, storage.path()));
    let controller = SessionController::new(
        &config,
        provider,
        library,
        tokio::runtime::Handle::current(),
    );
    Harness {
        storage,
        controller,
    }
}

pub fn memory_harness() -> (Harness, MemoryMediaLibrary) {
    let library = MemoryMediaLibrary::new();
    (harness(Arc::new(library.clone())), library)
}
