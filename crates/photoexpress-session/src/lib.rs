//! PhotoExpress session: capture, live preview and export around the core filter.
//!
//! The [`SessionController`] owns the single mutable session state. Camera,
//! file sharing, and media library access go through collaborator traits so
//! the pipeline runs the same against a real device bridge or an in-process
//! fake.

pub mod camera;
pub mod capture;
pub mod config;
pub mod controller;
pub mod events;
pub mod export;
pub mod media;
pub mod preview;
pub mod provider;
pub mod state;

pub use camera::{Camera, CameraOutcome};
pub use capture::{CaptureError, CaptureSession, CapturedPhoto};
pub use config::SessionConfig;
pub use controller::SessionController;
pub use events::SessionEvent;
pub use export::{ExportError, ExportPipeline, ExportReceipt, ExportRequest, PendingExport};
pub use media::{DirectoryMediaLibrary, MediaEntry, MediaLibrary, MediaSink, MemoryMediaLibrary};
pub use preview::{PreviewController, PreviewError, Viewport};
pub use provider::{ContentUri, FileProvider, LocalFileProvider};
pub use state::SessionState;
