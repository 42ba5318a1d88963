//! PhotoExpress core: domain layer for brightness adjustment.
//!
//! This crate contains the brightness-to-color-filter mapping, the pixel
//! filter shared by preview and export, and the JPEG codec helpers. No async
//! runtime or collaborator dependencies.

pub mod codec;
pub mod error;
pub mod image;
pub mod transform;

// Re-exports for convenience.
pub use crate::error::CoreError;
pub use crate::image::PixelBuffer;
pub use crate::transform::apply::ImageFilterEngine;
pub use crate::transform::brightness::BrightnessLevel;
pub use crate::transform::color::{ColorTransform, Rgba, compute_transform};
