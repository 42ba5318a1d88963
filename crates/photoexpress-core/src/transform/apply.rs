//! Applies a [`ColorTransform`] to pixel data.
//!
//! Preview and export both go through [`ImageFilterEngine::apply`] so the
//! saved file matches what was on screen.

use crate::image::PixelBuffer;
use crate::transform::color::ColorTransform;

/// Stateless lighting filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageFilterEngine;

impl ImageFilterEngine {
    /// Filter every pixel of `source` into a new buffer of the same size.
    ///
    /// `source` is never modified, so callers can keep a pristine decode and
    /// re-apply different transforms to it.
    pub fn apply(source: &PixelBuffer, transform: &ColorTransform) -> PixelBuffer {
        if transform.is_identity() {
            return source.clone();
        }

        source.map_pixels(|px| evaluate_pixel(px, transform))
    }
}

/// Filter a single RGBA pixel. Alpha passes through untouched.
pub fn evaluate_pixel(px: [u8; 4], transform: &ColorTransform) -> [u8; 4] {
    let m = transform.multiplier.rgb();
    let a = transform.additive.rgb();
    [
        channel(px[0], m[0], a[0]),
        channel(px[1], m[1], a[1]),
        channel(px[2], m[2], a[2]),
        px[3],
    ]
}

/// round(value × mul / 255) + add, saturated at 255.
fn channel(value: u8, mul: u8, add: u8) -> u8 {
    let scaled = (u32::from(value) * u32::from(mul) + 127) / 255;
    (scaled + u32::from(add)).min(255) as u8
}
