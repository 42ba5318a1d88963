//! Brightness transform: slider level, color filter mapping and pixel application.

pub mod apply;
pub mod brightness;
pub mod color;
