//! Lighting color filter derived from a brightness level.
//!
//! The filter is a pair of colors applied per channel as
//!
//! ```text
//! out = clamp(in × multiplier / 255 + additive, 0, 255)
//! ```
//!
//! Brightness is split into two linear segments: at or below neutral only the
//! multiplier scales channels toward black; above neutral only the additive
//! term pushes channels toward white.

use serde::{Deserialize, Serialize};

use crate::transform::brightness::BrightnessLevel;

/// An 8-bit RGBA color used as a filter term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Full-intensity multiplier (pass-through).
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Zero additive term.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color with the same value on every RGB channel.
    pub const fn opaque_gray(value: u8) -> Self {
        Self::new(value, value, value, 255)
    }

    pub const fn rgb(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Multiplicative and additive filter colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorTransform {
    pub multiplier: Rgba,
    pub additive: Rgba,
}

impl ColorTransform {
    /// Leaves every pixel unchanged.
    pub const IDENTITY: Self = Self {
        multiplier: Rgba::WHITE,
        additive: Rgba::TRANSPARENT,
    };

    /// Map a slider level to its filter.
    ///
    /// - level ≤ 100: multiplier channels = round(255 × level / 100), additive = 0.
    /// - level > 100: additive channels = round(255 × (level / 100 − 1)),
    ///   multiplier = white.
    pub const fn from_brightness(level: BrightnessLevel) -> Self {
        let level = level.get() as u32;
        let neutral = BrightnessLevel::NEUTRAL.get() as u32;
        if level > neutral {
            Self {
                multiplier: Rgba::WHITE,
                additive: Rgba::opaque_gray(scale_255(level - neutral)),
            }
        } else {
            Self {
                multiplier: Rgba::opaque_gray(scale_255(level)),
                additive: Rgba::TRANSPARENT,
            }
        }
    }

    /// True when applying this filter cannot change any RGB channel.
    pub const fn is_identity(&self) -> bool {
        self.multiplier.r == 255
            && self.multiplier.g == 255
            && self.multiplier.b == 255
            && self.additive.r == 0
            && self.additive.g == 0
            && self.additive.b == 0
    }
}

impl Default for ColorTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<BrightnessLevel> for ColorTransform {
    fn from(level: BrightnessLevel) -> Self {
        Self::from_brightness(level)
    }
}

/// Free-function form of [`ColorTransform::from_brightness`].
pub const fn compute_transform(level: BrightnessLevel) -> ColorTransform {
    ColorTransform::from_brightness(level)
}

/// round(255 × percent / 100), half rounding up, for percent in [0, 100].
const fn scale_255(percent: u32) -> u8 {
    ((255 * percent + 50) / 100) as u8
}
