//! Brightness slider level.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Slider position in `[0, 200]`. 100 leaves the image unchanged, 0 renders
/// black, 200 saturates to white.
///
/// The only constructor clamps, so a `BrightnessLevel` is always in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub struct BrightnessLevel(u8);

impl BrightnessLevel {
    pub const MIN: Self = Self(0);
    pub const NEUTRAL: Self = Self(100);
    pub const MAX: Self = Self(200);

    /// Clamp an arbitrary slider value into `[0, 200]`.
    pub const fn new(level: i32) -> Self {
        if level <= 0 {
            Self::MIN
        } else if level >= Self::MAX.0 as i32 {
            Self::MAX
        } else {
            Self(level as u8)
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    pub const fn is_neutral(self) -> bool {
        self.0 == Self::NEUTRAL.0
    }
}

impl Default for BrightnessLevel {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl From<i32> for BrightnessLevel {
    fn from(level: i32) -> Self {
        Self::new(level)
    }
}

impl From<BrightnessLevel> for i32 {
    fn from(level: BrightnessLevel) -> Self {
        i32::from(level.0)
    }
}

impl fmt::Display for BrightnessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
