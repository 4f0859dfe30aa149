//! Axis-aligned bounds and crop insets.

use serde::{Deserialize, Serialize};

use super::point::CurvePoint;

/// An axis-aligned box in XYXY form (min_x, min_y, max_x, max_y).
///
/// [`Bounds::EMPTY`] is the identity for [`Bounds::include`]: its minimum is
/// `+inf` and its maximum `-inf`, so it is not finite until something has
/// been added to it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub const EMPTY: Bounds = Bounds {
        min_x: f64::INFINITY,
        min_y: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        max_y: f64::NEG_INFINITY,
    };

    #[inline]
    pub fn from_xyxy(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Grows the box to cover a square of half-size `radius` around `p`.
    #[inline]
    pub fn include(&mut self, p: CurvePoint, radius: f64) {
        self.min_x = self.min_x.min(p.x - radius);
        self.min_y = self.min_y.min(p.y - radius);
        self.max_x = self.max_x.max(p.x + radius);
        self.max_y = self.max_y.max(p.y + radius);
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Returns true if all coordinates are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.min_x.is_finite()
            && self.min_y.is_finite()
            && self.max_x.is_finite()
            && self.max_y.is_finite()
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Insets trimmed from each canvas edge when cropping to content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl CropRect {
    pub const NONE: CropRect = CropRect {
        left: 0.0,
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
    };

    pub fn is_none(&self) -> bool {
        *self == CropRect::NONE
    }
}
