//! Stroke colors and the packed color word used by note sessions.

use serde::{Deserialize, Serialize};

/// An 8-bit RGB color with floating point alpha in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 1.0);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 1.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Decodes a packed color word.
    ///
    /// The low 32 bits hold red, green, blue and alpha from the least
    /// significant byte up. Some producers write the bytes in the opposite
    /// order; when the alpha byte is zero but a color byte is not, the word is
    /// read again as alpha, blue, green, red. Zero is opaque black.
    pub fn from_packed(value: i64) -> Rgba {
        let word = value as u32;
        if word == 0 {
            return Rgba::BLACK;
        }

        let [b0, b1, b2, b3] = word.to_le_bytes();
        if b3 == 0 && (b0 | b1 | b2) != 0 {
            return Rgba::new(b3, b2, b1, alpha(b0));
        }
        Rgba::new(b0, b1, b2, alpha(b3))
    }

    /// Like [`Rgba::from_packed`] for a value carried as `f64`.
    ///
    /// Non-finite values are treated as zero.
    pub fn from_packed_f64(value: f64) -> Rgba {
        if value.is_finite() {
            Rgba::from_packed(value as i64)
        } else {
            Rgba::from_packed(0)
        }
    }

    /// Returns true if the alpha channel is exactly 1.
    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }

    /// `#rrggbb` form, ignoring alpha.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

fn alpha(byte: u8) -> f64 {
    f64::from(byte) / 255.0
}
