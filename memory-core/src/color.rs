use std::fmt;

use rand::Rng;

/// Display color of a piece, rendered as a CSS `rgb()` value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Uniformly random over the full RGB cube.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Color {
            r: rng.r#gen(),
            g: rng.r#gen(),
            b: rng.r#gen(),
        }
    }

    /// Text color that stays readable on top of this background.
    pub fn contrast(&self) -> &'static str {
        // Rec. 601 luma
        let luma = 0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64;
        if luma > 140.0 { "#111" } else { "#fff" }
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from(v: (u8, u8, u8)) -> Self {
        Color {
            r: v.0,
            g: v.1,
            b: v.2,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}
