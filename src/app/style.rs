//! Layer colours and per-layer style state

use std::fmt;

/// Golden ratio conjugate: consecutive hues land far apart
const GOLDEN_RATIO_CONJUGATE: f64 = 0.618_033_988_749_895;
const SATURATION: f64 = 0.99;
const VALUE: f64 = 0.99;

/// Opacity used to fill areas
pub const FILL_ALPHA: f64 = 0.5;
/// Opacity used for borders
pub const BORDER_ALPHA: f64 = 1.0;

/// An RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorRgb {
    /// Red
    pub red: u8,
    /// Green
    pub green: u8,
    /// Blue
    pub blue: u8,
}

impl ColorRgb {
    /// Convert from HSV, each component in `0.0..=1.0`
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::many_single_char_names,
        reason = "channels are clamped to 0..=255; names follow the HSV formulas"
    )]
    pub fn from_hsv(h: f64, s: f64, v: f64) -> Self {
        let sector = (h * 6.0).floor();
        let f = h.mul_add(6.0, -sector);
        let p = v * (1.0 - s);
        let q = v * f.mul_add(-s, 1.0);
        let t = v * (1.0 - f).mul_add(-s, 1.0);

        let (r, g, b) = match (sector as i64).rem_euclid(6) {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };

        let channel = |x: f64| (x * 255.0).round().clamp(0.0, 255.0) as u8;
        Self {
            red: channel(r),
            green: channel(g),
            blue: channel(b),
        }
    }

    /// CSS `rgba(...)` notation with the given opacity
    #[must_use]
    pub fn rgba(&self, alpha: f64) -> String {
        format!("rgba({},{},{},{alpha})", self.red, self.green, self.blue)
    }
}

impl fmt::Display for ColorRgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

/// Hands out well-separated colours, one per new layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorCreator {
    hue: f64,
}

impl ColorCreator {
    /// Start at `hue` (`0.0..1.0`)
    #[must_use]
    pub const fn new(hue: f64) -> Self {
        Self { hue }
    }

    /// The current colour
    #[must_use]
    pub fn current(&self) -> ColorRgb {
        ColorRgb::from_hsv(self.hue, SATURATION, VALUE)
    }

    /// Advance the hue and return the new colour
    pub fn next_color(&mut self) -> ColorRgb {
        self.hue = (self.hue + GOLDEN_RATIO_CONJUGATE) % 1.0;
        self.current()
    }
}

impl Default for ColorCreator {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Style parameters of one layer
#[derive(Debug, Clone, PartialEq)]
pub struct StyleContainer {
    /// Base colour
    pub color: ColorRgb,
    /// Image drawn for points (URL or data URL)
    pub image: Option<String>,
    /// Scale of that image
    pub image_scale: f64,
}

impl StyleContainer {
    /// Plain style in `color`
    #[must_use]
    pub const fn new(color: ColorRgb) -> Self {
        Self {
            color,
            image: None,
            image_scale: 1.0,
        }
    }

    /// Fill colour in CSS notation
    #[must_use]
    pub fn fill(&self) -> String {
        self.color.rgba(FILL_ALPHA)
    }

    /// Border colour in CSS notation
    #[must_use]
    pub fn border(&self) -> String {
        self.color.rgba(BORDER_ALPHA)
    }
}
