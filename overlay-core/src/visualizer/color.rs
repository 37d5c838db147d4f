//! Colors and the fixed lightening transforms used by note blocks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::OverlayError;

/// Lightness added for the block's depth shadow.
pub const SHADOW_LIGHTEN: f64 = 0.2;
/// Lightness added for the direction indicator.
pub const INDICATOR_LIGHTEN: f64 = 0.75;
/// Lightness added for the cut line highlight.
pub const CUT_LIGHTEN: f64 = 0.9;

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Hue (degrees), saturation and lightness in `[0, 1]`.
    pub fn to_hsl(self) -> (f64, f64, f64) {
        let r = self.r as f64 / 255.0;
        let g = self.g as f64 / 255.0;
        let b = self.b as f64 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let lightness = (max + min) / 2.0;
        let delta = max - min;

        if delta == 0.0 {
            return (0.0, 0.0, lightness);
        }

        let saturation = if lightness > 0.5 {
            delta / (2.0 - max - min)
        } else {
            delta / (max + min)
        };

        let hue = if max == r {
            (g - b) / delta + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };

        (hue * 60.0, saturation, lightness)
    }

    /// Build a color from HSL components and an alpha byte.
    pub fn from_hsl(hue: f64, saturation: f64, lightness: f64, alpha: u8) -> Self {
        let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let h = (hue.rem_euclid(360.0)) / 60.0;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());

        let (r1, g1, b1) = match h as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = lightness - chroma / 2.0;
        let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;

        Self::rgba(channel(r1), channel(g1), channel(b1), alpha)
    }

    /// Same color with its alpha scaled by `opacity`.
    pub fn with_opacity(self, opacity: f64) -> Self {
        let alpha = (self.a as f64 * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a: alpha, ..self }
    }
}

/// Raise HSL lightness by `amount`, clamped to `[0, 1]`. Alpha is kept.
pub fn lighten(amount: f64, color: Color) -> Color {
    let (hue, saturation, lightness) = color.to_hsl();
    Color::from_hsl(hue, saturation, (lightness + amount).clamp(0.0, 1.0), color.a)
}

pub fn shadow_color(base: Color) -> Color {
    lighten(SHADOW_LIGHTEN, base)
}

pub fn indicator_color(base: Color) -> Color {
    lighten(INDICATOR_LIGHTEN, base)
}

pub fn cut_color(base: Color) -> Color {
    lighten(CUT_LIGHTEN, base)
}

impl FromStr for Color {
    type Err = OverlayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || OverlayError::InvalidColor {
            value: s.to_string(),
        };
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() {
            return Err(invalid());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());

        match hex.len() {
            6 => Ok(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Color::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = OverlayError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}
