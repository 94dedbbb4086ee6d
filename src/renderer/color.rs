//! CSS-style color tokens

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An RGBA color, serialized as a CSS hex string (`#rrggbb` or `#rrggbbaa`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with alpha given as a 0-1 opacity
    pub fn with_opacity(self, opacity: f64) -> Self {
        let a = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { a, ..self }
    }

    /// Alpha as a 0-1 opacity
    pub fn opacity(&self) -> f64 {
        self.a as f64 / 255.0
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`
    pub fn parse(s: &str) -> Result<Self> {
        let hex = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| Error::InvalidConfig(format!("color {s:?} must start with '#'")))?;
        let nibble = |c: char| {
            c.to_digit(16)
                .map(|d| d as u8)
                .ok_or_else(|| Error::InvalidConfig(format!("bad hex digit in color {s:?}")))
        };
        let digits = hex.chars().map(nibble).collect::<Result<Vec<u8>>>()?;
        let pair = |i: usize| digits[i] << 4 | digits[i + 1];
        match digits.len() {
            3 => Ok(Color::rgb(
                digits[0] * 17,
                digits[1] * 17,
                digits[2] * 17,
            )),
            6 => Ok(Color::rgb(pair(0), pair(2), pair(4))),
            8 => Ok(Color::rgba(pair(0), pair(2), pair(4), pair(6))),
            _ => Err(Error::InvalidConfig(format!(
                "color {s:?} must have 3, 6 or 8 hex digits"
            ))),
        }
    }

    /// CSS value suitable for `fillStyle`
    pub fn to_css(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({}, {}, {}, {:.3})",
                self.r,
                self.g,
                self.b,
                self.opacity()
            )
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Color::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}
