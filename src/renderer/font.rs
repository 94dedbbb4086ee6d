//! Font description and the built-in fallback bitmap font
//!
//! The browser resolves `FontSpec::css()` against installed fonts. The
//! software surface has no font stack, so it draws with a 5x7 bitmap face
//! covering ASCII letters and digits (lowercase folds to uppercase).

use serde::{Deserialize, Serialize};

/// Font family, weight and size for a text draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub weight: u16,
    pub size_px: f64,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, weight: u16, size_px: f64) -> Self {
        Self {
            family: family.into(),
            weight,
            size_px,
        }
    }

    /// CSS shorthand, e.g. `600 100px Arial, sans-serif`
    pub fn css(&self) -> String {
        format!("{} {}px {}", self.weight, self.size_px, self.family)
    }
}

/// Glyph cell width in font units
pub const GLYPH_COLS: usize = 5;
/// Glyph cell height in font units
pub const GLYPH_ROWS: usize = 7;
/// Horizontal advance per character in font units
pub const GLYPH_ADVANCE: usize = GLYPH_COLS + 1;
/// Font units per em; cap height is 7/10 of the font size
pub const UNITS_PER_EM: f64 = 10.0;

/// Each row holds 5 bits, bit 4 = leftmost pixel
pub type Glyph = [u8; GLYPH_ROWS];

const LETTERS: [Glyph; 26] = [
    [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001], // A
    [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110], // B
    [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110], // C
    [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110], // D
    [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111], // E
    [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000], // F
    [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111], // G
    [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001], // H
    [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110], // I
    [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100], // J
    [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001], // K
    [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111], // L
    [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001], // M
    [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001], // N
    [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110], // O
    [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000], // P
    [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101], // Q
    [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001], // R
    [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110], // S
    [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100], // T
    [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110], // U
    [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100], // V
    [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010], // W
    [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001], // X
    [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100], // Y
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111], // Z
];

const DIGITS: [Glyph; 10] = [
    [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110], // 0
    [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110], // 1
    [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111], // 2
    [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110], // 3
    [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010], // 4
    [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110], // 5
    [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110], // 6
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000], // 7
    [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110], // 8
    [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100], // 9
];

/// Bitmap for `c`; unsupported characters render blank
pub fn glyph(c: char) -> Option<&'static Glyph> {
    match c.to_ascii_uppercase() {
        c @ 'A'..='Z' => LETTERS.get((c as u8 - b'A') as usize),
        c @ '0'..='9' => DIGITS.get((c as u8 - b'0') as usize),
        _ => None,
    }
}

/// Whether the glyph cell at (`col`, `row`) is inked
#[inline]
pub fn is_set(glyph: &Glyph, col: usize, row: usize) -> bool {
    row < GLYPH_ROWS && col < GLYPH_COLS && glyph[row] & (1 << (GLYPH_COLS - 1 - col)) != 0
}

/// Width of `text` in font units
pub fn text_units(text: &str) -> usize {
    let n = text.chars().count();
    if n == 0 { 0 } else { n * GLYPH_ADVANCE - 1 }
}
