//! Software RGBA surface
//!
//! Straight-alpha source-over compositing with hard-edged shapes: a pixel is
//! covered when its center lies inside the shape.

use glam::DVec2;

use super::font::{self, FontSpec, GLYPH_ADVANCE, GLYPH_COLS, GLYPH_ROWS, UNITS_PER_EM};
use super::{Color, Surface};

#[derive(Debug, Clone)]
pub struct RasterSurface {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0; 4]; (width as usize) * (height as usize)],
        }
    }

    /// RGBA at (`x`, `y`), `None` outside the buffer
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Count of pixels with non-zero alpha
    pub fn coverage(&self) -> usize {
        self.pixels.iter().filter(|p| p[3] > 0).count()
    }

    /// Pixel index range covering `[lo, hi)` on an axis of length `len`
    fn span(lo: f64, hi: f64, len: u32) -> std::ops::Range<u32> {
        // pixel i is covered when lo <= i + 0.5 < hi
        let start = (lo - 0.5).ceil().max(0.0);
        let end = (hi - 0.5).ceil().clamp(0.0, len as f64);
        if !start.is_finite() || !end.is_finite() || start >= end {
            return 0..0;
        }
        start as u32..end as u32
    }

    fn blend(&mut self, x: u32, y: u32, color: Color) {
        let idx = y as usize * self.width as usize + x as usize;
        let Some(dst) = self.pixels.get_mut(idx) else {
            return;
        };
        let sa = color.opacity();
        let da = dst[3] as f64 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            *dst = [0; 4];
            return;
        }
        let mix = |s: u8, d: u8| {
            let v = (s as f64 * sa + d as f64 * da * (1.0 - sa)) / out_a;
            v.round().clamp(0.0, 255.0) as u8
        };
        *dst = [
            mix(color.r, dst[0]),
            mix(color.g, dst[1]),
            mix(color.b, dst[2]),
            (out_a * 255.0).round() as u8,
        ];
    }
}

impl Surface for RasterSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        *self = RasterSurface::new(width, height);
    }

    fn clear(&mut self) {
        self.pixels.fill([0; 4]);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) {
        if color.a == 0 {
            return;
        }
        for py in Self::span(y, y + h, self.height) {
            for px in Self::span(x, x + w, self.width) {
                self.blend(px, py, color);
            }
        }
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Color) {
        if color.a == 0 || !(radius > 0.0) || !center.is_finite() {
            return;
        }
        let r2 = radius * radius;
        for py in Self::span(center.y - radius, center.y + radius, self.height) {
            for px in Self::span(center.x - radius, center.x + radius, self.width) {
                let d = DVec2::new(px as f64 + 0.5, py as f64 + 0.5) - center;
                if d.length_squared() <= r2 {
                    self.blend(px, py, color);
                }
            }
        }
    }

    fn fill_text(&mut self, text: &str, font: &FontSpec, center: DVec2, color: Color) {
        let unit = font.size_px / UNITS_PER_EM;
        if !(unit > 0.0) {
            return;
        }
        let width = font::text_units(text) as f64 * unit;
        let origin = DVec2::new(
            center.x - width / 2.0,
            center.y - GLYPH_ROWS as f64 * unit / 2.0,
        );
        for (i, c) in text.chars().enumerate() {
            let Some(glyph) = font::glyph(c) else {
                continue;
            };
            let cell_x = origin.x + (i * GLYPH_ADVANCE) as f64 * unit;
            for row in 0..GLYPH_ROWS {
                for col in 0..GLYPH_COLS {
                    if font::is_set(glyph, col, row) {
                        self.fill_rect(
                            cell_x + col as f64 * unit,
                            origin.y + row as f64 * unit,
                            unit,
                            unit,
                            color,
                        );
                    }
                }
            }
        }
    }

    fn read_alpha(&self) -> crate::Result<Vec<u8>> {
        Ok(self.pixels.iter().map(|p| p[3]).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rect_clips_to_bounds() {
        let mut s = RasterSurface::new(10, 10);
        s.fill_rect(-5.0, -5.0, 8.0, 8.0, Color::BLACK);
        assert_eq!(s.coverage(), 9);
        assert_eq!(s.pixel(2, 2), Some([0, 0, 0, 255]));
        assert_eq!(s.pixel(3, 3), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_fill_circle_is_round() {
        let mut s = RasterSurface::new(20, 20);
        s.fill_circle(DVec2::new(10.0, 10.0), 4.0, Color::BLACK);
        assert_eq!(s.pixel(10, 10).unwrap()[3], 255);
        assert_eq!(s.pixel(13, 13).unwrap()[3], 0);
        // area close to pi * r^2
        let area = s.coverage() as f64;
        assert!((area - std::f64::consts::PI * 16.0).abs() < 8.0, "area {area}");
    }

    #[test]
    fn test_translucent_overlay_fades_toward_overlay_color() {
        let mut s = RasterSurface::new(1, 1);
        s.fill_rect(0.0, 0.0, 1.0, 1.0, Color::BLACK);
        s.fill_all(Color::WHITE.with_opacity(0.5));
        let p = s.pixel(0, 0).unwrap();
        assert_eq!(p[3], 255);
        assert!((126..=129).contains(&p[0]));
    }

    #[test]
    fn test_text_is_centered() {
        let mut s = RasterSurface::new(200, 100);
        let font = FontSpec::new("sans-serif", 600, 40.0);
        s.fill_text("HH", &font, DVec2::new(100.0, 50.0), Color::BLACK);
        assert!(s.coverage() > 0);
        let alpha = s.read_alpha().unwrap();
        let cols: Vec<u32> = (0..200u32)
            .filter(|x| (0..100u32).any(|y| alpha[(y * 200 + x) as usize] > 0))
            .collect();
        let (lo, hi) = (cols[0], *cols.last().unwrap());
        // "HH" spans 11 units of 4px = 44px
        assert_eq!(hi - lo + 1, 44);
        assert!(((lo + hi) as i32 - 199).abs() <= 1);
    }

    #[test]
    fn test_zero_size_surface() {
        let mut s = RasterSurface::new(0, 0);
        s.fill_all(Color::BLACK);
        s.fill_circle(DVec2::ZERO, 3.0, Color::BLACK);
        assert!(s.read_alpha().unwrap().is_empty());
    }
}
