//! Text mask sampling
//!
//! Renders the target text onto the surface, reads the alpha channel back,
//! wipes the surface again, and keeps one coordinate per grid cell whose
//! alpha clears the threshold. The mask itself is never shown.

use glam::{DVec2, UVec2};

use crate::config::FieldConfig;
use crate::consts::MASK_ALPHA_THRESHOLD;
use crate::error::Result;
use crate::renderer::{Color, FontSpec, Surface};

/// Rasterizer parameters derived from a [`FieldConfig`]
#[derive(Debug, Clone)]
pub struct TextMask<'a> {
    config: &'a FieldConfig,
}

impl<'a> TextMask<'a> {
    pub fn new(config: &'a FieldConfig) -> Self {
        Self { config }
    }

    /// Font used on a canvas `width` pixels wide
    pub fn font_for(&self, width: u32) -> FontSpec {
        self.config.font_for_width(width)
    }

    /// Grid stride used on a canvas `width` pixels wide
    pub fn stride_for(&self, width: u32) -> u32 {
        self.config.sampling.for_width(width).max(1)
    }

    /// Sample the text mask at the surface's current size
    ///
    /// A zero-sized surface yields no coordinates.
    pub fn rasterize<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<Vec<UVec2>> {
        let (width, height) = surface.size();
        if width == 0 || height == 0 {
            log::debug!("Skipping mask for empty {}x{} surface", width, height);
            return Ok(Vec::new());
        }

        let font = self.font_for(width);
        let center = DVec2::new(width as f64 / 2.0, height as f64 / 2.0);

        surface.clear();
        surface.fill_text(&self.config.text, &font, center, Color::BLACK);
        let alpha = surface.read_alpha();
        surface.clear();
        let alpha = alpha?;

        let stride = self.stride_for(width);
        let points = sample_alpha(&alpha, width, height, stride);
        log::debug!(
            "Mask {:?} at {}px on {}x{}, stride {}: {} points",
            self.config.text,
            font.size_px,
            width,
            height,
            stride,
            points.len()
        );
        Ok(points)
    }
}

/// Grid-sample a row-major alpha buffer, keeping cells above the threshold
///
/// A buffer shorter than `width * height` is treated as transparent past its end.
pub fn sample_alpha(alpha: &[u8], width: u32, height: u32, stride: u32) -> Vec<UVec2> {
    if stride == 0 {
        return Vec::new();
    }
    let step = stride as usize;
    let mut points = Vec::new();
    for y in (0..height).step_by(step) {
        for x in (0..width).step_by(step) {
            let idx = y as usize * width as usize + x as usize;
            if alpha.get(idx).is_some_and(|&a| a > MASK_ALPHA_THRESHOLD) {
                points.push(UVec2::new(x, y));
            }
        }
    }
    points
}
