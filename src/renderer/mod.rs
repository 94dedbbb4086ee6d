//! Drawing surface abstraction
//!
//! Everything the particle field touches on screen goes through [`Surface`]:
//! the browser implementation wraps a 2D canvas context, the software
//! implementation backs native runs and tests.

pub mod color;
pub mod font;
pub mod raster;
#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use color::Color;
pub use font::FontSpec;
pub use raster::RasterSurface;
#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;

use glam::DVec2;

/// A 2D drawing context over a pixel buffer
pub trait Surface {
    /// Pixel dimensions (width, height)
    fn size(&self) -> (u32, u32);

    /// Resize the backing buffer; contents are discarded
    fn resize(&mut self, width: u32, height: u32);

    /// Reset every pixel to fully transparent
    fn clear(&mut self);

    /// Fill an axis-aligned rectangle (source-over blending)
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color);

    /// Fill a disc centered at `center`
    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Color);

    /// Draw `text` centered horizontally and vertically on `center`
    fn fill_text(&mut self, text: &str, font: &FontSpec, center: DVec2, color: Color);

    /// Alpha channel of the whole buffer, row-major, `width * height` bytes
    fn read_alpha(&self) -> crate::Result<Vec<u8>>;

    /// Paint `color` over the whole surface
    fn fill_all(&mut self, color: Color) {
        let (w, h) = self.size();
        self.fill_rect(0.0, 0.0, w as f64, h as f64, color);
    }
}
