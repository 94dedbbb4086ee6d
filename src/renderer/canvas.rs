//! Browser surface over a `CanvasRenderingContext2d`

use glam::DVec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Color, FontSpec, Surface};
use crate::error::{Error, Result};

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Acquire a 2D context tuned for frequent `getImageData` readback
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let options = js_sys::Object::new();
        js_sys::Reflect::set(
            &options,
            &JsValue::from_str("willReadFrequently"),
            &JsValue::TRUE,
        )?;
        let ctx = canvas
            .get_context_with_context_options("2d", &options)?
            .ok_or(Error::ContextUnavailable)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| Error::ContextUnavailable)?;
        Ok(Self { canvas, ctx })
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn clear(&mut self) {
        let (w, h) = self.size();
        self.ctx.clear_rect(0.0, 0.0, w as f64, h as f64);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(x, y, w, h);
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Color) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.begin_path();
        // arc() only throws for a negative radius
        if self
            .ctx
            .arc(center.x, center.y, radius, 0.0, std::f64::consts::TAU)
            .is_ok()
        {
            self.ctx.fill();
        }
    }

    fn fill_text(&mut self, text: &str, font: &FontSpec, center: DVec2, color: Color) {
        self.ctx.set_font(&font.css());
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        self.ctx.set_fill_style_str(&color.to_css());
        if let Err(e) = self.ctx.fill_text(text, center.x, center.y) {
            log::warn!("fillText failed: {:?}", e);
        }
    }

    fn read_alpha(&self) -> Result<Vec<u8>> {
        let (w, h) = self.size();
        if w == 0 || h == 0 {
            return Ok(Vec::new());
        }
        let image = self.ctx.get_image_data(0.0, 0.0, w as f64, h as f64)?;
        Ok(image.data().0.iter().skip(3).step_by(4).copied().collect())
    }
}
