//! Pointer record shared between input handlers and the frame tick

use glam::DVec2;

use crate::consts::{POINTER_RADIUS, POINTER_SENTINEL};

/// Last known pointer position, interaction radius and press state
///
/// Input handlers write it, the simulation only reads it. A position at the
/// sentinel means the pointer is not over the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub pressed: bool,
}

impl Default for PointerState {
    fn default() -> Self {
        Self::new(POINTER_RADIUS)
    }
}

impl PointerState {
    pub fn new(radius: f64) -> Self {
        Self {
            x: POINTER_SENTINEL,
            y: POINTER_SENTINEL,
            radius,
            pressed: false,
        }
    }

    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Whether the pointer is over the page and able to repel particles
    pub fn is_active(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && !(self.x == POINTER_SENTINEL && self.y == POINTER_SENTINEL)
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    pub fn press(&mut self) {
        self.pressed = true;
    }

    pub fn release(&mut self) {
        self.pressed = false;
    }

    /// Pointer left the document: park it at the sentinel and drop any press
    pub fn leave(&mut self) {
        self.x = POINTER_SENTINEL;
        self.y = POINTER_SENTINEL;
        self.pressed = false;
    }
}
