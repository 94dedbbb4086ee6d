//! Particle Text - an interactive text-shaped particle field
//!
//! Core modules:
//! - `sim`: Particle physics, text mask sampling, and the frame driver
//! - `renderer`: Drawing surface abstraction (2D canvas + software raster)
//! - `platform`: Browser glue (animation loop, input listeners, scroll reveal)
//! - `config`: Variant presets and tuning parameters

pub mod config;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod sim;

pub use config::{ClearMode, FieldConfig, InitialPlacement, StridePolicy, Variant};
pub use error::{Error, Result};

use glam::DVec2;

/// Tuning constants
pub mod consts {
    /// Alpha a mask pixel must exceed to seed a particle
    pub const MASK_ALPHA_THRESHOLD: u8 = 128;
    /// Font size as a fraction of canvas width
    pub const FONT_SCALE: f64 = 0.1;
    /// Upper bound on the mask font size (px)
    pub const FONT_CAP_PX: f64 = 100.0;
    /// Default grid stride when sampling the mask
    pub const SAMPLE_STRIDE: u32 = 6;

    /// Pointer coordinate meaning "no interaction"
    pub const POINTER_SENTINEL: f64 = -1000.0;
    /// Default repulsion radius (px)
    pub const POINTER_RADIUS: f64 = 100.0;
    /// Distances below this are treated as coincident (no direction)
    pub const MIN_DISTANCE: f64 = 1e-6;

    /// Particle defaults
    pub const PARTICLE_SIZE: f64 = 1.5;
    pub const EASE: f64 = 0.08;
    pub const FRICTION: f64 = 0.9;
    /// Repulsion impulse for the simple variant
    pub const REPEL_GAIN: f64 = 5.0;
    /// Press multipliers for the enhanced variant
    pub const WEAK_MULT: f64 = 2.0;
    pub const STRONG_MULT: f64 = 15.0;
    /// Enhanced variant density factor range
    pub const DENSITY_MIN: f64 = 1.0;
    pub const DENSITY_MAX: f64 = 21.0;
}

/// Unit vector from `from` toward `to`, or `None` when the points coincide
#[inline]
pub fn direction_between(from: DVec2, to: DVec2) -> Option<(DVec2, f64)> {
    let delta = to - from;
    let distance = delta.length();
    if distance < consts::MIN_DISTANCE || !distance.is_finite() {
        return None;
    }
    Some((delta / distance, distance))
}

/// Number of grid cells visited when sampling `len` pixels every `stride`
#[inline]
pub fn grid_cells(len: u32, stride: u32) -> u32 {
    if stride == 0 {
        return 0;
    }
    len.div_ceil(stride)
}
