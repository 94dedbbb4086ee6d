//! Particle field configuration
//!
//! One component covers both looks of the effect: the simple variant (hard
//! clear, fixed repulsion) and the enhanced variant (density-weighted
//! repulsion amplified while pressed, trail fade, fly-in from a random
//! scatter). Presets fill in every knob; JSON overrides individual ones.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};
use crate::renderer::{Color, FontSpec};

/// Named presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Simple,
    Enhanced,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Simple => "Simple",
            Variant::Enhanced => "Enhanced",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "simple" | "basic" => Some(Variant::Simple),
            "enhanced" | "interactive" => Some(Variant::Enhanced),
            _ => None,
        }
    }
}

/// How the canvas is prepared before each frame's particles are drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "mode")]
pub enum ClearMode {
    /// Wipe to transparent
    HardClear,
    /// Paint a translucent overlay so previous frames linger as trails
    TrailFade { color: Color },
}

/// Where particles start when the field is rebuilt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InitialPlacement {
    AtHome,
    /// Uniformly random inside the canvas; particles fly in on the first frames
    RandomScatter,
}

/// Mask sampling stride, optionally denser on narrow viewports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StridePolicy {
    pub stride: u32,
    /// `(breakpoint_px, stride)`: used when the canvas is narrower than the breakpoint
    #[serde(default)]
    pub narrow: Option<(u32, u32)>,
}

impl StridePolicy {
    pub const fn fixed(stride: u32) -> Self {
        Self {
            stride,
            narrow: None,
        }
    }

    /// Stride for a canvas `width` pixels wide
    pub fn for_width(&self, width: u32) -> u32 {
        match self.narrow {
            Some((breakpoint, narrow)) if width < breakpoint => narrow,
            _ => self.stride,
        }
    }
}

impl Default for StridePolicy {
    fn default() -> Self {
        Self::fixed(SAMPLE_STRIDE)
    }
}

/// Every tuning parameter of the particle field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldConfig {
    // === Mask ===
    /// Text the particles spell out
    pub text: String,
    pub font_family: String,
    pub font_weight: u16,
    /// Font size as a fraction of canvas width
    pub font_scale: f64,
    /// Font size cap (px)
    pub font_cap_px: f64,
    pub sampling: StridePolicy,

    // === Pointer ===
    pub pointer_radius: f64,
    /// Base repulsion impulse
    pub repel_gain: f64,
    /// Multiplier while the pointer is up
    pub weak_mult: f64,
    /// Multiplier while the pointer is pressed
    pub strong_mult: f64,

    // === Particles ===
    /// Per-particle density factor is drawn from `[min, max)`; equal bounds pin it
    pub density_range: (f64, f64),
    /// Spring coefficient toward home, in (0, 1)
    pub ease: f64,
    /// Velocity retained per step, in (0, 1)
    pub friction: f64,
    pub particle_size: f64,
    pub particle_color: Color,

    // === Frame ===
    pub clear_mode: ClearMode,
    pub initial_placement: InitialPlacement,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self::from_preset(Variant::Simple)
    }
}

impl FieldConfig {
    /// Build a config from a preset
    pub fn from_preset(variant: Variant) -> Self {
        let simple = Self {
            text: "Portfolio".to_string(),
            font_family: "-apple-system, \"SF Pro Display\", Arial, sans-serif".to_string(),
            font_weight: 600,
            font_scale: FONT_SCALE,
            font_cap_px: FONT_CAP_PX,
            sampling: StridePolicy::fixed(SAMPLE_STRIDE),

            pointer_radius: POINTER_RADIUS,
            repel_gain: REPEL_GAIN,
            weak_mult: 1.0,
            strong_mult: 1.0,

            density_range: (1.0, 1.0),
            ease: EASE,
            friction: FRICTION,
            particle_size: PARTICLE_SIZE,
            particle_color: Color::rgb(0x1d, 0x1d, 0x1f),

            clear_mode: ClearMode::HardClear,
            initial_placement: InitialPlacement::AtHome,
        };

        match variant {
            Variant::Simple => simple,
            Variant::Enhanced => Self {
                sampling: StridePolicy {
                    stride: SAMPLE_STRIDE,
                    narrow: Some((768, 4)),
                },
                pointer_radius: 150.0,
                repel_gain: 1.0,
                weak_mult: WEAK_MULT,
                strong_mult: STRONG_MULT,
                density_range: (DENSITY_MIN, DENSITY_MAX),
                clear_mode: ClearMode::TrailFade {
                    color: Color::WHITE.with_opacity(0.25),
                },
                initial_placement: InitialPlacement::RandomScatter,
                ..simple
            },
        }
    }

    /// Parse a JSON override document and validate it
    ///
    /// Missing keys keep their Simple-preset values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply JSON overrides on top of `self`
    pub fn merged_with_json(&self, json: &str) -> Result<Self> {
        let mut base = serde_json::to_value(self)?;
        let overrides: serde_json::Value = serde_json::from_str(json)?;
        if let (Some(base), Some(overrides)) = (base.as_object_mut(), overrides.as_object()) {
            for (key, value) in overrides {
                base.insert(key.clone(), value.clone());
            }
        } else {
            return Err(Error::InvalidConfig("config must be a JSON object".into()));
        }
        let config: Self = serde_json::from_value(base)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every invariant the simulation relies on
    pub fn validate(&self) -> Result<()> {
        let open_unit = |name: &str, v: f64| {
            if v > 0.0 && v < 1.0 {
                Ok(())
            } else {
                Err(Error::InvalidConfig(format!("{name} must be in (0, 1), got {v}")))
            }
        };
        open_unit("ease", self.ease)?;
        open_unit("friction", self.friction)?;

        if self.sampling.stride == 0 || matches!(self.sampling.narrow, Some((_, 0))) {
            return Err(Error::InvalidConfig("sampling stride must be at least 1".into()));
        }
        if !(self.pointer_radius > 0.0 && self.pointer_radius.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "pointer radius must be positive, got {}",
                self.pointer_radius
            )));
        }
        let positive = |name: &str, v: f64| {
            if v > 0.0 && v.is_finite() {
                Ok(())
            } else {
                Err(Error::InvalidConfig(format!("{name} must be positive, got {v}")))
            }
        };
        // a non-positive gain turns repulsion into attraction
        positive("repel gain", self.repel_gain)?;
        positive("weak multiplier", self.weak_mult)?;
        positive("strong multiplier", self.strong_mult)?;
        positive("particle size", self.particle_size)?;

        let (lo, hi) = self.density_range;
        if !(lo.is_finite() && hi.is_finite() && lo <= hi) {
            return Err(Error::InvalidConfig(format!(
                "density range [{lo}, {hi}) is inverted or non-finite"
            )));
        }
        if lo <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "density range must start above zero, got {lo}"
            )));
        }
        if !(self.font_scale > 0.0 && self.font_cap_px > 0.0) {
            return Err(Error::InvalidConfig("font scale and cap must be positive".into()));
        }
        Ok(())
    }

    /// Font used for the mask on a canvas `width` pixels wide
    pub fn font_for_width(&self, width: u32) -> FontSpec {
        let size = (width as f64 * self.font_scale).min(self.font_cap_px);
        FontSpec::new(self.font_family.clone(), self.font_weight, size)
    }

    /// Repulsion multiplier for the current press state
    pub fn press_multiplier(&self, pressed: bool) -> f64 {
        if pressed { self.strong_mult } else { self.weak_mult }
    }

    /// Attribute holding JSON overrides on the canvas element
    pub const CONFIG_ATTRIBUTE: &'static str = "data-particle-config";
    /// Attribute naming the preset on the canvas element
    pub const VARIANT_ATTRIBUTE: &'static str = "data-variant";

    /// Load config from the canvas element's data attributes (WASM only)
    ///
    /// Malformed overrides are logged and ignored.
    #[cfg(target_arch = "wasm32")]
    pub fn load(element: &web_sys::Element) -> Self {
        let variant = element
            .get_attribute(Self::VARIANT_ATTRIBUTE)
            .and_then(|name| {
                let parsed = Variant::from_str(&name);
                if parsed.is_none() {
                    log::warn!("Unknown variant {:?}, using Simple", name);
                }
                parsed
            })
            .unwrap_or_default();
        let base = Self::from_preset(variant);

        match element.get_attribute(Self::CONFIG_ATTRIBUTE) {
            Some(json) => match base.merged_with_json(&json) {
                Ok(config) => {
                    log::info!("Loaded {} config with overrides", variant.as_str());
                    config
                }
                Err(e) => {
                    log::warn!("Ignoring {}: {}", Self::CONFIG_ATTRIBUTE, e);
                    base
                }
            },
            None => {
                log::info!("Using {} preset", variant.as_str());
                base
            }
        }
    }
}
