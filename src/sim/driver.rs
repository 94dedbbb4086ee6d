//! Frame driver
//!
//! Owns the surface, the field and the pointer record. The host calls
//! [`Driver::tick`] once per display refresh; scheduling itself lives in the
//! platform layer so this stays testable without a browser.

use super::field::ParticleField;
use super::mask::TextMask;
use super::pointer::PointerState;
use crate::config::{ClearMode, FieldConfig};
use crate::error::Result;
use crate::renderer::Surface;

/// Whether frames are being produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Stopped,
    Running,
}

pub struct Driver<S: Surface> {
    surface: S,
    field: ParticleField,
    pointer: PointerState,
    state: DriverState,
    frames: u64,
}

impl<S: Surface> Driver<S> {
    /// Build a driver and seed the field from the surface's current size
    pub fn new(surface: S, config: FieldConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let pointer = PointerState::new(config.pointer_radius);
        let mut driver = Self {
            surface,
            field: ParticleField::new(config, seed),
            pointer,
            state: DriverState::Stopped,
            frames: 0,
        };
        driver.rebuild()?;
        Ok(driver)
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    /// Input handlers write through this
    pub fn pointer_mut(&mut self) -> &mut PointerState {
        &mut self.pointer
    }

    /// Frames rendered since construction
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn start(&mut self) {
        if self.state == DriverState::Stopped {
            log::debug!("Driver started with {} particles", self.field.len());
        }
        self.state = DriverState::Running;
    }

    pub fn stop(&mut self) {
        if self.state == DriverState::Running {
            log::debug!("Driver stopped after {} frames", self.frames);
        }
        self.state = DriverState::Stopped;
    }

    /// Render one frame; returns whether the host should schedule another
    pub fn tick(&mut self) -> bool {
        if self.state != DriverState::Running {
            return false;
        }
        match self.field.config().clear_mode {
            ClearMode::HardClear => self.surface.clear(),
            ClearMode::TrailFade { color } => self.surface.fill_all(color),
        }
        self.field.step(&self.pointer, &mut self.surface);
        self.frames += 1;
        true
    }

    /// Resize the surface and reseed the field from a fresh mask
    ///
    /// Old particle positions are discarded. A running driver keeps running.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.surface.resize(width, height);
        self.rebuild()
    }

    /// Re-rasterize the text at the current size and replace every particle
    pub fn rebuild(&mut self) -> Result<()> {
        let coords = TextMask::new(self.field.config()).rasterize(&mut self.surface)?;
        let bounds = self.surface.size();
        self.field.rebuild(&coords, bounds);
        log::debug!(
            "Rebuilt field: {} particles on {}x{}",
            self.field.len(),
            bounds.0,
            bounds.1
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Variant;
    use crate::renderer::RasterSurface;

    fn driver(width: u32, height: u32, variant: Variant) -> Driver<RasterSurface> {
        Driver::new(
            RasterSurface::new(width, height),
            FieldConfig::from_preset(variant),
            42,
        )
        .unwrap()
    }

    #[test]
    fn test_state_machine() {
        let mut d = driver(400, 300, Variant::Simple);
        assert_eq!(d.state(), DriverState::Stopped);
        assert!(!d.tick());
        assert_eq!(d.frames(), 0);

        d.start();
        assert!(d.tick());
        assert!(d.tick());
        assert_eq!(d.frames(), 2);

        d.stop();
        assert!(!d.tick());
        assert_eq!(d.frames(), 2);
    }

    #[test]
    fn test_release_without_move_drops_strong_gain() {
        let mut d = driver(400, 300, Variant::Enhanced);
        d.pointer_mut().move_to(200.0, 150.0);
        d.pointer_mut().press();
        assert_eq!(d.field().press_gain(d.pointer()), 15.0);

        // cancelled gesture: release arrives with no further move
        d.pointer_mut().release();
        assert!(d.pointer().is_active());
        assert_eq!(d.field().press_gain(d.pointer()), 2.0);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = FieldConfig::default();
        config.friction = 1.0;
        assert!(Driver::new(RasterSurface::new(10, 10), config, 0).is_err());
    }

    #[test]
    fn test_hard_clear_draws_only_particles() {
        let mut d = driver(400, 300, Variant::Simple);
        d.start();
        d.tick();
        d.tick();
        let covered = d.surface().coverage();
        assert!(covered > 0);
        // every particle is a small disc, so coverage stays well below full
        assert!(covered < 400 * 300 / 4);
    }

    #[test]
    fn test_trail_fade_paints_overlay() {
        let mut d = driver(400, 300, Variant::Enhanced);
        d.start();
        d.tick();
        // the overlay touches every pixel
        assert_eq!(d.surface().coverage(), 400 * 300);
    }

    #[test]
    fn test_resize_rebuilds_within_new_bounds() {
        let mut d = driver(800, 600, Variant::Simple);
        d.start();
        let before = d.field().len();
        assert!(before > 0);

        d.resize(400, 300).unwrap();
        assert!(d.is_running());
        assert_eq!(d.surface().size(), (400, 300));
        assert!(d.field().len() > 0);
        assert!(d.field().len() < before);
        assert!(
            d.field()
                .homes()
                .iter()
                .all(|h| h.x < 400.0 && h.y < 300.0)
        );
    }

    #[test]
    fn test_zero_size_degrades_to_noop() {
        let mut d = driver(0, 0, Variant::Simple);
        d.start();
        assert!(d.field().is_empty());
        assert!(d.tick());

        d.resize(320, 200).unwrap();
        assert!(!d.field().is_empty());
    }

    #[test]
    fn test_pointer_leave_returns_field_home() {
        let mut d = driver(400, 300, Variant::Simple);
        d.start();
        d.pointer_mut().move_to(200.0, 150.0);
        for _ in 0..10 {
            d.tick();
        }
        assert!(d.field().particles().iter().any(|p| p.displacement() > 1.0));

        d.pointer_mut().leave();
        for _ in 0..400 {
            d.tick();
        }
        assert!(
            d.field()
                .particles()
                .iter()
                .all(|p| p.displacement() < 1e-3)
        );
    }

    #[test]
    fn test_pointer_radius_comes_from_config() {
        let d = driver(100, 100, Variant::Enhanced);
        assert_eq!(d.pointer().radius, 150.0);
        assert!(!d.pointer().is_active());
    }
}
