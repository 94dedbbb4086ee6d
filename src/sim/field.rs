//! The live particle collection

use glam::{DVec2, UVec2};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::particle::Particle;
use super::pointer::PointerState;
use crate::config::{FieldConfig, InitialPlacement};
use crate::renderer::Surface;

/// All particles for one canvas
///
/// Rebuilds replace the whole collection; particles are never added or
/// removed individually.
#[derive(Debug, Clone)]
pub struct ParticleField {
    config: FieldConfig,
    particles: Vec<Particle>,
    rng: Pcg32,
}

impl ParticleField {
    pub fn new(config: FieldConfig, seed: u64) -> Self {
        Self {
            config,
            particles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Home positions in collection order
    pub fn homes(&self) -> Vec<DVec2> {
        self.particles.iter().map(Particle::home).collect()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Replace every particle with one per mask coordinate
    ///
    /// `bounds` is the canvas size, used for random scatter placement.
    pub fn rebuild(&mut self, coords: &[UVec2], bounds: (u32, u32)) {
        let (lo, hi) = self.config.density_range;
        let placement = self.config.initial_placement;

        let mut particles = Vec::with_capacity(coords.len());
        for coord in coords {
            let home = coord.as_dvec2();
            let pos = match placement {
                InitialPlacement::AtHome => home,
                InitialPlacement::RandomScatter => self.scatter_point(bounds).unwrap_or(home),
            };
            let density = if hi > lo {
                self.rng.random_range(lo..hi)
            } else {
                lo
            };
            particles.push(Particle::new(home, pos, density, &self.config));
        }
        self.particles = particles;
    }

    fn scatter_point(&mut self, (width, height): (u32, u32)) -> Option<DVec2> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(DVec2::new(
            self.rng.random_range(0.0..width as f64),
            self.rng.random_range(0.0..height as f64),
        ))
    }

    /// Repulsion impulse for the pointer's press state, before density
    pub fn press_gain(&self, pointer: &PointerState) -> f64 {
        self.config.repel_gain * self.config.press_multiplier(pointer.pressed)
    }

    /// Physics for every particle
    pub fn update_all(&mut self, pointer: &PointerState) {
        let gain = self.press_gain(pointer);
        for particle in &mut self.particles {
            particle.update(pointer, gain);
        }
    }

    /// Paint every particle
    pub fn draw_all<S: Surface + ?Sized>(&self, surface: &mut S) {
        for particle in &self.particles {
            particle.draw(surface);
        }
    }

    /// One frame: update then draw each particle in a single pass
    pub fn step<S: Surface + ?Sized>(&mut self, pointer: &PointerState, surface: &mut S) {
        let gain = self.press_gain(pointer);
        for particle in &mut self.particles {
            particle.update(pointer, gain);
            particle.draw(surface);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Variant;
    use crate::renderer::RasterSurface;

    fn coords() -> Vec<UVec2> {
        vec![UVec2::new(10, 10), UVec2::new(16, 10), UVec2::new(22, 16)]
    }

    #[test]
    fn test_rebuild_places_particles_at_home() {
        let mut field = ParticleField::new(FieldConfig::default(), 1);
        field.rebuild(&coords(), (100, 100));
        assert_eq!(field.len(), 3);
        for p in field.particles() {
            assert_eq!(p.pos(), p.home());
            assert_eq!(p.density_factor, 1.0);
        }
    }

    #[test]
    fn test_rebuild_is_idempotent_on_homes() {
        let mut a = ParticleField::new(FieldConfig::default(), 1);
        let mut b = ParticleField::new(FieldConfig::default(), 2);
        a.rebuild(&coords(), (100, 100));
        b.rebuild(&coords(), (100, 100));
        b.rebuild(&coords(), (100, 100));
        assert_eq!(a.len(), b.len());
        assert_eq!(a.homes(), b.homes());
    }

    #[test]
    fn test_rebuild_replaces_collection() {
        let mut field = ParticleField::new(FieldConfig::default(), 1);
        field.rebuild(&coords(), (100, 100));
        field.rebuild(&[UVec2::new(1, 1)], (100, 100));
        assert_eq!(field.homes(), vec![DVec2::new(1.0, 1.0)]);
    }

    #[test]
    fn test_scatter_starts_inside_canvas_and_flies_home() {
        let config = FieldConfig::from_preset(Variant::Enhanced);
        let mut field = ParticleField::new(config, 7);
        let homes: Vec<UVec2> = (0..50).map(|i| UVec2::new(i * 2, 40)).collect();
        field.rebuild(&homes, (120, 80));

        assert!(field.particles().iter().any(|p| p.pos() != p.home()));
        for p in field.particles() {
            assert!(p.pos().x >= 0.0 && p.pos().x < 120.0);
            assert!(p.pos().y >= 0.0 && p.pos().y < 80.0);
            assert!(p.density_factor >= 1.0 && p.density_factor < 21.0);
        }

        let pointer = PointerState::default();
        for _ in 0..400 {
            field.update_all(&pointer);
        }
        assert!(field.particles().iter().all(|p| p.displacement() < 1e-3));
    }

    #[test]
    fn test_scatter_on_empty_bounds_falls_back_to_home() {
        let config = FieldConfig::from_preset(Variant::Enhanced);
        let mut field = ParticleField::new(config, 7);
        field.rebuild(&coords(), (0, 0));
        assert!(field.particles().iter().all(|p| p.pos() == p.home()));
    }

    #[test]
    fn test_press_gain_per_variant() {
        let mut pointer = PointerState::default();
        let simple = ParticleField::new(FieldConfig::default(), 0);
        let enhanced = ParticleField::new(FieldConfig::from_preset(Variant::Enhanced), 0);
        assert_eq!(simple.press_gain(&pointer), 5.0);
        assert_eq!(enhanced.press_gain(&pointer), 2.0);
        pointer.press();
        assert_eq!(simple.press_gain(&pointer), 5.0);
        assert_eq!(enhanced.press_gain(&pointer), 15.0);
    }

    #[test]
    fn test_step_draws_every_particle() {
        let mut field = ParticleField::new(FieldConfig::default(), 1);
        field.rebuild(&coords(), (40, 40));
        let mut surface = RasterSurface::new(40, 40);
        field.step(&PointerState::default(), &mut surface);
        for c in coords() {
            assert_eq!(surface.pixel(c.x, c.y).unwrap()[3], 255);
        }
    }

    #[test]
    fn test_draw_all_paints_without_moving() {
        let mut field = ParticleField::new(FieldConfig::default(), 1);
        field.rebuild(&coords(), (40, 40));
        let before = field.particles().to_vec();
        let mut surface = RasterSurface::new(40, 40);
        field.draw_all(&mut surface);
        assert_eq!(field.particles(), before.as_slice());
        for c in coords() {
            assert_eq!(surface.pixel(c.x, c.y).unwrap()[3], 255);
        }
    }

    #[test]
    fn test_clear_empties_field() {
        let mut field = ParticleField::new(FieldConfig::default(), 1);
        field.rebuild(&coords(), (40, 40));
        field.clear();
        assert!(field.is_empty());
        assert!(field.homes().is_empty());

        let mut surface = RasterSurface::new(40, 40);
        field.draw_all(&mut surface);
        assert_eq!(surface.coverage(), 0);
    }

    #[test]
    fn test_step_on_empty_field_is_noop() {
        let mut field = ParticleField::new(FieldConfig::default(), 1);
        let mut surface = RasterSurface::new(10, 10);
        field.step(&PointerState::default(), &mut surface);
        assert!(field.is_empty());
        assert_eq!(surface.coverage(), 0);
    }

    #[test]
    fn test_pointer_pushes_nearby_particles_only() {
        let mut field = ParticleField::new(FieldConfig::default(), 1);
        field.rebuild(&[UVec2::new(100, 100), UVec2::new(400, 400)], (500, 500));
        let mut pointer = PointerState::new(100.0);
        pointer.move_to(90.0, 100.0);
        field.update_all(&pointer);
        let near = &field.particles()[0];
        let far = &field.particles()[1];
        assert!(near.pos().x > 100.0);
        assert_eq!(far.pos(), far.home());
    }
}
