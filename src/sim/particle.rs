//! A single point of the text field

use glam::DVec2;

use super::pointer::PointerState;
use crate::config::FieldConfig;
use crate::direction_between;
use crate::renderer::{Color, Surface};

/// One particle: a fixed home on the text mask plus damped spring dynamics
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    home: DVec2,
    pos: DVec2,
    velocity: DVec2,
    pub size: f64,
    pub color: Color,
    /// Per-particle repulsion multiplier (1 unless the config asks for a range)
    pub density_factor: f64,
    /// Spring coefficient toward home, in (0, 1)
    pub ease: f64,
    /// Velocity retained per step, in (0, 1)
    pub friction: f64,
}

impl Particle {
    /// New particle resting at `pos` with zero velocity
    pub fn new(home: DVec2, pos: DVec2, density_factor: f64, config: &FieldConfig) -> Self {
        Self {
            home,
            pos,
            velocity: DVec2::ZERO,
            size: config.particle_size,
            color: config.particle_color,
            density_factor,
            ease: config.ease,
            friction: config.friction,
        }
    }

    /// Resting position on the mask
    pub fn home(&self) -> DVec2 {
        self.home
    }

    /// Current position; only `update` moves it
    pub fn pos(&self) -> DVec2 {
        self.pos
    }

    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    /// Distance from home
    pub fn displacement(&self) -> f64 {
        self.pos.distance(self.home)
    }

    /// Advance one frame
    ///
    /// `press_gain` is the repulsion impulse for the current press state
    /// before the per-particle density factor is applied.
    pub fn update(&mut self, pointer: &PointerState, press_gain: f64) {
        let inside = if pointer.is_active() {
            let offset = pointer.position() - self.pos;
            offset.length() < pointer.radius
        } else {
            false
        };

        if inside {
            // Coincident pointer has no direction: no impulse this tick
            if let Some((direction, distance)) = direction_between(self.pos, pointer.position()) {
                let force = (pointer.radius - distance) / pointer.radius;
                self.velocity -= direction * force * press_gain * self.density_factor;
            }
        } else {
            self.velocity += (self.home - self.pos) * self.ease;
        }

        self.pos += self.velocity;
        self.velocity *= self.friction;
    }

    /// Paint a filled disc at the current position
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.fill_circle(self.pos, self.size, self.color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RasterSurface;
    use proptest::prelude::*;

    fn particle_at(home: DVec2, pos: DVec2) -> Particle {
        Particle::new(home, pos, 1.0, &FieldConfig::default())
    }

    #[test]
    fn test_rests_at_home_without_pointer() {
        let home = DVec2::new(40.0, 30.0);
        let mut p = particle_at(home, home);
        for _ in 0..10 {
            p.update(&PointerState::default(), 5.0);
        }
        assert_eq!(p.pos, home);
        assert_eq!(p.velocity, DVec2::ZERO);
    }

    #[test]
    fn test_spring_converges_home() {
        let home = DVec2::new(100.0, 100.0);
        let mut p = particle_at(home, DVec2::new(160.0, 20.0));
        let pointer = PointerState::default();
        let initial = p.displacement();

        // Underdamped: check the per-window peak shrinks rather than every step
        let mut last_peak = f64::INFINITY;
        for _ in 0..16 {
            let mut peak: f64 = 0.0;
            for _ in 0..25 {
                p.update(&pointer, 5.0);
                peak = peak.max(p.displacement());
            }
            assert!(peak <= last_peak, "peak grew: {peak} > {last_peak}");
            last_peak = peak;
        }
        assert!(p.displacement() < initial * 1e-6);
        assert!(p.velocity.length() < 1e-4);
    }

    #[test]
    fn test_repulsion_points_away_from_pointer() {
        let home = DVec2::new(200.0, 200.0);
        let mut p = particle_at(home, home);
        let mut pointer = PointerState::new(100.0);
        // pointer just left of the particle
        pointer.move_to(home.x - 0.5, home.y);
        p.update(&pointer, 5.0);
        assert!(p.velocity.x > 0.0, "velocity {:?}", p.velocity);
        assert!(p.velocity.y.abs() < 1e-12);
        assert!(p.pos.x > home.x);
    }

    #[test]
    fn test_repulsion_scales_with_density_and_press() {
        let home = DVec2::new(50.0, 50.0);
        let mut pointer = PointerState::new(100.0);
        pointer.move_to(home.x, home.y - 10.0);

        let mut light = Particle::new(home, home, 1.0, &FieldConfig::default());
        let mut dense = Particle::new(home, home, 4.0, &FieldConfig::default());
        light.update(&pointer, 2.0);
        dense.update(&pointer, 2.0);
        assert!(dense.pos.y > light.pos.y);
        assert!((dense.velocity.y / light.velocity.y - 4.0).abs() < 1e-9);

        let mut pressed = Particle::new(home, home, 1.0, &FieldConfig::default());
        pressed.update(&pointer, 15.0);
        assert!((pressed.velocity.y / light.velocity.y - 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_pointer_exactly_on_particle_is_safe() {
        let home = DVec2::new(10.0, 10.0);
        let mut p = particle_at(home, home);
        let mut pointer = PointerState::new(100.0);
        pointer.move_to(10.0, 10.0);
        p.update(&pointer, 5.0);
        assert!(p.pos.is_finite());
        assert!(p.velocity.is_finite());
        assert_eq!(p.pos, home);
    }

    #[test]
    fn test_left_pointer_means_home_return_only() {
        let home = DVec2::new(300.0, 300.0);
        let mut p = particle_at(home, DVec2::new(310.0, 300.0));
        let mut pointer = PointerState::new(150.0);
        pointer.move_to(305.0, 300.0);
        pointer.leave();

        let mut reference = p.clone();
        let far = PointerState::new(150.0);
        for _ in 0..50 {
            p.update(&pointer, 30.0);
            reference.update(&far, 30.0);
        }
        assert_eq!(p, reference);
    }

    #[test]
    fn test_draw_does_not_touch_kinematics() {
        let mut surface = RasterSurface::new(20, 20);
        let p = particle_at(DVec2::new(5.0, 5.0), DVec2::new(10.0, 10.0));
        let before = p.clone();
        p.draw(&mut surface);
        assert_eq!(p, before);
        assert_eq!(surface.pixel(10, 10).unwrap()[3], 255);
    }

    proptest! {
        #[test]
        fn prop_update_stays_finite(
            px in -50.0f64..50.0,
            py in -50.0f64..50.0,
            dx in -2.0f64..2.0,
            dy in -2.0f64..2.0,
            pressed in any::<bool>(),
        ) {
            let home = DVec2::new(px, py);
            let mut p = particle_at(home, home);
            let mut pointer = PointerState::new(100.0);
            pointer.pressed = pressed;
            for _ in 0..20 {
                pointer.move_to(p.pos.x + dx, p.pos.y + dy);
                p.update(&pointer, if pressed { 15.0 } else { 2.0 });
                prop_assert!(p.pos.is_finite());
                prop_assert!(p.velocity.is_finite());
            }
            prop_assert_eq!(p.home(), home);
        }
    }
}
