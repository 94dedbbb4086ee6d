//! Particle simulation
//!
//! Platform-independent: everything here runs natively and in the browser.
//! - Particles read only the shared pointer record and their own fields
//! - Rebuilds replace the whole collection
//! - Degenerate input (empty canvas, coincident pointer) is a no-op, never an error

pub mod driver;
pub mod field;
pub mod mask;
pub mod particle;
pub mod pointer;

pub use driver::{Driver, DriverState};
pub use field::ParticleField;
pub use mask::{TextMask, sample_alpha};
pub use particle::Particle;
pub use pointer::PointerState;
