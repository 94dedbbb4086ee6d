//! Platform layer
//!
//! Handles browser-only concerns:
//! - Display-synchronized frame loop and its cancellation
//! - Input listeners (resize, pointer move/press/leave)
//! - Scroll reveal via the page's GSAP ScrollTrigger

pub mod reveal;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use reveal::RevealOptions;
