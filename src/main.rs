//! Particle Text entry point
//!
//! In the browser: mounts the field on `#particle-canvas` and arms the scroll
//! reveal. Natively: runs a short headless simulation on a software surface.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;

    use particle_text::FieldConfig;
    use particle_text::platform::reveal::{self, RevealHandle, RevealOptions};
    use particle_text::platform::web::{self, Handle};

    /// Canvas the page reserves for the hero effect
    const CANVAS_ID: &str = "particle-canvas";

    thread_local! {
        static PAGE: RefCell<Option<(Option<Handle>, RevealHandle)>> = const { RefCell::new(None) };
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Particle Text starting...");

        // A missing canvas only disables the hero effect
        let field = match web::find_canvas(CANVAS_ID) {
            Ok(canvas) => {
                let config = FieldConfig::load(&canvas);
                match web::start(canvas, config) {
                    Ok(handle) => Some(handle),
                    Err(e) => {
                        log::error!("Particle field failed to start: {}", e);
                        None
                    }
                }
            }
            Err(e) => {
                log::error!("Particle field disabled: {}", e);
                None
            }
        };

        let reveal = reveal::install(&RevealOptions::default());
        PAGE.with(|page| *page.borrow_mut() = Some((field, reveal)));
    }

    /// Drop everything `run` mounted
    pub fn teardown() {
        PAGE.with(|page| {
            if let Some((_field, reveal)) = page.borrow_mut().take() {
                if reveal.is_empty() {
                    log::info!("Page effects torn down");
                } else {
                    log::info!("Page effects torn down, {} reveal triggers killed", reveal.len());
                }
            }
        });
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

/// Stop the page-level effects started by `wasm_main`
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn teardown() {
    wasm_app::teardown();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Particle Text (native) starting...");
    log::info!("The interactive version runs in the browser - build with `trunk serve`");

    if let Err(e) = headless::run() {
        log::error!("Headless run failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use particle_text::renderer::{RasterSurface, Surface};
    use particle_text::sim::Driver;
    use particle_text::{FieldConfig, Result, Variant};

    const WIDTH: u32 = 800;
    const HEIGHT: u32 = 600;
    const FRAMES: u32 = 240;

    /// Sweep a pointer across the text, release it, and report how the field settles
    pub fn run() -> Result<()> {
        for variant in [Variant::Simple, Variant::Enhanced] {
            let config = FieldConfig::from_preset(variant);
            let mut driver = Driver::new(RasterSurface::new(WIDTH, HEIGHT), config, 7)?;
            driver.start();
            log::info!(
                "{}: {} particles on {}x{}",
                variant.as_str(),
                driver.field().len(),
                WIDTH,
                HEIGHT
            );

            for frame in 0..FRAMES {
                let t = frame as f64 / FRAMES as f64;
                let pointer = driver.pointer_mut();
                if frame < FRAMES / 2 {
                    pointer.move_to(WIDTH as f64 * t * 2.0, HEIGHT as f64 / 2.0);
                    if variant == Variant::Enhanced && frame % 40 < 10 {
                        pointer.press();
                    } else {
                        pointer.release();
                    }
                } else {
                    pointer.leave();
                }
                driver.tick();

                if frame % 60 == 59 {
                    log::info!(
                        "  frame {:3}: max displacement {:8.3}px, coverage {}",
                        frame + 1,
                        max_displacement(&driver),
                        driver.surface().coverage()
                    );
                }
            }

            driver.resize(WIDTH / 2, HEIGHT / 2)?;
            log::info!(
                "  resized to {:?}: {} particles",
                driver.surface().size(),
                driver.field().len()
            );
            driver.stop();
        }
        Ok(())
    }

    fn max_displacement(driver: &Driver<RasterSurface>) -> f64 {
        driver
            .field()
            .particles()
            .iter()
            .map(|p| p.displacement())
            .fold(0.0, f64::max)
    }
}
