//! Scroll-triggered entrance transitions
//!
//! The transitions themselves are played by GSAP's ScrollTrigger, which the
//! page loads separately. When it is missing the reveal step is skipped and
//! the rest of the page renders normally.

use serde::{Deserialize, Serialize};
use serde_json::json;

/// One reversible from-tween per matched element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RevealOptions {
    /// CSS selector for the elements to reveal
    pub selector: String,
    /// ScrollTrigger start, e.g. element top at 90% of the viewport
    pub start: String,
    /// Play on enter, reverse when scrolled back above the start
    pub toggle_actions: String,
    /// Initial vertical offset (px)
    pub y: f64,
    /// Initial opacity
    pub opacity: f64,
    /// Seconds
    pub duration: f64,
    pub ease: String,
    /// Wait for layout to settle before measuring trigger positions
    pub settle_delay_ms: u32,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            selector: ".reveal".to_string(),
            start: "top 90%".to_string(),
            toggle_actions: "play none none reverse".to_string(),
            y: 30.0,
            opacity: 0.0,
            duration: 1.2,
            ease: "power2.out".to_string(),
            settle_delay_ms: 100,
        }
    }
}

impl RevealOptions {
    /// `gsap.from` vars; the per-element `trigger` is filled in on the JS side
    pub fn tween_vars(&self) -> serde_json::Value {
        json!({
            "y": self.y,
            "opacity": self.opacity,
            "duration": self.duration,
            "ease": self.ease,
            "scrollTrigger": {
                "start": self.start,
                "toggleActions": self.toggle_actions,
            },
        })
    }
}

#[cfg(target_arch = "wasm32")]
pub use web_impl::{RevealHandle, install};

#[cfg(target_arch = "wasm32")]
mod web_impl {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    use super::RevealOptions;

    #[wasm_bindgen(inline_js = "
        export function reveal_available() {
            return typeof window.gsap !== 'undefined'
                && typeof window.ScrollTrigger !== 'undefined';
        }

        export function reveal_install(selector, varsJson) {
            const gsap = window.gsap;
            gsap.registerPlugin(window.ScrollTrigger);
            const vars = JSON.parse(varsJson);
            return gsap.utils.toArray(selector).map((el) =>
                gsap.from(el, Object.assign({}, vars, {
                    scrollTrigger: Object.assign({}, vars.scrollTrigger, { trigger: el }),
                }))
            );
        }

        export function reveal_kill(tweens) {
            for (const tween of tweens) {
                if (tween.scrollTrigger) {
                    tween.scrollTrigger.kill();
                }
                tween.kill();
            }
        }
    ")]
    extern "C" {
        fn reveal_available() -> bool;
        #[wasm_bindgen(catch)]
        fn reveal_install(selector: &str, vars_json: &str) -> Result<js_sys::Array, JsValue>;
        fn reveal_kill(tweens: &js_sys::Array);
    }

    /// Pending timer and created tweens; dropping it tears both down
    #[derive(Default)]
    pub struct RevealHandle {
        timer: Option<i32>,
        callback: Option<Closure<dyn FnMut()>>,
        tweens: Rc<RefCell<Option<js_sys::Array>>>,
    }

    impl RevealHandle {
        /// Number of elements with a live trigger
        pub fn len(&self) -> usize {
            self.tweens
                .borrow()
                .as_ref()
                .map(|t| t.length() as usize)
                .unwrap_or(0)
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }

        pub fn stop(&mut self) {
            if let Some(id) = self.timer.take() {
                if let Some(window) = web_sys::window() {
                    window.clear_timeout_with_handle(id);
                }
            }
            self.callback = None;
            if let Some(tweens) = self.tweens.borrow_mut().take() {
                reveal_kill(&tweens);
            }
        }
    }

    impl Drop for RevealHandle {
        fn drop(&mut self) {
            self.stop();
        }
    }

    /// Register reveal tweens after the settle delay
    ///
    /// Returns an inert handle when GSAP or ScrollTrigger is not loaded.
    pub fn install(options: &RevealOptions) -> RevealHandle {
        if !reveal_available() {
            log::warn!("GSAP ScrollTrigger not loaded, skipping scroll reveal");
            return RevealHandle::default();
        }
        let Some(window) = web_sys::window() else {
            return RevealHandle::default();
        };

        let tweens = Rc::new(RefCell::new(None));
        let selector = options.selector.clone();
        let vars = options.tween_vars().to_string();
        let slot = tweens.clone();
        let callback = Closure::<dyn FnMut()>::new(move || {
            match reveal_install(&selector, &vars) {
                Ok(created) => {
                    log::info!("Scroll reveal armed for {} elements", created.length());
                    *slot.borrow_mut() = Some(created);
                }
                Err(e) => log::warn!("Scroll reveal failed: {:?}", e),
            }
        });

        let timer = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                options.settle_delay_ms as i32,
            )
            .map_err(|e| log::warn!("setTimeout failed: {:?}", e))
            .ok();

        RevealHandle {
            timer,
            callback: Some(callback),
            tweens,
        }
    }
}
