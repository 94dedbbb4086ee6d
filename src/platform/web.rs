//! Browser mount: canvas surface, frame loop and input listeners
//!
//! [`start`] acquires everything and returns a [`Handle`]. Stopping or
//! dropping the handle cancels the pending animation frame and removes every
//! listener it registered, so no loop outlives the canvas.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget, HtmlCanvasElement, MouseEvent, Window};

use crate::config::FieldConfig;
use crate::error::{Error, Result};
use crate::renderer::{CanvasSurface, Surface};
use crate::sim::Driver;

type App = Rc<RefCell<Driver<CanvasSurface>>>;

/// An event listener that unregisters itself on drop
struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn new<F>(target: &EventTarget, event: &'static str, handler: F) -> Result<Self>
    where
        F: FnMut(Event) + 'static,
    {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

/// The requestAnimationFrame callback and its pending request id
#[derive(Default)]
struct FrameLoop {
    id: Option<i32>,
    callback: Option<Closure<dyn FnMut(f64)>>,
}

impl FrameLoop {
    fn schedule(&mut self, window: &Window) {
        let Some(callback) = self.callback.as_ref() else {
            return;
        };
        match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
            Ok(id) => self.id = Some(id),
            Err(e) => {
                log::error!("requestAnimationFrame failed: {:?}", e);
                self.id = None;
            }
        }
    }

    fn cancel(&mut self, window: &Window) {
        if let Some(id) = self.id.take() {
            let _ = window.cancel_animation_frame(id);
        }
        self.callback = None;
    }
}

struct Mounted {
    window: Window,
    app: App,
    frame: Rc<RefCell<FrameLoop>>,
    _listeners: Vec<Listener>,
}

/// A running particle field; stops on drop
pub struct Handle {
    mounted: Option<Mounted>,
}

impl Handle {
    pub fn is_running(&self) -> bool {
        self.mounted
            .as_ref()
            .is_some_and(|m| m.app.borrow().is_running())
    }

    pub fn particle_count(&self) -> usize {
        self.mounted
            .as_ref()
            .map(|m| m.app.borrow().field().len())
            .unwrap_or(0)
    }

    /// Cancel the pending frame and remove all listeners; safe to call twice
    pub fn stop(&mut self) {
        let Some(mounted) = self.mounted.take() else {
            return;
        };
        mounted.frame.borrow_mut().cancel(&mounted.window);
        mounted.app.borrow_mut().stop();
        log::info!("Particle field unmounted");
        // listeners are removed as `mounted` drops
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        self.stop();
    }
}

fn viewport_size(window: &Window) -> (u32, u32) {
    let dim = |v: std::result::Result<JsValue, JsValue>| {
        v.ok()
            .and_then(|v| v.as_f64())
            .map(|v| v.max(0.0) as u32)
            .unwrap_or(0)
    };
    (dim(window.inner_width()), dim(window.inner_height()))
}

/// Look up a canvas by element id
pub fn find_canvas(id: &str) -> Result<HtmlCanvasElement> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| Error::Js("no document".into()))?;
    document
        .get_element_by_id(id)
        .ok_or_else(|| Error::ElementNotFound(id.to_string()))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| Error::NotACanvas(id.to_string()))
}

/// Mount the particle field on `canvas` and start animating
///
/// On any failure everything acquired so far is released before returning.
pub fn start(canvas: HtmlCanvasElement, config: FieldConfig) -> Result<Handle> {
    let window = web_sys::window().ok_or_else(|| Error::Js("no window".into()))?;
    let document = window
        .document()
        .ok_or_else(|| Error::Js("no document".into()))?;
    let body = document
        .body()
        .ok_or_else(|| Error::ElementNotFound("body".into()))?;

    let mut surface = CanvasSurface::new(canvas)?;
    let (width, height) = viewport_size(&window);
    surface.resize(width, height);

    let seed = js_sys::Date::now() as u64;
    let driver = Driver::new(surface, config, seed)?;
    log::info!(
        "Particle field mounted: {} particles on {}x{}",
        driver.field().len(),
        width,
        height
    );
    let app: App = Rc::new(RefCell::new(driver));

    let mut listeners = Vec::with_capacity(6);

    {
        let app = app.clone();
        let win = window.clone();
        listeners.push(Listener::new(&window, "resize", move |_event| {
            let (w, h) = viewport_size(&win);
            if let Err(e) = app.borrow_mut().resize(w, h) {
                log::warn!("Resize rebuild failed: {}", e);
            }
        })?);
    }

    {
        let app = app.clone();
        listeners.push(Listener::new(&window, "pointermove", move |event| {
            if let Some(event) = event.dyn_ref::<MouseEvent>() {
                app.borrow_mut()
                    .pointer_mut()
                    .move_to(event.client_x() as f64, event.client_y() as f64);
            }
        })?);
    }

    {
        let app = app.clone();
        listeners.push(Listener::new(&window, "pointerdown", move |event| {
            let mut driver = app.borrow_mut();
            let pointer = driver.pointer_mut();
            if let Some(event) = event.dyn_ref::<MouseEvent>() {
                pointer.move_to(event.client_x() as f64, event.client_y() as f64);
            }
            pointer.press();
        })?);
    }

    // a cancelled touch never sends pointerup
    for event in ["pointerup", "pointercancel"] {
        let app = app.clone();
        listeners.push(Listener::new(&window, event, move |_event| {
            app.borrow_mut().pointer_mut().release();
        })?);
    }

    {
        let app = app.clone();
        listeners.push(Listener::new(&body, "mouseleave", move |_event| {
            app.borrow_mut().pointer_mut().leave();
        })?);
    }

    let frame = Rc::new(RefCell::new(FrameLoop::default()));
    frame.borrow_mut().callback = Some(frame_callback(&window, &app, Rc::downgrade(&frame)));

    app.borrow_mut().start();
    frame.borrow_mut().schedule(&window);

    Ok(Handle {
        mounted: Some(Mounted {
            window,
            app,
            frame,
            _listeners: listeners,
        }),
    })
}

/// One tick per display refresh, rescheduling while the driver runs
fn frame_callback(
    window: &Window,
    app: &App,
    frame: Weak<RefCell<FrameLoop>>,
) -> Closure<dyn FnMut(f64)> {
    let window = window.clone();
    let app = app.clone();
    Closure::<dyn FnMut(f64)>::new(move |_time: f64| {
        let keep_going = app.borrow_mut().tick();
        let Some(frame) = frame.upgrade() else {
            return;
        };
        let mut frame = frame.borrow_mut();
        if keep_going {
            frame.schedule(&window);
        } else {
            frame.id = None;
        }
    })
}

// ============================================================================
// JS API
// ============================================================================

/// Handle returned to JavaScript hosts (mount/unmount lifecycle)
#[wasm_bindgen]
pub struct ParticleTextHandle {
    handle: Handle,
}

#[wasm_bindgen]
impl ParticleTextHandle {
    /// Tear down the loop and listeners
    pub fn stop(&mut self) {
        self.handle.stop();
    }

    #[wasm_bindgen(getter, js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.handle.is_running()
    }

    #[wasm_bindgen(getter, js_name = particleCount)]
    pub fn particle_count(&self) -> usize {
        self.handle.particle_count()
    }
}

/// Mount on the canvas with id `canvas_id`, reading config from its data attributes
#[wasm_bindgen]
pub fn mount(canvas_id: &str) -> std::result::Result<ParticleTextHandle, JsValue> {
    let canvas = find_canvas(canvas_id)?;
    let config = FieldConfig::load(&canvas);
    let handle = start(canvas, config)?;
    Ok(ParticleTextHandle { handle })
}

/// Mount with an explicit JSON config (keys override the Simple preset)
#[wasm_bindgen(js_name = mountWithConfig)]
pub fn mount_with_config(
    canvas_id: &str,
    config_json: &str,
) -> std::result::Result<ParticleTextHandle, JsValue> {
    let config = FieldConfig::from_json(config_json)?;
    let canvas = find_canvas(canvas_id)?;
    let handle = start(canvas, config)?;
    Ok(ParticleTextHandle { handle })
}
