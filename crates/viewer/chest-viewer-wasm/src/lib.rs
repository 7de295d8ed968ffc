//! wasm-bindgen surface for the chest viewer.
//!
//! ```js
//! const viewer = new ChestViewer({ subject_scale: 0.8 });
//! await viewer.initialize(surfaceElement, loadSpine);
//! viewer.mountControls(controlsElement);
//! window.dispatchEvent(new CustomEvent("spine:play", { detail: { animation: "open" } }));
//! viewer.teardown();
//! ```
//!
//! `loadSpine(request, surface)` receives the load request and the surface
//! element the runtime must render into (size it to, append its canvas to).
//! It must resolve to an object with `setAnimation`, `setTimeScale`,
//! `setPosition`, `setScale`, `addCompleteListener`, `removeCompleteListener`
//! and `destroy`.

mod audio;
mod controls;
mod host;
mod listener;

use std::cell::{RefCell, RefMut};
use std::rc::{Rc, Weak};

use js_sys::{Function, Promise, JSON};
use serde_json::Value as JsonValue;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys::{CustomEvent, Element, Event, HtmlElement, Window};

use chest_viewer_core::{LoadError, PlaySignal, SurfaceSize, ViewerConfig, ViewerController};

pub use audio::HtmlAudio;
pub use controls::ControlsDom;
pub use host::{JsRuntime, SpineHost};
pub use listener::EventListener;

use host::describe;

type Controller = ViewerController<JsRuntime, HtmlAudio>;

struct Shared {
    controller: Controller,
    surface: Option<HtmlElement>,
    listeners: Vec<EventListener>,
    controls: Option<ControlsDom>,
}

impl Shared {
    fn refresh(&self) {
        if let Some(controls) = &self.controls {
            controls.render(&self.controller.controls());
        }
    }
}

/// Run `f` against the viewer from a DOM or host callback. Dropped when the
/// viewer is gone or already borrowed further up the stack.
fn with_shared(weak: &Weak<RefCell<Shared>>, f: impl FnOnce(&mut Shared)) {
    let Some(shared) = weak.upgrade() else {
        return;
    };
    let Ok(mut guard) = shared.try_borrow_mut() else {
        log::debug!("viewer busy; dropping re-entrant callback");
        return;
    };
    f(&mut guard);
    guard.refresh();
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn js_error(err: impl std::fmt::Display) -> JsError {
    JsError::new(&err.to_string())
}

fn window() -> Result<Window, JsError> {
    web_sys::window().ok_or_else(|| JsError::new("no global window"))
}

fn init_logging() {
    console_error_panic_hook::set_once();
    // already installed by an earlier instance
    let _ = console_log::init_with_level(log::Level::Info);
}

fn surface_size(surface: &Element) -> SurfaceSize {
    SurfaceSize::new(surface.client_width() as f32, surface.client_height() as f32)
}

fn style_surface(surface: &HtmlElement, height_px: u32) {
    let style = surface.style();
    let _ = style.set_property("height", &format!("{height_px}px"));
    let _ = style.set_property("position", "relative");
    let _ = style.set_property("border", "2px solid #333");
    let _ = style.set_property("border-radius", "12px");
    let _ = style.set_property("overflow", "hidden");
}

/// Event detail as JSON: an object, or a string holding JSON.
fn detail_to_json(detail: &JsValue) -> JsonValue {
    if jsvalue_is_undefined_or_null(detail) {
        return JsonValue::Null;
    }
    let text = match detail.as_string() {
        Some(text) => Some(text),
        None => JSON::stringify(detail).ok().and_then(|s| s.as_string()),
    };
    text.and_then(|t| serde_json::from_str(&t).ok())
        .unwrap_or(JsonValue::Null)
}

fn signal_from_event(event: &Event) -> PlaySignal {
    let detail = event
        .dyn_ref::<CustomEvent>()
        .map(|e| e.detail())
        .unwrap_or(JsValue::UNDEFINED);
    PlaySignal::from_detail(&detail_to_json(&detail))
}

/// Borrow once the current call stack has released the viewer.
async fn borrow_when_free(shared: &Rc<RefCell<Shared>>) -> RefMut<'_, Shared> {
    loop {
        if let Ok(guard) = shared.try_borrow_mut() {
            return guard;
        }
        let _ = JsFuture::from(Promise::resolve(&JsValue::UNDEFINED)).await;
    }
}

async fn load_runtime(
    loader: &Function,
    request: &JsValue,
    surface: &JsValue,
    skeleton_path: String,
    weak: Weak<RefCell<Shared>>,
) -> Result<JsRuntime, LoadError> {
    let pending = loader
        .call2(&JsValue::UNDEFINED, request, surface)
        .map_err(|err| LoadError::Runtime {
            reason: describe(&err),
        })?;
    let host = JsFuture::from(Promise::resolve(&pending))
        .await
        .map_err(|err| LoadError::Runtime {
            reason: describe(&err),
        })?;
    if jsvalue_is_undefined_or_null(&host) {
        return Err(LoadError::Malformed {
            path: skeleton_path,
            reason: "loader resolved without a runtime".to_string(),
        });
    }

    let mut runtime = JsRuntime::new(host.unchecked_into());
    runtime.listen_for_completion(move |name| {
        with_shared(&weak, |shared| {
            shared.controller.on_clip_complete(&name);
        })
    });
    Ok(runtime)
}

fn watch_resize(shared: &mut Shared, weak: Weak<RefCell<Shared>>) -> Result<(), JsError> {
    let listener = EventListener::new(&*window()?, "resize", move |_| {
        with_shared(&weak, |shared| {
            if let Some(size) = shared.surface.as_deref().map(surface_size) {
                shared.controller.on_resize(size);
            }
        })
    })
    .map_err(|err| JsError::new(&describe(&err)))?;
    shared.listeners.push(listener);
    Ok(())
}

/// Returns the ABI version of this wasm module.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}

#[wasm_bindgen]
pub struct ChestViewer {
    shared: Rc<RefCell<Shared>>,
}

impl ChestViewer {
    fn shared_mut(&self) -> Result<RefMut<'_, Shared>, JsError> {
        self.shared
            .try_borrow_mut()
            .map_err(|_| JsError::new("ChestViewer is busy"))
    }
}

#[wasm_bindgen]
impl ChestViewer {
    /// Create a viewer. Pass a config object or undefined/null for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<ChestViewer, JsError> {
        init_logging();

        let cfg: ViewerConfig = if jsvalue_is_undefined_or_null(&config) {
            ViewerConfig::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        cfg.validate().map_err(js_error)?;

        Ok(ChestViewer {
            shared: Rc::new(RefCell::new(Shared {
                controller: ViewerController::with_audio(cfg, HtmlAudio),
                surface: None,
                listeners: Vec::new(),
                controls: None,
            })),
        })
    }

    /// Mount on `surface`, loading through
    /// `loader(request, surface) => Promise<host>`. The promise rejects when
    /// loading fails; the viewer then stays unloaded. A load that settles
    /// after `teardown` only has its host destroyed.
    pub fn initialize(&self, surface: HtmlElement, loader: Function) -> Result<Promise, JsError> {
        let window = window()?;
        let surface_js = JsValue::from(surface.clone());
        let (request_js, mount, skeleton_path) = {
            let mut shared = self.shared_mut()?;
            style_surface(&surface, shared.controller.config().surface_height_px);
            let request = shared
                .controller
                .begin_initialize(surface_size(&surface))
                .map_err(js_error)?;
            let mount = request.mount;
            let request_js = match swb::to_value(&request) {
                Ok(value) => value,
                Err(e) => {
                    shared.controller.cancel_initialize(mount);
                    return Err(JsError::new(&format!("load request error: {e}")));
                }
            };

            let signal_name = shared.controller.config().signal_name.clone();
            let weak = Rc::downgrade(&self.shared);
            let on_signal = EventListener::new(&window, &signal_name, move |event| {
                let signal = signal_from_event(&event);
                with_shared(&weak, |shared| {
                    shared.controller.handle_signal(&signal);
                })
            });
            match on_signal {
                Ok(listener) => shared.listeners.push(listener),
                Err(err) => {
                    shared.controller.cancel_initialize(mount);
                    return Err(JsError::new(&describe(&err)));
                }
            }

            shared.surface = Some(surface);
            shared.refresh();
            (request_js, mount, request.skeleton_path)
        };

        let shared = Rc::clone(&self.shared);
        Ok(future_to_promise(async move {
            let result = load_runtime(
                &loader,
                &request_js,
                &surface_js,
                skeleton_path,
                Rc::downgrade(&shared),
            )
            .await;

            let mut guard = borrow_when_free(&shared).await;
            let current = guard.controller.mount() == mount;
            let outcome = guard.controller.complete_initialize(mount, result);
            if outcome.is_ok() && current && guard.controller.is_loaded() {
                watch_resize(&mut guard, Rc::downgrade(&shared)).map_err(JsValue::from)?;
            }
            guard.refresh();
            outcome
                .map(|()| JsValue::UNDEFINED)
                .map_err(|e| JsValue::from(js_error(e)))
        }))
    }

    /// Play a clip by name, validated like a play signal.
    pub fn play(&self, name: &str) -> Result<bool, JsError> {
        let mut shared = self.shared_mut()?;
        let played = shared.controller.handle_signal(&PlaySignal::new(name));
        shared.refresh();
        Ok(played)
    }

    /// Apply a play-signal detail (`{ animation?: string }` or its JSON text)
    /// directly to this instance.
    #[wasm_bindgen(js_name = dispatchSignal)]
    pub fn dispatch_signal(&self, detail: JsValue) -> Result<bool, JsError> {
        let signal = PlaySignal::from_detail(&detail_to_json(&detail));
        let mut shared = self.shared_mut()?;
        let played = shared.controller.handle_signal(&signal);
        shared.refresh();
        Ok(played)
    }

    #[wasm_bindgen(js_name = togglePlayback)]
    pub fn toggle_playback(&self) -> Result<bool, JsError> {
        let mut shared = self.shared_mut()?;
        let toggled = shared.controller.toggle_playback();
        shared.refresh();
        Ok(toggled)
    }

    /// Current `{ currentClip, isPlaying }`, or null while not loaded.
    pub fn state(&self) -> Result<JsValue, JsError> {
        let shared = self.shared.try_borrow().map_err(js_error)?;
        match shared.controller.state() {
            Some(state) => swb::to_value(&state).map_err(js_error),
            None => Ok(JsValue::NULL),
        }
    }

    /// Lifecycle phase name.
    pub fn phase(&self) -> Result<String, JsError> {
        let shared = self.shared.try_borrow().map_err(js_error)?;
        Ok(shared.controller.phase().name().to_string())
    }

    /// Controls view-model for hosts that render their own controls.
    pub fn controls(&self) -> Result<JsValue, JsError> {
        let shared = self.shared.try_borrow().map_err(js_error)?;
        swb::to_value(&shared.controller.controls()).map_err(js_error)
    }

    /// Render the built-in controls row and status line under `container`.
    #[wasm_bindgen(js_name = mountControls)]
    pub fn mount_controls(&self, container: Element) -> Result<(), JsError> {
        let document = window()?
            .document()
            .ok_or_else(|| JsError::new("no document"))?;
        let weak = Rc::downgrade(&self.shared);
        let dom = ControlsDom::mount(&document, &container, move |control| {
            with_shared(&weak, |shared| {
                shared.controller.dispatch(control.command());
            })
        })
        .map_err(|err| JsError::new(&describe(&err)))?;

        let mut shared = self.shared_mut()?;
        if let Some(previous) = shared.controls.take() {
            previous.unmount();
        }
        dom.render(&shared.controller.controls());
        shared.controls = Some(dom);
        Ok(())
    }

    /// Drain viewer events as an array of `{ kind, ... }` objects.
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&self) -> Result<JsValue, JsError> {
        let mut shared = self.shared_mut()?;
        let events = shared.controller.drain_events();
        swb::to_value(&events).map_err(js_error)
    }

    /// Release the runtime and every listener. Safe to call repeatedly.
    pub fn teardown(&self) -> Result<(), JsError> {
        let mut shared = self.shared_mut()?;
        shared.controller.teardown();
        shared.listeners.clear();
        shared.surface = None;
        if let Some(controls) = shared.controls.take() {
            controls.unmount();
        }
        Ok(())
    }
}
