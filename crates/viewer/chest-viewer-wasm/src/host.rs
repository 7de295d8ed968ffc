//! JS-side runtime adapter.
//!
//! The page supplies a loader that resolves to an object implementing the
//! methods bound below, typically a thin shim over Pixi + pixi-spine.

use chest_viewer_core::{AnimationRuntime, ClipName};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// Runtime object resolved by the page's loader.
    pub type SpineHost;

    #[wasm_bindgen(method, catch, js_name = setAnimation)]
    fn set_animation(this: &SpineHost, track: u32, name: &str, looping: bool)
        -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = setTimeScale)]
    fn set_time_scale(this: &SpineHost, scale: f32) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = setPosition)]
    fn set_position(this: &SpineHost, x: f32, y: f32) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = setScale)]
    fn set_scale(this: &SpineHost, scale: f32) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = addCompleteListener)]
    fn add_complete_listener(this: &SpineHost, listener: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = removeCompleteListener)]
    fn remove_complete_listener(this: &SpineHost, listener: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn destroy(this: &SpineHost) -> Result<(), JsValue>;
}

/// Render a thrown JS value for logs.
pub(crate) fn describe(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| {
            js_sys::Reflect::get(err, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{err:?}"))
}

fn log_host_error(call: &str, result: Result<(), JsValue>) {
    if let Err(err) = result {
        log::warn!("runtime {call} failed: {}", describe(&err));
    }
}

/// [`AnimationRuntime`] backed by a [`SpineHost`].
pub struct JsRuntime {
    host: SpineHost,
    on_complete: Option<Closure<dyn FnMut(JsValue)>>,
}

impl JsRuntime {
    pub fn new(host: SpineHost) -> Self {
        Self {
            host,
            on_complete: None,
        }
    }

    /// Forward the host's completion notifications (clip name) to `f`.
    /// Replaces any previous listener.
    pub fn listen_for_completion(&mut self, mut f: impl FnMut(String) + 'static) {
        self.stop_listening();
        let callback = Closure::<dyn FnMut(JsValue)>::new(move |name: JsValue| {
            if let Some(name) = name.as_string() {
                f(name);
            }
        });
        log_host_error(
            "addCompleteListener",
            self.host.add_complete_listener(callback.as_ref()),
        );
        self.on_complete = Some(callback);
    }

    fn stop_listening(&mut self) {
        if let Some(callback) = self.on_complete.take() {
            log_host_error(
                "removeCompleteListener",
                self.host.remove_complete_listener(callback.as_ref()),
            );
        }
    }
}

impl AnimationRuntime for JsRuntime {
    fn set_animation(&mut self, track: u32, clip: ClipName, looping: bool) {
        log_host_error(
            "setAnimation",
            self.host.set_animation(track, clip.as_str(), looping),
        );
    }

    fn set_time_scale(&mut self, scale: f32) {
        log_host_error("setTimeScale", self.host.set_time_scale(scale));
    }

    fn set_position(&mut self, x: f32, y: f32) {
        log_host_error("setPosition", self.host.set_position(x, y));
    }

    fn set_scale(&mut self, scale: f32) {
        log_host_error("setScale", self.host.set_scale(scale));
    }

    fn dispose(&mut self) {
        self.stop_listening();
        log_host_error("destroy", self.host.destroy());
    }
}
