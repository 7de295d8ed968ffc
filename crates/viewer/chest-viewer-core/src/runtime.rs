//! Boundary to the external rendering/animation runtime.
//!
//! The runtime owns skeletal maths, atlas parsing and drawing. The viewer
//! only issues playback commands through [`AnimationRuntime`] and asks an
//! [`AssetLoader`] to produce a runtime bound to a surface.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::clip::ClipName;
use crate::config::ViewerConfig;
use crate::error::LoadError;
use crate::state::MountId;

/// Size of the drawable surface in CSS pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

impl SurfaceSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Position of the subject when centred on this surface.
    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }
}

/// Commands the viewer issues to a loaded runtime.
pub trait AnimationRuntime {
    /// Replace the clip on `track`. Never stacks.
    fn set_animation(&mut self, track: u32, clip: ClipName, looping: bool);
    /// 0 freezes the pose at its current position, 1 is normal speed.
    fn set_time_scale(&mut self, scale: f32);
    fn set_position(&mut self, x: f32, y: f32);
    fn set_scale(&mut self, scale: f32);
    /// Free engine and GPU/canvas resources.
    fn dispose(&mut self);
}

/// Everything a loader needs to build a runtime for one surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadRequest {
    pub skeleton_path: String,
    pub atlas_path: String,
    pub width: f32,
    pub height: f32,
    pub background_color: u32,
    pub antialias: bool,
    /// Mount attempt this request belongs to.
    pub mount: MountId,
}

impl LoadRequest {
    pub fn new(cfg: &ViewerConfig, surface: SurfaceSize, mount: MountId) -> Self {
        Self {
            skeleton_path: cfg.assets.skeleton.clone(),
            atlas_path: cfg.assets.atlas.clone(),
            width: surface.width,
            height: surface.height,
            background_color: cfg.background_color,
            antialias: cfg.antialias,
            mount,
        }
    }
}

/// Asynchronously produces a runtime with the skeleton and atlas loaded.
pub trait AssetLoader {
    type Runtime: AnimationRuntime;

    fn load(
        &mut self,
        request: &LoadRequest,
    ) -> impl Future<Output = Result<Self::Runtime, LoadError>>;
}

/// Exclusive ownership of a runtime. Disposes it exactly once, either on
/// [`RuntimeHandle::release`] or on drop.
#[derive(Debug)]
pub struct RuntimeHandle<R: AnimationRuntime> {
    runtime: Option<R>,
}

impl<R: AnimationRuntime> RuntimeHandle<R> {
    pub fn new(runtime: R) -> Self {
        Self {
            runtime: Some(runtime),
        }
    }

    #[inline]
    pub fn get(&self) -> Option<&R> {
        self.runtime.as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut R> {
        self.runtime.as_mut()
    }

    #[inline]
    pub fn is_released(&self) -> bool {
        self.runtime.is_none()
    }

    /// Dispose the runtime. Later calls do nothing.
    pub fn release(&mut self) {
        if let Some(mut runtime) = self.runtime.take() {
            runtime.dispose();
        }
    }
}

impl<R: AnimationRuntime> Drop for RuntimeHandle<R> {
    fn drop(&mut self) {
        self.release();
    }
}
