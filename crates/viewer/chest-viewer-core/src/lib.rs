//! Chest Viewer Core (runtime-agnostic)
//!
//! Sequences the clips of the chest skeletal rig (reveal → open → open_idle)
//! on top of an external rendering/animation runtime. This crate owns the
//! clip model, the viewer lifecycle and auto-chain rule, the command surface
//! (controls and the programmatic play signal), sound-cue lookup and the
//! controls view-model. Adapters (wasm) provide the runtime, audio and
//! event wiring.

pub mod clip;
pub mod commands;
pub mod config;
pub mod controller;
pub mod controls;
pub mod cues;
pub mod error;
pub mod outputs;
pub mod runtime;
pub mod state;

// Re-exports for consumers (adapters)
pub use clip::{ClipName, PRIMARY_TRACK};
pub use commands::{
    CommandSurface, Control, PlaySignal, SignalResolution, ViewerCommand, DEFAULT_SIGNAL_CLIP,
};
pub use config::{AssetPaths, UnknownClipPolicy, ViewerConfig};
pub use controller::ViewerController;
pub use controls::{ControlButton, ControlsView, LOADING_MESSAGE};
pub use cues::{AudioSink, CueTable, NullAudio, SoundCue};
pub use error::{ClipParseError, CueError, LoadError, ViewerError};
pub use outputs::{Outputs, ViewerEvent, EVENT_BUFFER_CAPACITY};
pub use runtime::{AnimationRuntime, AssetLoader, LoadRequest, RuntimeHandle, SurfaceSize};
pub use state::{MountId, PlaybackState, Subscriptions, ViewerPhase};
