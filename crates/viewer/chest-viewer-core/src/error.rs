//! Error types for the chest viewer

use serde::{Deserialize, Serialize};

/// Errors surfaced by the viewer controller
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ViewerError {
    /// `initialize` called while a mount is already in progress or settled
    #[error("Viewer already initialized (phase: {phase})")]
    AlreadyInitialized { phase: String },

    /// Skeleton or atlas could not be loaded
    #[error("Failed to load skeletal animation: {reason}")]
    LoadFailed { reason: String },

    /// Configuration rejected by validation
    #[error("Invalid viewer config: {reason}")]
    InvalidConfig { reason: String },
}

impl ViewerError {
    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::AlreadyInitialized { .. } => "lifecycle",
            Self::LoadFailed { .. } => "load",
            Self::InvalidConfig { .. } => "config",
        }
    }
}

impl From<LoadError> for ViewerError {
    fn from(err: LoadError) -> Self {
        Self::LoadFailed {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ViewerError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidConfig {
            reason: err.to_string(),
        }
    }
}

/// Failure reported by an asset loader
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LoadError {
    /// Resource could not be fetched
    #[error("Network error loading {path}: {reason}")]
    Network { path: String, reason: String },

    /// Resource fetched but not understood by the runtime
    #[error("Malformed asset {path}: {reason}")]
    Malformed { path: String, reason: String },

    /// Runtime construction failed after the assets resolved
    #[error("Runtime error: {reason}")]
    Runtime { reason: String },
}

/// Failure playing a sound cue. Never propagated past the controller.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CueError {
    #[error("Sound cue unavailable: {path}")]
    Unavailable { path: String },

    #[error("Sound cue blocked: {reason}")]
    Blocked { reason: String },
}

/// Clip name outside the set authored into the rig
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown clip name: {raw:?}")]
pub struct ClipParseError {
    pub raw: String,
}
