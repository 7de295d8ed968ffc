use serde::{Deserialize, Serialize};

use crate::clip::ClipName;

/// Playback state of a loaded viewer
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    pub current_clip: ClipName,
    pub is_playing: bool,
}

impl PlaybackState {
    /// State right after a successful load.
    #[inline]
    pub fn initial() -> Self {
        Self {
            current_clip: ClipName::Reveal,
            is_playing: true,
        }
    }
}

/// Identifies one mount attempt. Load results carry it back so a result
/// from an abandoned attempt never lands on a newer one.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MountId(pub u64);

impl MountId {
    #[inline]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Lifecycle of a viewer mount
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewerPhase {
    /// Never initialized
    Unmounted,
    /// Waiting on the asset loader
    Loading,
    /// Runtime owned and playing
    Loaded,
    /// Load failed; permanent until teardown
    Failed,
    /// Runtime released, subscriptions dropped
    TornDown,
}

impl ViewerPhase {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unmounted => "unmounted",
            Self::Loading => "loading",
            Self::Loaded => "loaded",
            Self::Failed => "failed",
            Self::TornDown => "torn_down",
        }
    }

    /// Whether `initialize` may start a new mount from here.
    #[inline]
    pub fn can_initialize(&self) -> bool {
        matches!(self, Self::Unmounted | Self::TornDown)
    }
}

/// Sources the controller currently listens to.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriptions {
    pub resize: bool,
    pub completion: bool,
    pub command: bool,
}

impl Subscriptions {
    #[inline]
    pub fn active_count(&self) -> usize {
        [self.resize, self.completion, self.command]
            .into_iter()
            .filter(|s| *s)
            .count()
    }

    #[inline]
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
