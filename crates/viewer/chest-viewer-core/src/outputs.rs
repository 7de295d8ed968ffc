//! Semantic events emitted by the controller.
//!
//! Events accumulate between drains. Hosts (DOM adapter, tests, logging)
//! drain them to refresh UI or assert on transitions.

use serde::{Deserialize, Serialize};

use crate::clip::ClipName;

/// Discrete signals emitted while handling commands and notifications.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum ViewerEvent {
    Loaded,
    LoadFailed { message: String },
    ClipStarted { clip: ClipName, looping: bool },
    PlaybackPaused,
    PlaybackResumed,
    AutoChained { from: ClipName, to: ClipName },
    /// Programmatic request for a clip outside the rig.
    CommandRejected { raw: String },
    TornDown,
}

/// Events kept for hosts that never drain; the oldest are dropped first.
pub const EVENT_BUFFER_CAPACITY: usize = 256;

/// Event buffer owned by a controller.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub events: Vec<ViewerEvent>,
}

impl Outputs {
    #[inline]
    pub fn push_event(&mut self, event: ViewerEvent) {
        if self.events.len() >= EVENT_BUFFER_CAPACITY {
            let excess = self.events.len() + 1 - EVENT_BUFFER_CAPACITY;
            self.events.drain(..excess);
        }
        self.events.push(event);
    }

    #[inline]
    pub fn drain(&mut self) -> Vec<ViewerEvent> {
        std::mem::take(&mut self.events)
    }

    #[inline]
    pub fn clear(&mut self) {
        self.events.clear();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
