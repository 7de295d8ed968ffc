//! Command surface: controls and the programmatic play signal.
//!
//! Both stimuli are reduced to [`ViewerCommand`] before they reach the
//! controller. Signal payloads are untrusted and validated here.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::clip::ClipName;
use crate::config::UnknownClipPolicy;

/// Clip started when a signal carries no clip name.
pub const DEFAULT_SIGNAL_CLIP: ClipName = ClipName::Open;

/// A request applied by the controller.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewerCommand {
    Play { clip: ClipName },
    TogglePlayback,
}

/// One in-page control.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Control {
    Clip(ClipName),
    PlayPause,
}

impl Control {
    /// Controls in display order: one per clip, then play/pause.
    pub fn all() -> impl Iterator<Item = Control> {
        ClipName::ALL
            .into_iter()
            .map(Control::Clip)
            .chain(std::iter::once(Control::PlayPause))
    }

    #[inline]
    pub fn command(self) -> ViewerCommand {
        match self {
            Self::Clip(clip) => ViewerCommand::Play { clip },
            Self::PlayPause => ViewerCommand::TogglePlayback,
        }
    }
}

/// Payload of the programmatic play signal: `{ animation?: string }`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaySignal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<String>,
}

impl PlaySignal {
    pub fn new(animation: impl Into<String>) -> Self {
        Self {
            animation: Some(animation.into()),
        }
    }

    /// Read a signal from an arbitrary event detail.
    ///
    /// Missing detail, a missing/null/empty `animation` field and non-object
    /// details all mean "no payload". A non-string `animation` is kept as its
    /// JSON text so it is rejected downstream rather than silently defaulted.
    pub fn from_detail(detail: &JsonValue) -> Self {
        let animation = match detail.get("animation") {
            None | Some(JsonValue::Null) => None,
            Some(JsonValue::String(s)) if s.is_empty() => None,
            Some(JsonValue::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        };
        Self { animation }
    }
}

/// Outcome of resolving a signal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignalResolution {
    Play(ClipName),
    Rejected { raw: String },
}

/// Translates external stimuli into commands.
#[derive(Copy, Clone, Debug, Default)]
pub struct CommandSurface {
    policy: UnknownClipPolicy,
}

impl CommandSurface {
    pub fn new(policy: UnknownClipPolicy) -> Self {
        Self { policy }
    }

    #[inline]
    pub fn policy(&self) -> UnknownClipPolicy {
        self.policy
    }

    /// Validate an untrusted clip name against the rig, applying the policy.
    pub fn resolve_name(&self, raw: &str) -> SignalResolution {
        match ClipName::parse(raw) {
            Ok(clip) => SignalResolution::Play(clip),
            Err(_) => match self.policy {
                UnknownClipPolicy::Reject => SignalResolution::Rejected {
                    raw: raw.to_string(),
                },
                UnknownClipPolicy::Fallback(clip) => SignalResolution::Play(clip),
            },
        }
    }

    pub fn resolve_signal(&self, signal: &PlaySignal) -> SignalResolution {
        match signal.animation.as_deref() {
            None => SignalResolution::Play(DEFAULT_SIGNAL_CLIP),
            Some(raw) => self.resolve_name(raw),
        }
    }
}
