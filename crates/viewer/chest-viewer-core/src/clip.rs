//! Clip identifiers known to the chest rig.
//!
//! Clip names arrive from buttons, from the programmatic signal and from the
//! runtime's completion notifications. Only the first is trusted, so every
//! other path goes through [`ClipName::parse`] before reaching the runtime.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ClipParseError;

/// Index of the animation track that drives the rig's pose.
pub const PRIMARY_TRACK: u32 = 0;

/// A clip authored into the chest skeleton.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClipName {
    Reveal,
    Open,
    OpenIdle,
}

impl ClipName {
    /// Every clip, in control order.
    pub const ALL: [ClipName; 3] = [ClipName::Reveal, ClipName::Open, ClipName::OpenIdle];

    /// Name as authored in the skeleton file.
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reveal => "reveal",
            Self::Open => "open",
            Self::OpenIdle => "open_idle",
        }
    }

    /// Human readable label used by the in-page controls.
    #[inline]
    pub fn label(self) -> &'static str {
        match self {
            Self::Reveal => "Reveal",
            Self::Open => "Open",
            Self::OpenIdle => "Open Idle",
        }
    }

    /// Looping is derived from the clip, never supplied by the caller.
    #[inline]
    pub fn loops(self) -> bool {
        matches!(self, Self::OpenIdle)
    }

    /// Clip started automatically once this one completes.
    #[inline]
    pub fn chained_after(self) -> Option<ClipName> {
        match self {
            Self::Open => Some(Self::OpenIdle),
            Self::Reveal | Self::OpenIdle => None,
        }
    }

    /// Parse an untrusted clip name. Matching is exact.
    pub fn parse(raw: &str) -> Result<ClipName, ClipParseError> {
        Self::ALL
            .into_iter()
            .find(|clip| clip.as_str() == raw)
            .ok_or_else(|| ClipParseError {
                raw: raw.to_string(),
            })
    }
}

impl FromStr for ClipName {
    type Err = ClipParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ClipName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
