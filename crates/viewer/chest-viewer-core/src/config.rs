//! Viewer configuration.
//!
//! Every field has a default matching the chest demo, so hosts may pass an
//! empty object (or nothing at all) and override only what they need.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::clip::ClipName;
use crate::error::ViewerError;

/// What to do with a programmatic request naming an unknown clip.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownClipPolicy {
    /// Drop the request and log it.
    Reject,
    /// Play the given clip instead.
    Fallback(ClipName),
}

impl Default for UnknownClipPolicy {
    fn default() -> Self {
        Self::Reject
    }
}

/// Fixed locations of the skeleton definition and its atlas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    pub skeleton: String,
    pub atlas: String,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            skeleton: "/chest/proj_1_zoggy_chest_PS_V2.json".to_string(),
            atlas: "/chest/proj_1_zoggy_chest_PS_V2.atlas.txt".to_string(),
        }
    }
}

fn default_cue_paths() -> HashMap<ClipName, String> {
    let mut cues = HashMap::new();
    cues.insert(ClipName::Open, "/chest/sfx_open.wav".to_string());
    cues.insert(ClipName::Reveal, "/chest/sfx_reveal.wav".to_string());
    cues
}

/// Configuration for one viewer instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub assets: AssetPaths,
    /// Clear colour handed to the runtime, 0xRRGGBB.
    pub background_color: u32,
    pub antialias: bool,
    /// Uniform scale applied to the subject once loaded.
    pub subject_scale: f32,
    /// Height of the drawable region in CSS pixels.
    pub surface_height_px: u32,
    /// Volume for every sound cue, in [0, 1].
    pub cue_volume: f32,
    /// Sound file per clip. Clips without an entry play silently.
    pub cue_paths: HashMap<ClipName, String>,
    /// Name of the programmatic play signal.
    pub signal_name: String,
    pub unknown_clip_policy: UnknownClipPolicy,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            assets: AssetPaths::default(),
            background_color: 0x1a1a1a,
            antialias: true,
            subject_scale: 0.8,
            surface_height_px: 600,
            cue_volume: 0.5,
            cue_paths: default_cue_paths(),
            signal_name: "spine:play".to_string(),
            unknown_clip_policy: UnknownClipPolicy::Reject,
        }
    }
}

impl ViewerConfig {
    /// Parse a JSON config and validate it.
    pub fn from_json(json: &str) -> Result<Self, ViewerError> {
        let cfg: ViewerConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ViewerError> {
        let invalid = |reason: &str| {
            Err(ViewerError::InvalidConfig {
                reason: reason.to_string(),
            })
        };
        if self.assets.skeleton.trim().is_empty() {
            return invalid("skeleton path is empty");
        }
        if self.assets.atlas.trim().is_empty() {
            return invalid("atlas path is empty");
        }
        if !(self.subject_scale.is_finite() && self.subject_scale > 0.0) {
            return invalid("subject_scale must be a positive number");
        }
        if !(0.0..=1.0).contains(&self.cue_volume) {
            return invalid("cue_volume must be within [0, 1]");
        }
        if self.signal_name.trim().is_empty() {
            return invalid("signal_name is empty");
        }
        Ok(())
    }
}
