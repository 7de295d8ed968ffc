//! Sound cues keyed by clip.
//!
//! Cues are a side effect of starting a clip. The mapping lives in a table
//! so it can be inspected and extended without touching playback logic.

use hashbrown::HashMap;

use crate::clip::ClipName;
use crate::config::ViewerConfig;
use crate::error::CueError;

/// A short sound played when a clip starts.
#[derive(Clone, Debug, PartialEq)]
pub struct SoundCue {
    pub path: String,
    pub volume: f32,
}

/// Clip → cue lookup.
#[derive(Clone, Debug, Default)]
pub struct CueTable {
    cues: HashMap<ClipName, SoundCue>,
}

impl CueTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(cfg: &ViewerConfig) -> Self {
        let mut table = Self::new();
        for (clip, path) in cfg.cue_paths.iter() {
            table.insert(
                *clip,
                SoundCue {
                    path: path.clone(),
                    volume: cfg.cue_volume,
                },
            );
        }
        table
    }

    pub fn insert(&mut self, clip: ClipName, cue: SoundCue) -> Option<SoundCue> {
        self.cues.insert(clip, cue)
    }

    #[inline]
    pub fn cue_for(&self, clip: ClipName) -> Option<&SoundCue> {
        self.cues.get(&clip)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cues.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }
}

/// Best-effort audio output.
pub trait AudioSink {
    fn play(&mut self, cue: &SoundCue) -> Result<(), CueError>;
}

/// Sink that plays nothing.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: &SoundCue) -> Result<(), CueError> {
        Ok(())
    }
}
