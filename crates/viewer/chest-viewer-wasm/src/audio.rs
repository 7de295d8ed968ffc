use chest_viewer_core::{AudioSink, CueError, SoundCue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::HtmlAudioElement;

use crate::host::describe;

/// Plays cues through a fresh `<audio>` element each time.
#[derive(Copy, Clone, Debug, Default)]
pub struct HtmlAudio;

impl AudioSink for HtmlAudio {
    fn play(&mut self, cue: &SoundCue) -> Result<(), CueError> {
        let audio = HtmlAudioElement::new_with_src(&cue.path).map_err(|_| CueError::Unavailable {
            path: cue.path.clone(),
        })?;
        audio.set_volume(f64::from(cue.volume));
        let playing = audio.play().map_err(|err| CueError::Blocked {
            reason: describe(&err),
        })?;

        // missing files and autoplay policy reject asynchronously
        let path = cue.path.clone();
        spawn_local(async move {
            if let Err(err) = JsFuture::from(playing).await {
                log::debug!("sound cue {path} did not play: {}", describe(&err));
            }
        });
        Ok(())
    }
}
