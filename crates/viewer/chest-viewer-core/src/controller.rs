//! Viewer controller: owns one runtime bound to one surface and sequences
//! clips on it.
//!
//! Lifecycle: `Unmounted → Loading → Loaded | Failed → TornDown`. Commands
//! are applied only while `Loaded`; anything earlier is dropped, not queued.
//! The one automatic transition is `open` completing into `open_idle`.

use crate::clip::{ClipName, PRIMARY_TRACK};
use crate::commands::{CommandSurface, PlaySignal, SignalResolution, ViewerCommand};
use crate::config::ViewerConfig;
use crate::controls::ControlsView;
use crate::cues::{AudioSink, CueTable, NullAudio};
use crate::error::{LoadError, ViewerError};
use crate::outputs::{Outputs, ViewerEvent};
use crate::runtime::{AnimationRuntime, AssetLoader, LoadRequest, RuntimeHandle, SurfaceSize};
use crate::state::{MountId, PlaybackState, Subscriptions, ViewerPhase};

const PAUSED_TIME_SCALE: f32 = 0.0;
const NORMAL_TIME_SCALE: f32 = 1.0;

/// Controller for a single viewer mount.
#[derive(Debug)]
pub struct ViewerController<R: AnimationRuntime, A: AudioSink = NullAudio> {
    cfg: ViewerConfig,
    phase: ViewerPhase,
    mount: MountId,
    runtime: Option<RuntimeHandle<R>>,
    state: Option<PlaybackState>,
    surface: SurfaceSize,
    subscriptions: Subscriptions,
    commands: CommandSurface,
    cues: CueTable,
    audio: A,
    outputs: Outputs,
}

impl<R: AnimationRuntime> ViewerController<R, NullAudio> {
    /// Controller without sound cues.
    pub fn new(cfg: ViewerConfig) -> Self {
        Self::with_audio(cfg, NullAudio)
    }
}

impl<R: AnimationRuntime, A: AudioSink> ViewerController<R, A> {
    pub fn with_audio(cfg: ViewerConfig, audio: A) -> Self {
        Self {
            cues: CueTable::from_config(&cfg),
            commands: CommandSurface::new(cfg.unknown_clip_policy),
            cfg,
            phase: ViewerPhase::Unmounted,
            mount: MountId::default(),
            runtime: None,
            state: None,
            surface: SurfaceSize::default(),
            subscriptions: Subscriptions::default(),
            audio,
            outputs: Outputs::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> &ViewerConfig {
        &self.cfg
    }

    #[inline]
    pub fn phase(&self) -> ViewerPhase {
        self.phase
    }

    /// `None` unless loaded.
    /// Latest mount attempt.
    #[inline]
    pub fn mount(&self) -> MountId {
        self.mount
    }

    #[inline]
    pub fn state(&self) -> Option<PlaybackState> {
        self.state
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.phase == ViewerPhase::Loaded
    }

    #[inline]
    pub fn runtime(&self) -> Option<&R> {
        self.runtime.as_ref().and_then(|h| h.get())
    }

    #[inline]
    pub fn audio(&self) -> &A {
        &self.audio
    }

    #[inline]
    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    #[inline]
    pub fn cues(&self) -> &CueTable {
        &self.cues
    }

    #[inline]
    pub fn cues_mut(&mut self) -> &mut CueTable {
        &mut self.cues
    }

    #[inline]
    pub fn subscriptions(&self) -> Subscriptions {
        self.subscriptions
    }

    #[inline]
    pub fn surface(&self) -> SurfaceSize {
        self.surface
    }

    /// Start a mount on `surface` and return what the loader must fetch.
    ///
    /// Subscribes to the command signal immediately; resize and completion
    /// are subscribed once the runtime exists.
    pub fn begin_initialize(&mut self, surface: SurfaceSize) -> Result<LoadRequest, ViewerError> {
        if !self.phase.can_initialize() {
            return Err(ViewerError::AlreadyInitialized {
                phase: self.phase.name().to_string(),
            });
        }
        self.phase = ViewerPhase::Loading;
        self.mount = self.mount.next();
        self.surface = surface;
        self.state = None;
        self.subscriptions = Subscriptions {
            command: true,
            ..Subscriptions::default()
        };
        let request = LoadRequest::new(&self.cfg, surface, self.mount);
        log::info!(
            "loading skeleton {} (atlas {}) at {}x{}",
            request.skeleton_path,
            request.atlas_path,
            surface.width,
            surface.height
        );
        Ok(request)
    }

    /// Settle the mount identified by `mount` (from the [`LoadRequest`]).
    ///
    /// A result for any other attempt, or one arriving after teardown, only
    /// has its runtime disposed.
    pub fn complete_initialize(
        &mut self,
        mount: MountId,
        result: Result<R, LoadError>,
    ) -> Result<(), ViewerError> {
        if self.phase != ViewerPhase::Loading || mount != self.mount {
            match result {
                Ok(runtime) => {
                    log::info!(
                        "discarding runtime for mount {} while {} (mount {})",
                        mount.0,
                        self.phase.name(),
                        self.mount.0
                    );
                    RuntimeHandle::new(runtime).release();
                }
                Err(err) => log::debug!("ignoring stale load failure for mount {}: {err}", mount.0),
            }
            return Ok(());
        }

        let mut runtime = match result {
            Ok(runtime) => runtime,
            Err(err) => {
                log::error!("failed to load skeletal animation: {err}");
                self.phase = ViewerPhase::Failed;
                self.outputs.push_event(ViewerEvent::LoadFailed {
                    message: err.to_string(),
                });
                return Err(err.into());
            }
        };

        let (x, y) = self.surface.center();
        runtime.set_scale(self.cfg.subject_scale);
        runtime.set_position(x, y);
        runtime.set_animation(PRIMARY_TRACK, ClipName::Reveal, ClipName::Reveal.loops());

        self.runtime = Some(RuntimeHandle::new(runtime));
        self.state = Some(PlaybackState::initial());
        self.subscriptions.resize = true;
        self.subscriptions.completion = true;
        self.phase = ViewerPhase::Loaded;
        log::info!("skeletal animation loaded");
        self.outputs.push_event(ViewerEvent::Loaded);
        self.outputs.push_event(ViewerEvent::ClipStarted {
            clip: ClipName::Reveal,
            looping: ClipName::Reveal.loops(),
        });
        Ok(())
    }

    /// Mount on `surface`, loading through `loader`.
    ///
    /// Must not be called again before [`Self::teardown`].
    pub async fn initialize<L>(
        &mut self,
        loader: &mut L,
        surface: SurfaceSize,
    ) -> Result<(), ViewerError>
    where
        L: AssetLoader<Runtime = R>,
    {
        let request = self.begin_initialize(surface)?;
        let result = loader.load(&request).await;
        self.complete_initialize(request.mount, result)
    }

    /// Abandon a mount whose load never started. Returns to `Unmounted`
    /// without emitting events; any later result for `mount` is discarded.
    pub fn cancel_initialize(&mut self, mount: MountId) -> bool {
        if self.phase != ViewerPhase::Loading || mount != self.mount {
            return false;
        }
        log::debug!("cancelling mount {}", mount.0);
        self.phase = ViewerPhase::Unmounted;
        self.mount = self.mount.next();
        self.subscriptions.clear();
        self.state = None;
        true
    }

    /// Make `clip` the active clip. Returns `false` when not loaded.
    pub fn play_clip(&mut self, clip: ClipName) -> bool {
        if !self.is_loaded() {
            return false;
        }
        let (Some(runtime), Some(state)) = (
            self.runtime.as_mut().and_then(|h| h.get_mut()),
            self.state.as_mut(),
        ) else {
            return false;
        };

        let looping = clip.loops();
        runtime.set_animation(PRIMARY_TRACK, clip, looping);
        if !state.is_playing {
            runtime.set_time_scale(NORMAL_TIME_SCALE);
        }
        state.current_clip = clip;
        state.is_playing = true;
        log::debug!("playing clip {clip} (loop: {looping})");
        self.outputs
            .push_event(ViewerEvent::ClipStarted { clip, looping });
        self.fire_cue(clip);
        true
    }

    fn fire_cue(&mut self, clip: ClipName) {
        if let Some(cue) = self.cues.cue_for(clip) {
            if let Err(err) = self.audio.play(cue) {
                log::debug!("ignoring sound cue failure for {clip}: {err}");
            }
        }
    }

    /// Pause or resume without moving the clip position.
    pub fn toggle_playback(&mut self) -> bool {
        if !self.is_loaded() {
            return false;
        }
        let (Some(runtime), Some(state)) = (
            self.runtime.as_mut().and_then(|h| h.get_mut()),
            self.state.as_mut(),
        ) else {
            return false;
        };

        state.is_playing = !state.is_playing;
        if state.is_playing {
            runtime.set_time_scale(NORMAL_TIME_SCALE);
            self.outputs.push_event(ViewerEvent::PlaybackResumed);
        } else {
            runtime.set_time_scale(PAUSED_TIME_SCALE);
            self.outputs.push_event(ViewerEvent::PlaybackPaused);
        }
        true
    }

    /// Completion notification from the runtime. Returns `true` if it
    /// triggered an automatic transition.
    pub fn on_clip_complete(&mut self, completed: &str) -> bool {
        if !self.subscriptions.completion || !self.is_loaded() {
            return false;
        }
        let Ok(from) = ClipName::parse(completed) else {
            log::debug!("ignoring completion of unknown clip {completed:?}");
            return false;
        };
        let Some(to) = from.chained_after() else {
            return false;
        };
        self.outputs.push_event(ViewerEvent::AutoChained { from, to });
        self.play_clip(to)
    }

    /// Re-centre the subject on a resized surface.
    pub fn on_resize(&mut self, surface: SurfaceSize) {
        if !self.subscriptions.resize {
            return;
        }
        self.surface = surface;
        if let Some(runtime) = self.runtime.as_mut().and_then(|h| h.get_mut()) {
            let (x, y) = surface.center();
            runtime.set_position(x, y);
        }
    }

    pub fn dispatch(&mut self, command: ViewerCommand) -> bool {
        if !self.subscriptions.command {
            return false;
        }
        match command {
            ViewerCommand::Play { clip } => self.play_clip(clip),
            ViewerCommand::TogglePlayback => self.toggle_playback(),
        }
    }

    /// Programmatic play signal, validated against the rig.
    pub fn handle_signal(&mut self, signal: &PlaySignal) -> bool {
        if !self.subscriptions.command {
            return false;
        }
        match self.commands.resolve_signal(signal) {
            SignalResolution::Play(clip) => self.dispatch(ViewerCommand::Play { clip }),
            SignalResolution::Rejected { raw } => {
                log::warn!("rejecting play signal for unknown clip {raw:?}");
                self.outputs
                    .push_event(ViewerEvent::CommandRejected { raw });
                false
            }
        }
    }

    /// Release the runtime and drop every subscription. Safe to repeat.
    pub fn teardown(&mut self) {
        if let Some(mut handle) = self.runtime.take() {
            handle.release();
        }
        self.subscriptions.clear();
        self.state = None;
        if self.phase != ViewerPhase::TornDown && self.phase != ViewerPhase::Unmounted {
            log::info!("viewer torn down from {}", self.phase.name());
            self.outputs.push_event(ViewerEvent::TornDown);
        }
        if self.phase != ViewerPhase::Unmounted {
            self.phase = ViewerPhase::TornDown;
        }
    }

    pub fn controls(&self) -> ControlsView {
        ControlsView::build(self.state.as_ref())
    }

    pub fn drain_events(&mut self) -> Vec<ViewerEvent> {
        self.outputs.drain()
    }
}
