#![allow(dead_code)]
use std::cell::RefCell;
use std::future::{ready, Future};
use std::rc::Rc;

use chest_viewer_core::{
    AnimationRuntime, AssetLoader, AudioSink, ClipName, CueError, LoadError, LoadRequest,
    SoundCue, SurfaceSize, ViewerConfig, ViewerController,
};

#[derive(Clone, Debug, PartialEq)]
pub enum RuntimeCall {
    SetAnimation {
        track: u32,
        clip: ClipName,
        looping: bool,
    },
    SetTimeScale(f32),
    SetPosition(f32, f32),
    SetScale(f32),
    Dispose,
}

pub type CallLog = Rc<RefCell<Vec<RuntimeCall>>>;

/// Runtime that records every command into a shared log, so calls stay
/// observable after the controller disposes it.
#[derive(Debug, Default)]
pub struct RecordingRuntime {
    pub log: CallLog,
}

impl RecordingRuntime {
    pub fn new() -> (Self, CallLog) {
        let log = CallLog::default();
        (Self { log: log.clone() }, log)
    }
}

impl AnimationRuntime for RecordingRuntime {
    fn set_animation(&mut self, track: u32, clip: ClipName, looping: bool) {
        self.log.borrow_mut().push(RuntimeCall::SetAnimation {
            track,
            clip,
            looping,
        });
    }
    fn set_time_scale(&mut self, scale: f32) {
        self.log.borrow_mut().push(RuntimeCall::SetTimeScale(scale));
    }
    fn set_position(&mut self, x: f32, y: f32) {
        self.log.borrow_mut().push(RuntimeCall::SetPosition(x, y));
    }
    fn set_scale(&mut self, scale: f32) {
        self.log.borrow_mut().push(RuntimeCall::SetScale(scale));
    }
    fn dispose(&mut self) {
        self.log.borrow_mut().push(RuntimeCall::Dispose);
    }
}

/// Audio sink that records played cue paths and can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingAudio {
    pub played: Vec<String>,
    pub fail: bool,
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, cue: &SoundCue) -> Result<(), CueError> {
        if self.fail {
            return Err(CueError::Blocked {
                reason: "autoplay not allowed".to_string(),
            });
        }
        self.played.push(cue.path.clone());
        Ok(())
    }
}

/// Loader that resolves immediately with a prepared result.
pub struct ReadyLoader {
    pub result: Option<Result<RecordingRuntime, LoadError>>,
    pub requests: Vec<LoadRequest>,
}

impl ReadyLoader {
    pub fn ok(runtime: RecordingRuntime) -> Self {
        Self {
            result: Some(Ok(runtime)),
            requests: Vec::new(),
        }
    }

    pub fn err(err: LoadError) -> Self {
        Self {
            result: Some(Err(err)),
            requests: Vec::new(),
        }
    }
}

impl AssetLoader for ReadyLoader {
    type Runtime = RecordingRuntime;

    fn load(
        &mut self,
        request: &LoadRequest,
    ) -> impl Future<Output = Result<RecordingRuntime, LoadError>> {
        self.requests.push(request.clone());
        let result = self.result.take().unwrap_or_else(|| {
            Err(LoadError::Runtime {
                reason: "loader already used".to_string(),
            })
        });
        ready(result)
    }
}

pub type TestController = ViewerController<RecordingRuntime, RecordingAudio>;

pub fn surface() -> SurfaceSize {
    SurfaceSize::new(800.0, 600.0)
}

/// Controller that went through a successful load, with its log.
pub fn loaded_controller() -> (TestController, CallLog) {
    loaded_controller_with(ViewerConfig::default())
}

pub fn loaded_controller_with(cfg: ViewerConfig) -> (TestController, CallLog) {
    let (runtime, log) = RecordingRuntime::new();
    let mut ctrl = TestController::with_audio(cfg, RecordingAudio::default());
    let mut loader = ReadyLoader::ok(runtime);
    pollster::block_on(ctrl.initialize(&mut loader, surface())).expect("load should succeed");
    (ctrl, log)
}

pub fn count(log: &CallLog, call: &RuntimeCall) -> usize {
    log.borrow().iter().filter(|c| *c == call).count()
}
