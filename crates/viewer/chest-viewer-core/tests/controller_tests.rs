mod common;

use chest_viewer_core::{
    ClipName, LoadError, PlaySignal, PlaybackState, ViewerCommand, ViewerConfig, ViewerError,
    ViewerEvent, ViewerPhase, EVENT_BUFFER_CAPACITY, PRIMARY_TRACK,
};
use common::*;

fn state(clip: ClipName, is_playing: bool) -> Option<PlaybackState> {
    Some(PlaybackState {
        current_clip: clip,
        is_playing,
    })
}

/// it should centre, scale and start reveal once the load resolves
#[test]
fn load_starts_reveal_without_cue() {
    let (ctrl, log) = loaded_controller();
    assert_eq!(ctrl.phase(), ViewerPhase::Loaded);
    assert_eq!(ctrl.state(), state(ClipName::Reveal, true));
    assert_eq!(
        *log.borrow(),
        vec![
            RuntimeCall::SetScale(0.8),
            RuntimeCall::SetPosition(400.0, 300.0),
            RuntimeCall::SetAnimation {
                track: PRIMARY_TRACK,
                clip: ClipName::Reveal,
                looping: false,
            },
        ]
    );
    assert!(ctrl.audio().played.is_empty());
    assert_eq!(ctrl.subscriptions().active_count(), 3);
}

/// it should hand the configured asset paths and surface to the loader
#[test]
fn loader_receives_request() {
    let (runtime, _log) = RecordingRuntime::new();
    let mut ctrl = TestController::with_audio(ViewerConfig::default(), Default::default());
    let mut loader = ReadyLoader::ok(runtime);
    pollster::block_on(ctrl.initialize(&mut loader, surface())).unwrap();
    assert_eq!(loader.requests.len(), 1);
    let req = &loader.requests[0];
    assert_eq!(req.skeleton_path, "/chest/proj_1_zoggy_chest_PS_V2.json");
    assert_eq!(req.atlas_path, "/chest/proj_1_zoggy_chest_PS_V2.atlas.txt");
    assert_eq!((req.width, req.height), (800.0, 600.0));
}

/// it should set current clip and playing for every clip
#[test]
fn play_clip_updates_state_for_all_clips() {
    let (mut ctrl, _log) = loaded_controller();
    for clip in ClipName::ALL {
        assert!(ctrl.play_clip(clip));
        assert_eq!(ctrl.state(), state(clip, true));
    }
}

/// it should loop only open_idle, on the primary track
#[test]
fn looping_is_name_derived() {
    let (mut ctrl, log) = loaded_controller();
    log.borrow_mut().clear();
    for clip in ClipName::ALL {
        ctrl.play_clip(clip);
    }
    let started: Vec<_> = log
        .borrow()
        .iter()
        .filter_map(|c| match c {
            RuntimeCall::SetAnimation {
                track,
                clip,
                looping,
            } => Some((*track, *clip, *looping)),
            _ => None,
        })
        .collect();
    assert_eq!(
        started,
        vec![
            (PRIMARY_TRACK, ClipName::Reveal, false),
            (PRIMARY_TRACK, ClipName::Open, false),
            (PRIMARY_TRACK, ClipName::OpenIdle, true),
        ]
    );
}

/// it should play cues for open and reveal only
#[test]
fn cues_fire_for_open_and_reveal() {
    let (mut ctrl, _log) = loaded_controller();
    ctrl.play_clip(ClipName::Open);
    ctrl.play_clip(ClipName::OpenIdle);
    ctrl.play_clip(ClipName::Reveal);
    assert_eq!(
        ctrl.audio().played,
        vec!["/chest/sfx_open.wav", "/chest/sfx_reveal.wav"]
    );
}

/// it should swallow cue failures without touching playback state
#[test]
fn cue_failure_is_silent() {
    let (mut ctrl, _log) = loaded_controller();
    ctrl.audio_mut().fail = true;
    assert!(ctrl.play_clip(ClipName::Open));
    assert_eq!(ctrl.state(), state(ClipName::Open, true));
    assert!(ctrl.audio().played.is_empty());
}

/// it should chain open into open_idle on completion
#[test]
fn open_completion_chains_to_open_idle() {
    let (mut ctrl, log) = loaded_controller();
    ctrl.play_clip(ClipName::Open);
    ctrl.drain_events();

    assert!(ctrl.on_clip_complete("open"));
    assert_eq!(ctrl.state(), state(ClipName::OpenIdle, true));
    assert_eq!(
        count(
            &log,
            &RuntimeCall::SetAnimation {
                track: PRIMARY_TRACK,
                clip: ClipName::OpenIdle,
                looping: true,
            }
        ),
        1
    );
    assert_eq!(
        ctrl.drain_events(),
        vec![
            ViewerEvent::AutoChained {
                from: ClipName::Open,
                to: ClipName::OpenIdle,
            },
            ViewerEvent::ClipStarted {
                clip: ClipName::OpenIdle,
                looping: true,
            },
        ]
    );
}

/// it should ignore completions of reveal, open_idle and unknown clips
#[test]
fn other_completions_are_ignored() {
    let (mut ctrl, log) = loaded_controller();
    let before = log.borrow().len();
    assert!(!ctrl.on_clip_complete("reveal"));
    assert!(!ctrl.on_clip_complete("open_idle"));
    assert!(!ctrl.on_clip_complete("explode"));
    assert_eq!(log.borrow().len(), before);
    assert_eq!(ctrl.state(), state(ClipName::Reveal, true));
}

/// it should flip exactly once per toggle and restore after two
#[test]
fn toggle_is_a_flip() {
    let (mut ctrl, log) = loaded_controller();
    assert!(ctrl.toggle_playback());
    assert_eq!(ctrl.state(), state(ClipName::Reveal, false));
    assert!(ctrl.toggle_playback());
    assert_eq!(ctrl.state(), state(ClipName::Reveal, true));

    let scales: Vec<_> = log
        .borrow()
        .iter()
        .filter_map(|c| match c {
            RuntimeCall::SetTimeScale(s) => Some(*s),
            _ => None,
        })
        .collect();
    assert_eq!(scales, vec![0.0, 1.0]);
}

/// it should not restart the clip when pausing
#[test]
fn pause_keeps_clip_position() {
    let (mut ctrl, log) = loaded_controller();
    log.borrow_mut().clear();
    ctrl.toggle_playback();
    assert!(log
        .borrow()
        .iter()
        .all(|c| !matches!(c, RuntimeCall::SetAnimation { .. })));
}

/// it should resume time when a clip is played while paused
#[test]
fn play_while_paused_resumes_time() {
    let (mut ctrl, log) = loaded_controller();
    ctrl.toggle_playback();
    log.borrow_mut().clear();
    ctrl.play_clip(ClipName::Open);
    assert_eq!(ctrl.state(), state(ClipName::Open, true));
    assert_eq!(count(&log, &RuntimeCall::SetTimeScale(1.0)), 1);
}

/// it should ignore commands before the load resolves
#[test]
fn commands_before_load_are_dropped() {
    let mut ctrl = TestController::with_audio(ViewerConfig::default(), Default::default());
    assert!(!ctrl.play_clip(ClipName::Open));
    assert!(!ctrl.toggle_playback());
    assert_eq!(ctrl.state(), None);

    let request = ctrl.begin_initialize(surface()).unwrap();
    assert_eq!(ctrl.phase(), ViewerPhase::Loading);
    assert!(!ctrl.play_clip(ClipName::Open));
    assert!(!ctrl.toggle_playback());
    assert!(!ctrl.handle_signal(&PlaySignal::default()));
    assert_eq!(ctrl.state(), None);
    assert!(ctrl.audio().played.is_empty());

    let (runtime, _log) = RecordingRuntime::new();
    ctrl.complete_initialize(request.mount, Ok(runtime)).unwrap();
    assert_eq!(ctrl.state(), state(ClipName::Reveal, true));
}

/// it should enter a permanent failed state when loading fails
#[test]
fn load_failure_is_reported_and_sticky() {
    let mut ctrl = TestController::with_audio(ViewerConfig::default(), Default::default());
    let mut loader = ReadyLoader::err(LoadError::Network {
        path: "/chest/proj_1_zoggy_chest_PS_V2.json".to_string(),
        reason: "404".to_string(),
    });
    let err = pollster::block_on(ctrl.initialize(&mut loader, surface())).unwrap_err();
    assert!(matches!(err, ViewerError::LoadFailed { .. }));
    assert_eq!(ctrl.phase(), ViewerPhase::Failed);
    assert!(!ctrl.play_clip(ClipName::Open));
    assert!(!ctrl.toggle_playback());
    assert!(ctrl.runtime().is_none());
    assert!(matches!(
        ctrl.drain_events().as_slice(),
        [ViewerEvent::LoadFailed { .. }]
    ));

    // no retry without teardown
    let mut again = ReadyLoader::ok(RecordingRuntime::new().0);
    let err = pollster::block_on(ctrl.initialize(&mut again, surface())).unwrap_err();
    assert!(matches!(err, ViewerError::AlreadyInitialized { .. }));
    assert!(again.requests.is_empty());
}

/// it should refuse a second initialize on a live mount
#[test]
fn initialize_twice_is_rejected() {
    let (mut ctrl, log) = loaded_controller();
    let err = ctrl.begin_initialize(surface()).unwrap_err();
    assert_eq!(
        err,
        ViewerError::AlreadyInitialized {
            phase: "loaded".to_string()
        }
    );
    assert_eq!(ctrl.state(), state(ClipName::Reveal, true));
    assert_eq!(count(&log, &RuntimeCall::Dispose), 0);
}

/// it should dispose once and drop every subscription, even when repeated
#[test]
fn teardown_is_safe_and_idempotent() {
    let (mut ctrl, log) = loaded_controller();
    ctrl.teardown();
    ctrl.teardown();
    assert_eq!(ctrl.phase(), ViewerPhase::TornDown);
    assert_eq!(ctrl.subscriptions().active_count(), 0);
    assert_eq!(count(&log, &RuntimeCall::Dispose), 1);
    assert!(ctrl.runtime().is_none());
    assert_eq!(ctrl.state(), None);
    assert!(!ctrl.play_clip(ClipName::Open));
    assert!(!ctrl.dispatch(ViewerCommand::TogglePlayback));
    assert!(!ctrl.on_clip_complete("open"));
    assert_eq!(
        ctrl.drain_events()
            .into_iter()
            .filter(|e| *e == ViewerEvent::TornDown)
            .count(),
        1
    );
}

/// it should tolerate teardown before initialize and during loading
#[test]
fn teardown_before_load_resolves() {
    let mut ctrl = TestController::with_audio(ViewerConfig::default(), Default::default());
    ctrl.teardown();
    assert_eq!(ctrl.phase(), ViewerPhase::Unmounted);
    assert_eq!(ctrl.subscriptions().active_count(), 0);

    let request = ctrl.begin_initialize(surface()).unwrap();
    ctrl.teardown();
    assert_eq!(ctrl.phase(), ViewerPhase::TornDown);
    assert_eq!(ctrl.subscriptions().active_count(), 0);

    // the load lands after teardown: runtime is released immediately
    let (runtime, log) = RecordingRuntime::new();
    ctrl.complete_initialize(request.mount, Ok(runtime)).unwrap();
    assert_eq!(*log.borrow(), vec![RuntimeCall::Dispose]);
    assert_eq!(ctrl.phase(), ViewerPhase::TornDown);
    assert!(ctrl.runtime().is_none());
}

/// it should allow a fresh mount after teardown
#[test]
fn remount_after_teardown() {
    let (mut ctrl, first) = loaded_controller();
    ctrl.teardown();
    let (runtime, second) = RecordingRuntime::new();
    let mut loader = ReadyLoader::ok(runtime);
    pollster::block_on(ctrl.initialize(&mut loader, surface())).unwrap();
    assert_eq!(ctrl.state(), state(ClipName::Reveal, true));
    assert_eq!(count(&first, &RuntimeCall::Dispose), 1);
    assert_eq!(count(&second, &RuntimeCall::Dispose), 0);
}

/// it should release the runtime when the controller is dropped
#[test]
fn drop_releases_runtime() {
    let (ctrl, log) = loaded_controller();
    drop(ctrl);
    assert_eq!(count(&log, &RuntimeCall::Dispose), 1);
}

/// it should re-centre on resize while subscribed
#[test]
fn resize_recentres_subject() {
    let (mut ctrl, log) = loaded_controller();
    ctrl.on_resize(chest_viewer_core::SurfaceSize::new(1200.0, 600.0));
    assert_eq!(count(&log, &RuntimeCall::SetPosition(600.0, 300.0)), 1);

    ctrl.teardown();
    ctrl.on_resize(chest_viewer_core::SurfaceSize::new(400.0, 600.0));
    assert_eq!(count(&log, &RuntimeCall::SetPosition(200.0, 300.0)), 0);
}

/// it should let the latest play call win within a turn
#[test]
fn latest_play_wins() {
    let (mut ctrl, _log) = loaded_controller();
    ctrl.dispatch(ViewerCommand::Play {
        clip: ClipName::Open,
    });
    ctrl.dispatch(ViewerCommand::Play {
        clip: ClipName::Reveal,
    });
    assert_eq!(ctrl.state(), state(ClipName::Reveal, true));
}

/// it should follow the mount → signal → chain → pause scenario
#[test]
fn end_to_end_scenario() {
    let (mut ctrl, _log) = loaded_controller();
    assert_eq!(ctrl.state(), state(ClipName::Reveal, true));

    assert!(ctrl.handle_signal(&PlaySignal::default()));
    assert_eq!(ctrl.state(), state(ClipName::Open, true));

    assert!(ctrl.on_clip_complete("open"));
    assert_eq!(ctrl.state(), state(ClipName::OpenIdle, true));

    assert!(ctrl.toggle_playback());
    assert_eq!(ctrl.state(), state(ClipName::OpenIdle, false));
}

/// it should ignore a late result from a mount abandoned by teardown
#[test]
fn stale_load_result_does_not_touch_fresh_mount() {
    let mut ctrl = TestController::with_audio(ViewerConfig::default(), Default::default());
    let first = ctrl.begin_initialize(surface()).unwrap();
    ctrl.teardown();
    let second = ctrl.begin_initialize(surface()).unwrap();
    assert_ne!(first.mount, second.mount);

    // the abandoned attempt fails late
    ctrl.complete_initialize(
        first.mount,
        Err(LoadError::Runtime {
            reason: "stale".to_string(),
        }),
    )
    .unwrap();
    assert_eq!(ctrl.phase(), ViewerPhase::Loading);

    let (runtime, log) = RecordingRuntime::new();
    ctrl.complete_initialize(second.mount, Ok(runtime)).unwrap();
    assert_eq!(ctrl.phase(), ViewerPhase::Loaded);
    assert_eq!(count(&log, &RuntimeCall::Dispose), 0);
    assert_eq!(ctrl.state(), state(ClipName::Reveal, true));
    assert!(!ctrl
        .drain_events()
        .iter()
        .any(|e| matches!(e, ViewerEvent::LoadFailed { .. })));
}

/// it should dispose a late runtime from an abandoned mount and keep the fresh one
#[test]
fn stale_runtime_is_disposed_after_remount() {
    let mut ctrl = TestController::with_audio(ViewerConfig::default(), Default::default());
    let first = ctrl.begin_initialize(surface()).unwrap();
    ctrl.teardown();
    let second = ctrl.begin_initialize(surface()).unwrap();

    let (fresh, fresh_log) = RecordingRuntime::new();
    ctrl.complete_initialize(second.mount, Ok(fresh)).unwrap();

    let (stale, stale_log) = RecordingRuntime::new();
    ctrl.complete_initialize(first.mount, Ok(stale)).unwrap();
    assert_eq!(*stale_log.borrow(), vec![RuntimeCall::Dispose]);
    assert_eq!(count(&fresh_log, &RuntimeCall::Dispose), 0);
    assert_eq!(ctrl.phase(), ViewerPhase::Loaded);
}

/// it should roll back a mount cancelled before its load started
#[test]
fn cancelled_mount_can_be_restarted() {
    let mut ctrl = TestController::with_audio(ViewerConfig::default(), Default::default());
    let request = ctrl.begin_initialize(surface()).unwrap();
    assert!(ctrl.cancel_initialize(request.mount));
    assert!(!ctrl.cancel_initialize(request.mount));
    assert_eq!(ctrl.phase(), ViewerPhase::Unmounted);
    assert_eq!(ctrl.subscriptions().active_count(), 0);
    assert!(ctrl.drain_events().is_empty());

    // a result for the cancelled attempt is only disposed
    let (late, late_log) = RecordingRuntime::new();
    ctrl.complete_initialize(request.mount, Ok(late)).unwrap();
    assert_eq!(*late_log.borrow(), vec![RuntimeCall::Dispose]);

    let (runtime, _log) = RecordingRuntime::new();
    let mut loader = ReadyLoader::ok(runtime);
    pollster::block_on(ctrl.initialize(&mut loader, surface())).unwrap();
    assert_eq!(ctrl.phase(), ViewerPhase::Loaded);
}

/// it should keep only the newest events when the host never drains
#[test]
fn undrained_events_stay_bounded() {
    let (mut ctrl, _log) = loaded_controller();
    for _ in 0..EVENT_BUFFER_CAPACITY {
        ctrl.toggle_playback();
        ctrl.toggle_playback();
    }
    ctrl.teardown();
    let events = ctrl.drain_events();
    assert_eq!(events.len(), EVENT_BUFFER_CAPACITY);
    assert_eq!(events.last(), Some(&ViewerEvent::TornDown));
}
