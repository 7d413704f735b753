use std::sync::Arc;

use rigmix_motion_core::{
    EntryState, MapModel, Motion, MotionQueueManager, MotionTimings, ParamId, ParameterModel,
};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

/// Minimal motion for the exclusive channel: holds one parameter at a
/// constant target value, weighted by the entry's fade weight.
#[derive(Debug)]
struct HoldMotion {
    fade_in: f32,
    fade_out: f32,
    duration: Option<f32>,
    param: ParamId,
    target: f32,
}

impl HoldMotion {
    fn new(fade_in: f32, fade_out: f32) -> Arc<Self> {
        Arc::new(Self {
            fade_in,
            fade_out,
            duration: None,
            param: ParamId(0),
            target: 1.0,
        })
    }

    fn with_duration(fade_in: f32, fade_out: f32, duration: f32) -> Arc<Self> {
        Arc::new(Self {
            fade_in,
            fade_out,
            duration: Some(duration),
            param: ParamId(0),
            target: 1.0,
        })
    }
}

impl MotionTimings for HoldMotion {
    fn fade_in_seconds(&self) -> f32 {
        self.fade_in
    }

    fn fade_out_seconds(&self) -> f32 {
        self.fade_out
    }

    fn duration_seconds(&self) -> Option<f32> {
        self.duration
    }
}

impl Motion for HoldMotion {
    fn apply(&self, model: &mut dyn ParameterModel, _time: f32, weight: f32) {
        model.blend_parameter_value(self.param, self.target, weight);
    }
}

/// it should force a preempted entry into FadeOut with end = now + fade_out
#[test]
fn crossfade_preemption_schedules_fadeout() {
    let mut mgr = MotionQueueManager::<HoldMotion>::new();
    let mut model = MapModel::new();

    let a = mgr.start_motion(HoldMotion::new(0.5, 0.5));
    assert!(mgr.update(&mut model, 0.0)); // A starts at t=0
    assert!(mgr.update(&mut model, 0.2));

    let b = mgr.start_motion(HoldMotion::new(0.5, 0.5));
    assert!(mgr.update(&mut model, 0.0)); // B preempts at t=0.2

    let entry_a = mgr.entry(a).expect("A still queued");
    assert_eq!(entry_a.state(), EntryState::FadeOut);
    approx(entry_a.end_time(), 0.7, 1e-6);

    // At exactly t=0.7 the end has not strictly passed yet.
    assert!(mgr.update(&mut model, 0.5));
    assert!(mgr.entry(a).is_some());

    // Past t=0.7 A is gone and only B remains.
    assert!(mgr.update(&mut model, 0.1));
    assert!(mgr.entry(a).is_none());
    assert!(mgr.is_finished_by_handle(a));
    assert_eq!(mgr.entries().len(), 1);
    assert_eq!(mgr.entries()[0].handle(), b);
}

/// it should drive every previously-active entry into FadeOut within one update
#[test]
fn new_start_fades_out_all_older_entries() {
    let mut mgr = MotionQueueManager::<HoldMotion>::new();
    let mut model = MapModel::new();

    mgr.start_motion(HoldMotion::new(0.3, 0.3));
    mgr.update(&mut model, 0.1);
    mgr.start_motion(HoldMotion::new(0.3, 0.3));
    mgr.update(&mut model, 0.1);
    mgr.start_motion(HoldMotion::new(0.3, 0.3));
    mgr.update(&mut model, 0.1);

    let entries = mgr.entries();
    assert_eq!(entries.len(), 3);
    for older in &entries[..2] {
        assert_eq!(older.state(), EntryState::FadeOut);
    }
    assert_ne!(entries[2].state(), EntryState::FadeOut);
}

/// it should start a never-updated entry before fading it out, keeping timing sane
#[test]
fn preempted_init_entry_starts_then_fades() {
    let mut mgr = MotionQueueManager::<HoldMotion>::new();
    let mut model = MapModel::new();

    // Two starts land between the same pair of updates.
    let a = mgr.start_motion(HoldMotion::new(0.5, 0.5));
    let b = mgr.start_motion(HoldMotion::new(0.5, 0.5));
    mgr.update(&mut model, 0.25);

    let entry_a = mgr.entry(a).unwrap();
    assert_eq!(entry_a.state(), EntryState::FadeOut);
    approx(entry_a.start_time(), 0.25, 1e-6);
    // Fresh start means zero fade-in weight: it contributes nothing.
    approx(entry_a.fade_weight(mgr.total_seconds()), 0.0, 1e-6);
    assert_eq!(mgr.entry(b).unwrap().state(), EntryState::FadeIn);
}

/// it should keep fade weights within [0,1] across a dense time sweep
#[test]
fn fade_weight_bounds_over_sweep() {
    let mut mgr = MotionQueueManager::<HoldMotion>::new();
    let mut model = MapModel::new();

    mgr.start_motion(HoldMotion::with_duration(0.3, 0.4, 1.0));
    mgr.update(&mut model, 0.0);
    mgr.start_motion(HoldMotion::new(0.2, 0.2));

    for _ in 0..200 {
        mgr.update(&mut model, 0.01);
        for entry in mgr.entries() {
            let w = entry.fade_weight(mgr.total_seconds());
            assert!((0.0..=1.0).contains(&w));
        }
    }
}

/// it should reach Playing once the fade-in window has fully elapsed
#[test]
fn entry_reaches_playing_after_fade_in() {
    let mut mgr = MotionQueueManager::<HoldMotion>::new();
    let mut model = MapModel::new();

    let a = mgr.start_motion(HoldMotion::new(0.5, 0.5));
    mgr.update(&mut model, 0.0);
    assert_eq!(mgr.entry(a).unwrap().state(), EntryState::FadeIn);
    mgr.update(&mut model, 0.25);
    assert_eq!(mgr.entry(a).unwrap().state(), EntryState::FadeIn);
    mgr.update(&mut model, 0.25);
    assert_eq!(mgr.entry(a).unwrap().state(), EntryState::Playing);
}

/// it should treat negative fades as instantaneous full weight
#[test]
fn negative_fade_is_instantaneous() {
    let mut mgr = MotionQueueManager::<HoldMotion>::new();
    let mut model = MapModel::new();

    let a = mgr.start_motion(HoldMotion::new(-1.0, -1.0));
    mgr.update(&mut model, 0.1);
    let entry = mgr.entry(a).unwrap();
    assert_eq!(entry.state(), EntryState::Playing);
    approx(entry.fade_weight(mgr.total_seconds()), 1.0, 1e-6);
    // Full weight means the hold value lands exactly.
    approx(model.parameter_value(ParamId(0)), 1.0, 1e-6);
}

/// it should stop synchronously with no residual writes on the next frame
#[test]
fn stop_all_is_synchronous_hard_cut() {
    let mut mgr = MotionQueueManager::<HoldMotion>::new();
    let mut model = MapModel::new();

    mgr.start_motion(HoldMotion::new(-1.0, 0.5));
    mgr.update(&mut model, 0.1);
    assert!(!mgr.is_finished());

    mgr.stop_all_motions();
    assert!(mgr.is_finished());
    assert_eq!(mgr.entries().len(), 0);

    model.set_parameter_value(ParamId(0), 123.0);
    assert!(!mgr.update(&mut model, 0.1));
    approx(model.parameter_value(ParamId(0)), 123.0, 0.0);
}

/// it should apply the reserve/current priority gate exactly
#[test]
fn reserve_motion_priority_rules() {
    let mut mgr = MotionQueueManager::<HoldMotion>::new();
    let mut model = MapModel::new();

    assert!(mgr.reserve_motion(2));
    assert_eq!(mgr.reserve_priority(), 2);
    // Not strictly greater than the reservation: rejected.
    assert!(!mgr.reserve_motion(2));
    assert!(!mgr.reserve_motion(1));
    assert!(mgr.reserve_motion(3));
    assert_eq!(mgr.reserve_priority(), 3);

    // Starting at the reserved priority consumes the reservation.
    mgr.start_motion_with_priority(HoldMotion::with_duration(-1.0, -1.0, 0.2), 3);
    assert_eq!(mgr.reserve_priority(), 0);
    assert_eq!(mgr.current_priority(), 3);

    // Not strictly greater than the playing priority: rejected.
    assert!(!mgr.reserve_motion(3));
    assert!(mgr.reserve_motion(4));
    mgr.set_reserve_priority(0);
    assert_eq!(mgr.reserve_priority(), 0);

    // Draining the queue releases the playback priority.
    mgr.update(&mut model, 0.1);
    mgr.update(&mut model, 0.25);
    assert!(mgr.is_finished());
    assert_eq!(mgr.current_priority(), 0);
    assert!(mgr.reserve_motion(1));
}

/// it should report queue presence from before the cleanup sweep
#[test]
fn update_reports_presence_before_sweep() {
    let mut mgr = MotionQueueManager::<HoldMotion>::new();
    let mut model = MapModel::new();

    assert!(!mgr.update(&mut model, 0.1));

    mgr.start_motion(HoldMotion::with_duration(-1.0, -1.0, 0.1));
    assert!(mgr.update(&mut model, 0.0));
    assert!(mgr.update(&mut model, 0.05));
    // This frame retires the entry, but it was present before the sweep.
    assert!(mgr.update(&mut model, 0.1));
    assert!(mgr.is_finished());
    assert!(!mgr.update(&mut model, 0.1));
}

/// it should carry the loop fade-in flag per entry
#[test]
fn loop_fade_in_flag_round_trips() {
    let mut mgr = MotionQueueManager::<HoldMotion>::new();
    let mut model = MapModel::new();

    let a = mgr.start_motion(HoldMotion::new(0.5, 0.5));
    mgr.update(&mut model, 0.0);
    assert!(!mgr.entry(a).unwrap().loop_fade_in());
    assert!(mgr.set_loop_fade_in(a, true));
    assert!(mgr.entry(a).unwrap().loop_fade_in());

    mgr.stop_all_motions();
    assert!(!mgr.set_loop_fade_in(a, false));
}

/// it should produce identical model state for the same dt sequence
#[test]
fn determinism_same_sequence_same_state() {
    let run = || {
        let mut mgr = MotionQueueManager::<HoldMotion>::new();
        let mut model = MapModel::new();
        mgr.start_motion(HoldMotion::new(0.4, 0.3));
        for dt in [0.016, 0.016, 0.032, 0.0, 0.1] {
            mgr.update(&mut model, dt);
        }
        mgr.start_motion(HoldMotion::new(0.2, 0.2));
        for dt in [0.016, 0.05, 0.25] {
            mgr.update(&mut model, dt);
        }
        model.parameter_value(ParamId(0))
    };
    assert_eq!(run(), run());
}
