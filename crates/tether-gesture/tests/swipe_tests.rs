use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tether_core::{SwipeConfig, SwipeDirection};
use tether_gesture::{HapticPulse, Swipe, SwipeOutcome, SwipeState};
use tether_test_utils::RecordingHaptics;

struct Harness {
    swipe: Swipe<Arc<RecordingHaptics>>,
    haptics: Arc<RecordingHaptics>,
    completions: Arc<AtomicUsize>,
}

fn harness(config: SwipeConfig) -> Harness {
    let haptics = RecordingHaptics::new();
    let completions = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&completions);
    let swipe = Swipe::new(
        config,
        Arc::clone(&haptics),
        Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }),
    );
    Harness {
        swipe,
        haptics,
        completions,
    }
}

#[test]
fn test_horizontal_swipe_captures_scroll() {
    let h = harness(SwipeConfig::default());
    h.swipe.touch_start(300.0, 100.0);
    let outcome = h.swipe.touch_move(250.0, 104.0);

    assert!(outcome.suppress_scroll);
    let state = h.swipe.state();
    assert_eq!(state.offset, -50.0);
    assert_eq!(state.progress, 0.5);
    assert!(state.is_swiping);
}

#[test]
fn test_horizontal_lock_holds_through_vertical_drift() {
    let h = harness(SwipeConfig::default());
    h.swipe.touch_start(300.0, 100.0);
    assert!(h.swipe.touch_move(250.0, 104.0).suppress_scroll);

    let outcome = h.swipe.touch_move(240.0, 300.0);
    assert!(outcome.suppress_scroll);
    assert_eq!(h.swipe.state().offset, -60.0);

    let outcome = h.swipe.touch_move(230.0, 600.0);
    assert!(outcome.suppress_scroll);
    assert_eq!(h.swipe.state().offset, -70.0);
    assert!(h.swipe.state().is_swiping);
}

#[test]
fn test_opposite_direction_never_moves_offset() {
    let h = harness(SwipeConfig::default());
    h.swipe.touch_start(100.0, 100.0);
    h.swipe.touch_move(180.0, 100.0);
    assert_eq!(h.swipe.state().offset, 0.0);
    assert_eq!(h.swipe.state().progress, 0.0);

    h.swipe.touch_move(60.0, 100.0);
    assert_eq!(h.swipe.state().offset, -40.0);
    h.swipe.touch_move(400.0, 100.0);
    assert_eq!(h.swipe.state().offset, 0.0);
}

#[test]
fn test_right_swipe_counts_positive_delta_only() {
    let h = harness(SwipeConfig::default().with_direction(SwipeDirection::Right));
    h.swipe.touch_start(100.0, 100.0);
    h.swipe.touch_move(20.0, 100.0);
    assert_eq!(h.swipe.state().offset, 0.0);

    h.swipe.touch_move(180.0, 100.0);
    assert_eq!(h.swipe.state().offset, 80.0);
}

#[test]
fn test_progress_is_one_exactly_at_threshold() {
    let h = harness(SwipeConfig::default());
    h.swipe.touch_start(500.0, 0.0);

    h.swipe.touch_move(401.0, 0.0);
    assert!(h.swipe.state().progress < 1.0);

    h.swipe.touch_move(400.0, 0.0);
    assert_eq!(h.swipe.state().progress, 1.0);
}

#[test]
fn test_completion_fires_exactly_once() {
    let h = harness(SwipeConfig::default());
    h.swipe.touch_start(500.0, 0.0);
    h.swipe.touch_move(300.0, 0.0);

    assert_eq!(h.swipe.touch_end(), SwipeOutcome::Completed(SwipeDirection::Left));
    assert_eq!(h.swipe.touch_end(), SwipeOutcome::Ignored);

    assert_eq!(h.completions.load(Ordering::SeqCst), 1);
    assert_eq!(h.haptics.pulses(), vec![HapticPulse::Medium]);
    assert_eq!(h.swipe.state(), SwipeState::ZERO);
}

#[test]
fn test_short_swipe_is_cancelled() {
    let h = harness(SwipeConfig::default());
    h.swipe.touch_start(500.0, 0.0);
    h.swipe.touch_move(420.0, 0.0);

    assert_eq!(h.swipe.touch_end(), SwipeOutcome::Cancelled);
    assert_eq!(h.completions.load(Ordering::SeqCst), 0);
    assert_eq!(h.haptics.count(), 0);
    assert_eq!(h.swipe.state(), SwipeState::ZERO);
}

#[test]
fn test_vertical_scroll_never_completes() {
    let h = harness(SwipeConfig::default());
    h.swipe.touch_start(500.0, 0.0);
    assert!(!h.swipe.touch_move(495.0, 30.0).suppress_scroll);
    assert!(!h.swipe.touch_move(0.0, 40.0).suppress_scroll);

    assert_eq!(h.swipe.touch_end(), SwipeOutcome::Cancelled);
    assert_eq!(h.completions.load(Ordering::SeqCst), 0);
}

#[test]
fn test_disabling_resets_and_ignores_input() {
    let h = harness(SwipeConfig::default());
    h.swipe.touch_start(500.0, 0.0);
    h.swipe.touch_move(300.0, 0.0);

    h.swipe.set_enabled(false);
    assert_eq!(h.swipe.state(), SwipeState::ZERO);
    assert!(!h.swipe.is_enabled());

    h.swipe.touch_start(500.0, 0.0);
    assert!(!h.swipe.touch_move(100.0, 0.0).suppress_scroll);
    assert_eq!(h.swipe.touch_end(), SwipeOutcome::Ignored);
    assert_eq!(h.swipe.state(), SwipeState::ZERO);
    assert_eq!(h.completions.load(Ordering::SeqCst), 0);
}

#[test]
fn test_every_sequence_starts_from_zero() {
    let h = harness(SwipeConfig::default());
    let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let _sub = h.swipe.subscribe(move |s| sink.lock().push(*s));

    h.swipe.touch_start(500.0, 0.0);
    h.swipe.touch_move(450.0, 0.0);
    h.swipe.touch_cancel();

    let seen = seen.lock();
    assert_eq!(seen.first(), Some(&SwipeState::ZERO));
    assert_eq!(seen.last(), Some(&SwipeState::ZERO));
}
