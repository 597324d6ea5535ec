use std::sync::Arc;
use std::time::Duration;
use tether_core::PullToRefreshConfig;
use tether_gesture::{HapticPulse, PullOutcome, PullState, PullToRefresh, RefreshAction};
use tether_test_utils::{
    gated_refresh, rejecting_refresh, resolving_refresh, CallCounter, RecordingHaptics,
};
use tokio::sync::Notify;

fn recognizer(
    config: PullToRefreshConfig,
    on_refresh: RefreshAction,
) -> (PullToRefresh<Arc<RecordingHaptics>>, Arc<RecordingHaptics>) {
    let haptics = RecordingHaptics::new();
    (PullToRefresh::new(config, Arc::clone(&haptics), on_refresh), haptics)
}

fn unit_resistance() -> PullToRefreshConfig {
    PullToRefreshConfig::default().with_resistance(1.0)
}

#[test]
fn test_distance_follows_resistance() {
    let counter = CallCounter::new();
    let (pull, _) = recognizer(unit_resistance(), resolving_refresh(&counter));
    pull.touch_start(100.0, 0.0);
    pull.touch_move(150.0);
    assert_eq!(pull.state().distance, 50.0);

    let (pull, _) = recognizer(
        PullToRefreshConfig::default().with_resistance(2.0),
        resolving_refresh(&counter),
    );
    pull.touch_start(100.0, 0.0);
    pull.touch_move(200.0);
    assert_eq!(pull.state().distance, 50.0);
}

#[test]
fn test_distance_is_capped() {
    let counter = CallCounter::new();
    let (pull, _) = recognizer(unit_resistance().with_max_pull(100.0), resolving_refresh(&counter));
    pull.touch_start(0.0, 0.0);
    pull.touch_move(250.0);
    assert_eq!(pull.state().distance, 100.0);
}

#[test]
fn test_progress_is_fraction_of_threshold() {
    let counter = CallCounter::new();
    let (pull, _) = recognizer(unit_resistance(), resolving_refresh(&counter));
    pull.touch_start(0.0, 0.0);
    let outcome = pull.touch_move(40.0);

    let state = pull.state();
    assert_eq!(state.progress, 0.5);
    assert!(state.is_pulling);
    assert!(outcome.suppress_scroll);
}

#[test]
fn test_progress_never_exceeds_one() {
    let counter = CallCounter::new();
    let (pull, _) = recognizer(unit_resistance().with_max_pull(200.0), resolving_refresh(&counter));
    pull.touch_start(0.0, 0.0);
    pull.touch_move(200.0);
    assert_eq!(pull.state().distance, 200.0);
    assert_eq!(pull.state().progress, 1.0);
}

#[test]
fn test_upward_movement_resets_in_one_update() {
    let counter = CallCounter::new();
    let (pull, _) = recognizer(unit_resistance(), resolving_refresh(&counter));

    let updates = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let sink = Arc::clone(&updates);
    let _sub = pull.subscribe(move |s| sink.lock().push(*s));

    pull.touch_start(100.0, 0.0);
    pull.touch_move(160.0);
    let outcome = pull.touch_move(90.0);

    assert!(!outcome.suppress_scroll);
    assert_eq!(updates.lock().last(), Some(&PullState::ZERO));
    assert_eq!(pull.state(), PullState::ZERO);
}

#[test]
fn test_pull_away_from_top_is_ignored() {
    let counter = CallCounter::new();
    let (pull, _) = recognizer(unit_resistance(), resolving_refresh(&counter));
    pull.touch_start(0.0, 35.0);
    let outcome = pull.touch_move(120.0);

    assert!(!outcome.suppress_scroll);
    assert_eq!(pull.state(), PullState::ZERO);
}

#[tokio::test]
async fn test_release_past_threshold_refreshes_once() {
    let counter = CallCounter::new();
    let (pull, haptics) = recognizer(PullToRefreshConfig::default(), resolving_refresh(&counter));
    pull.touch_start(0.0, 0.0);
    pull.touch_move(250.0);

    assert_eq!(pull.touch_end().await, PullOutcome::Refreshed);
    assert_eq!(counter.get(), 1);
    assert_eq!(haptics.pulses(), vec![HapticPulse::Light]);
    assert_eq!(pull.state(), PullState::ZERO);
}

#[tokio::test]
async fn test_release_below_threshold_does_nothing() {
    let counter = CallCounter::new();
    let (pull, haptics) = recognizer(PullToRefreshConfig::default(), resolving_refresh(&counter));
    pull.touch_start(0.0, 0.0);
    pull.touch_move(150.0);

    assert_eq!(pull.touch_end().await, PullOutcome::Released);
    assert_eq!(counter.get(), 0);
    assert_eq!(haptics.count(), 0);
    assert_eq!(pull.state(), PullState::ZERO);
}

#[tokio::test]
async fn test_rejected_refresh_still_resets() {
    let counter = CallCounter::new();
    let (pull, _) = recognizer(PullToRefreshConfig::default(), rejecting_refresh(&counter));
    pull.touch_start(0.0, 0.0);
    pull.touch_move(300.0);

    let outcome = pull.touch_end().await;
    assert_eq!(outcome, PullOutcome::RefreshFailed("feed unavailable".into()));
    assert_eq!(counter.get(), 1);
    assert_eq!(pull.state(), PullState::ZERO);
}

#[tokio::test]
async fn test_input_is_ignored_while_refreshing() {
    let counter = CallCounter::new();
    let gate = Arc::new(Notify::new());
    let (pull, _) = recognizer(
        PullToRefreshConfig::default(),
        gated_refresh(&counter, Arc::clone(&gate)),
    );
    let pull = Arc::new(pull);
    pull.touch_start(0.0, 0.0);
    pull.touch_move(300.0);

    let refreshing = tokio::spawn({
        let pull = Arc::clone(&pull);
        async move { pull.touch_end().await }
    });
    tokio::task::yield_now().await;

    let pinned = pull.state();
    assert!(pinned.is_refreshing);
    assert_eq!(pinned.distance, 80.0);
    assert_eq!(pinned.progress, 1.0);

    pull.touch_start(0.0, 0.0);
    assert!(!pull.touch_move(300.0).suppress_scroll);
    assert_eq!(pull.touch_end().await, PullOutcome::Ignored);
    assert_eq!(pull.state(), pinned);

    gate.notify_one();
    assert_eq!(refreshing.await.unwrap(), PullOutcome::Refreshed);
    assert_eq!(counter.get(), 1);
    assert_eq!(pull.state(), PullState::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_abandoned_refresh_still_resets() {
    let counter = CallCounter::new();
    let gate = Arc::new(Notify::new());
    let (pull, _) = recognizer(
        PullToRefreshConfig::default(),
        gated_refresh(&counter, Arc::clone(&gate)),
    );
    pull.touch_start(0.0, 0.0);
    pull.touch_move(300.0);

    let abandoned = tokio::time::timeout(Duration::from_secs(5), pull.touch_end()).await;
    assert!(abandoned.is_err());
    assert_eq!(pull.state(), PullState::ZERO);

    gate.notify_one();
    pull.touch_start(0.0, 0.0);
    assert!(pull.touch_move(300.0).suppress_scroll);
    assert_eq!(pull.touch_end().await, PullOutcome::Refreshed);
    assert_eq!(counter.get(), 2);
}

#[test]
fn test_non_finite_move_resets() {
    let counter = CallCounter::new();
    let (pull, _) = recognizer(unit_resistance(), resolving_refresh(&counter));
    pull.touch_start(0.0, 0.0);
    pull.touch_move(50.0);

    let outcome = pull.touch_move(f64::NAN);
    assert!(!outcome.suppress_scroll);
    assert_eq!(pull.state(), PullState::ZERO);
}

#[tokio::test]
async fn test_disabling_resets_and_ignores_input() {
    let counter = CallCounter::new();
    let (pull, _) = recognizer(PullToRefreshConfig::default(), resolving_refresh(&counter));
    pull.touch_start(0.0, 0.0);
    pull.touch_move(150.0);

    pull.set_enabled(false);
    assert_eq!(pull.state(), PullState::ZERO);

    pull.touch_start(0.0, 0.0);
    pull.touch_move(300.0);
    assert_eq!(pull.touch_end().await, PullOutcome::Ignored);
    assert_eq!(pull.state(), PullState::ZERO);
    assert_eq!(counter.get(), 0);

    pull.set_enabled(true);
    pull.touch_start(0.0, 0.0);
    pull.touch_move(300.0);
    assert_eq!(pull.touch_end().await, PullOutcome::Refreshed);
}

#[test]
fn test_cancel_resets_state() {
    let counter = CallCounter::new();
    let (pull, _) = recognizer(PullToRefreshConfig::default(), resolving_refresh(&counter));
    pull.touch_start(0.0, 0.0);
    pull.touch_move(150.0);
    pull.touch_cancel();
    assert_eq!(pull.state(), PullState::ZERO);
}
