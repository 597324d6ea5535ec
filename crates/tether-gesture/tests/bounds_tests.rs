use proptest::prelude::*;
use std::sync::Arc;
use tether_core::{action, PullToRefreshConfig, SwipeConfig, SwipeDirection};
use tether_gesture::{progress, pull::pull_distance, NoHaptics, PullToRefresh, Swipe};

fn direction() -> impl Strategy<Value = SwipeDirection> {
    prop_oneof![Just(SwipeDirection::Left), Just(SwipeDirection::Right)]
}

proptest! {
    #[test]
    fn prop_pull_state_stays_in_bounds(
        start in 0.0f64..800.0,
        moves in prop::collection::vec(-400.0f64..1200.0, 1..20),
    ) {
        let config = PullToRefreshConfig::default();
        let pull = PullToRefresh::new(config, NoHaptics, action(|| async { Ok(()) }));
        pull.touch_start(start, 0.0);

        for y in moves {
            pull.touch_move(y);
            let state = pull.state();
            prop_assert!(state.distance >= 0.0 && state.distance <= config.max_pull);
            prop_assert!((0.0..=1.0).contains(&state.progress));
            prop_assert_eq!(state.progress == 1.0, state.distance >= config.threshold);
            prop_assert_eq!(state.is_pulling, y > start);
        }
    }

    #[test]
    fn prop_swipe_offset_follows_direction(
        direction in direction(),
        moves in prop::collection::vec((-600.0f64..600.0, -30.0f64..30.0), 1..20),
    ) {
        let config = SwipeConfig::default().with_direction(direction);
        let swipe = Swipe::new(config, NoHaptics, Arc::new(|| {}));
        swipe.touch_start(0.0, 0.0);

        for (x, y) in moves {
            swipe.touch_move(x, y);
            let state = swipe.state();
            prop_assert!(state.offset.abs() <= config.max_offset());
            match direction {
                SwipeDirection::Left => {
                    prop_assert!(state.offset <= 0.0);
                }
                SwipeDirection::Right => {
                    prop_assert!(state.offset >= 0.0);
                }
            }
            prop_assert_eq!(state.progress == 1.0, state.offset.abs() >= config.threshold);
        }
    }

    #[test]
    fn prop_progress_is_clamped(value in -1e6f64..1e6, threshold in 1.0f64..500.0) {
        let p = progress(value, threshold);
        prop_assert!((0.0..=1.0).contains(&p));
        prop_assert_eq!(p == 1.0, value.abs() >= threshold);
    }

    #[test]
    fn prop_distance_is_monotonic(a in 0.0f64..1000.0, b in 0.0f64..1000.0) {
        let config = PullToRefreshConfig::default();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(pull_distance(&config, lo) <= pull_distance(&config, hi));
    }
}
