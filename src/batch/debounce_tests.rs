//! Tests for `DebouncePolicy` and `DebounceWindow`.

use super::debounce::{DebouncePolicy, DebounceWindow, Decision};
use crate::time::TimerHandle;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::Instant;

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn window(delay: u64, max_wait: u64) -> DebounceWindow {
    DebounceWindow::new(DebouncePolicy::new(ms(delay), ms(max_wait)))
}

fn armed_after(decision: Decision) -> Duration {
    match decision {
        Decision::Arm { after, .. } => after,
        Decision::FireNow => panic!("expected the window to arm a timer"),
    }
}

fn generation_of(decision: Decision) -> u64 {
    match decision {
        Decision::Arm { generation, .. } => generation,
        Decision::FireNow => panic!("expected the window to arm a timer"),
    }
}

/// Timer handle that counts how often it was cancelled.
fn counting_handle(cancels: &Arc<AtomicUsize>) -> TimerHandle {
    let cancels = Arc::clone(cancels);
    TimerHandle::new(move || {
        cancels.fetch_add(1, Ordering::SeqCst);
    })
}

mod policy {
    use super::*;

    #[test]
    fn default_policy_uses_documented_values() {
        let policy = DebouncePolicy::default();

        assert_eq!(policy.delay(), ms(50));
        assert_eq!(policy.max_wait(), ms(250));
    }

    #[test]
    fn new_creates_with_specified_values() {
        let policy = DebouncePolicy::new(ms(10), ms(25));

        assert_eq!(policy.delay(), ms(10));
        assert_eq!(policy.max_wait(), ms(25));
    }

    #[test]
    fn equality_based_on_both_durations() {
        assert_eq!(
            DebouncePolicy::new(ms(1), ms(2)),
            DebouncePolicy::new(ms(1), ms(2))
        );
        assert_ne!(
            DebouncePolicy::new(ms(1), ms(2)),
            DebouncePolicy::new(ms(1), ms(3))
        );
    }
}

mod request {
    use super::*;

    #[test]
    fn first_request_opens_window_and_arms_delay() {
        let mut window = window(10, 25);
        let now = Instant::now();

        assert!(window.is_idle());
        assert_eq!(armed_after(window.request(now)), ms(10));
        assert_eq!(window.started_at(), Some(now));
    }

    #[test]
    fn later_request_restarts_quiet_period() {
        let mut window = window(10, 25);
        let start = Instant::now();
        window.request(start);

        let decision = window.request(start + ms(5));

        assert_eq!(armed_after(decision), ms(10));
        assert_eq!(window.started_at(), Some(start));
    }

    #[test]
    fn rearm_never_runs_past_the_ceiling() {
        let mut window = window(10, 25);
        let start = Instant::now();
        window.request(start);

        assert_eq!(armed_after(window.request(start + ms(16))), ms(9));
        assert_eq!(armed_after(window.request(start + ms(24))), ms(1));
    }

    #[test]
    fn request_at_the_ceiling_fires_now_and_resets() {
        let mut window = window(10, 25);
        let start = Instant::now();
        window.request(start);

        assert_eq!(window.request(start + ms(25)), Decision::FireNow);
        assert!(window.is_idle());
        assert_eq!(window.started_at(), None);
    }

    #[test]
    fn request_after_ceiling_fire_opens_a_new_window() {
        let mut window = window(10, 25);
        let start = Instant::now();
        window.request(start);
        window.request(start + ms(30));

        let later = start + ms(31);
        assert_eq!(armed_after(window.request(later)), ms(10));
        assert_eq!(window.started_at(), Some(later));
    }

    #[test]
    fn max_wait_shorter_than_delay_arms_the_ceiling() {
        let mut window = window(50, 20);
        let start = Instant::now();

        assert_eq!(armed_after(window.request(start)), ms(20));
        assert_eq!(armed_after(window.request(start + ms(5))), ms(15));
        assert_eq!(window.request(start + ms(20)), Decision::FireNow);
    }

    #[test]
    fn zero_max_wait_fires_on_second_request() {
        let mut window = window(10, 0);
        let start = Instant::now();

        assert_eq!(armed_after(window.request(start)), Duration::ZERO);
        assert_eq!(window.request(start), Decision::FireNow);
    }

    #[test]
    fn every_arm_gets_a_new_generation() {
        let mut window = window(10, 25);
        let start = Instant::now();

        let first = generation_of(window.request(start));
        let second = generation_of(window.request(start + ms(1)));

        assert_ne!(first, second);
    }
}

mod timers {
    use super::*;

    #[test]
    fn new_request_cancels_attached_timer() {
        let cancels = Arc::new(AtomicUsize::new(0));
        let mut window = window(10, 25);
        let start = Instant::now();

        let generation = generation_of(window.request(start));
        window.attach(generation, counting_handle(&cancels));
        window.request(start + ms(2));

        assert_eq!(cancels.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn ceiling_fire_cancels_attached_timer() {
        let cancels = Arc::new(AtomicUsize::new(0));
        let mut window = window(10, 25);
        let start = Instant::now();

        let generation = generation_of(window.request(start));
        window.attach(generation, counting_handle(&cancels));
        window.request(start + ms(25));

        assert_eq!(cancels.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn attaching_stale_generation_cancels_the_handle() {
        let cancels = Arc::new(AtomicUsize::new(0));
        let mut window = window(10, 25);
        let start = Instant::now();

        let stale = generation_of(window.request(start));
        window.request(start + ms(1));
        window.attach(stale, counting_handle(&cancels));

        assert_eq!(cancels.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn expire_with_current_generation_closes_window() {
        let mut window = window(10, 25);
        let generation = generation_of(window.request(Instant::now()));

        assert!(window.expire(generation));
        assert!(window.is_idle());
    }

    #[test]
    fn expire_with_superseded_generation_is_ignored() {
        let mut window = window(10, 25);
        let start = Instant::now();
        let stale = generation_of(window.request(start));
        window.request(start + ms(3));

        assert!(!window.expire(stale));
        assert!(!window.is_idle());
    }

    #[test]
    fn expire_after_ceiling_fire_is_ignored() {
        let mut window = window(10, 25);
        let start = Instant::now();
        let generation = generation_of(window.request(start));
        window.request(start + ms(25));

        assert!(!window.expire(generation));
    }

    #[test]
    fn expire_does_not_cancel_the_firing_timer() {
        let cancels = Arc::new(AtomicUsize::new(0));
        let mut window = window(10, 25);
        let generation = generation_of(window.request(Instant::now()));
        window.attach(generation, counting_handle(&cancels));

        window.expire(generation);

        assert_eq!(cancels.load(Ordering::SeqCst), 0);
    }
}
