use super::*;
use crate::fixtures::ManualClock;

#[test]
fn resumed_clock_continues_from_saved_seconds() {
    let clock = ManualClock::new();
    let mut elapsed = ElapsedClock::resume(90, clock.now());
    assert_eq!(elapsed.elapsed(clock.now()), 90);

    clock.advance(Duration::from_secs(35));
    assert_eq!(elapsed.elapsed(clock.now()), 125);
}

#[test]
fn elapsed_never_decreases_across_reads() {
    let clock = ManualClock::new();
    clock.advance(Duration::from_secs(10));
    let later = clock.now();
    let mut elapsed = ElapsedClock::resume(0, later);

    clock.advance(Duration::from_secs(5));
    let first = elapsed.elapsed(clock.now());
    // An instant before the start must not pull the value back.
    let second = elapsed.elapsed(later - Duration::from_secs(3));
    let third = elapsed.elapsed(clock.now());

    assert_eq!(first, 5);
    assert!(second >= first);
    assert!(third >= second);
}

#[test]
fn freeze_captures_value_at_completion() {
    let clock = ManualClock::new();
    let mut elapsed = ElapsedClock::resume(0, clock.now());
    clock.advance(Duration::from_secs(42));

    assert_eq!(elapsed.freeze(clock.now()), 42);
    clock.advance(Duration::from_secs(600));
    assert_eq!(elapsed.elapsed(clock.now()), 42);
    assert!(elapsed.is_frozen());
}

#[test]
fn frozen_at_never_ticks() {
    let clock = ManualClock::new();
    let mut elapsed = ElapsedClock::frozen_at(300, clock.now());
    clock.advance(Duration::from_secs(20));
    assert_eq!(elapsed.elapsed(clock.now()), 300);
}
