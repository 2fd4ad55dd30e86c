//! Frame timing: a monotonic millisecond clock and the per-effect duration budget.
//!
//! Effects never touch `Instant` or `thread::sleep` directly. They go
//! through a [`Clock`], so the same frame loop runs against wall time on the
//! device and against a [`ManualClock`] in tests, where sleeping just
//! advances a counter.

use std::thread;
use std::time::{Duration, Instant};

/// Monotonic milliseconds plus a cooperative, blocking sleep.
pub trait Clock {
    /// Milliseconds since an arbitrary, fixed origin. Never decreases.
    fn now_ms(&self) -> u64;

    /// Block for `ms` milliseconds.
    fn sleep_ms(&mut self, ms: u64);
}

/// Wall-clock time via `Instant` and `thread::sleep`.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    fn sleep_ms(&mut self, ms: u64) {
        thread::sleep(Duration::from_millis(ms));
    }
}

/// A clock that only moves when slept on.
///
/// Rendering takes zero time on this clock, so an effect's elapsed time is
/// exactly the sum of its delays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ManualClock {
    now: u64,
    sleeps: u64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at `now` instead of zero.
    pub fn starting_at(now: u64) -> Self {
        Self { now, sleeps: 0 }
    }

    /// Move time forward without counting a sleep.
    pub fn advance(&mut self, ms: u64) {
        self.now += ms;
    }

    /// Number of `sleep_ms` calls so far.
    pub fn sleeps(&self) -> u64 {
        self.sleeps
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now
    }

    fn sleep_ms(&mut self, ms: u64) {
        self.now += ms;
        self.sleeps += 1;
    }
}

// ── FrameBudget ──────────────────────────────────────────────────────

/// The time an effect is allowed to run, measured from its entry.
///
/// Frame loops ask [`is_exhausted`](Self::is_exhausted) before each frame;
/// effects with long inner sequences also ask between steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameBudget {
    start_ms: u64,
    duration_ms: u64,
}

impl FrameBudget {
    pub fn start<C: Clock + ?Sized>(clock: &C, duration_ms: u64) -> Self {
        Self {
            start_ms: clock.now_ms(),
            duration_ms,
        }
    }

    pub fn elapsed_ms<C: Clock + ?Sized>(&self, clock: &C) -> u64 {
        clock.now_ms().saturating_sub(self.start_ms)
    }

    pub fn remaining_ms<C: Clock + ?Sized>(&self, clock: &C) -> u64 {
        self.duration_ms.saturating_sub(self.elapsed_ms(clock))
    }

    /// `true` once elapsed time reaches the duration.
    pub fn is_exhausted<C: Clock + ?Sized>(&self, clock: &C) -> bool {
        self.elapsed_ms(clock) >= self.duration_ms
    }

    /// Sleep one full frame delay, then report whether the budget is spent.
    pub fn step<C: Clock + ?Sized>(&self, clock: &mut C, delay_ms: u64) -> bool {
        clock.sleep_ms(delay_ms);
        self.is_exhausted(clock)
    }

    /// Sleep for `pause_ms`, cut short at the end of the budget, then report
    /// whether the budget is spent.
    pub fn pause<C: Clock + ?Sized>(&self, clock: &mut C, pause_ms: u64) -> bool {
        let ms = pause_ms.min(self.remaining_ms(clock));
        if ms > 0 {
            clock.sleep_ms(ms);
        }
        self.is_exhausted(clock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn manual_clock_advances_on_sleep() {
        let mut clock = ManualClock::new();
        clock.sleep_ms(30);
        clock.sleep_ms(20);
        assert_eq!(clock.now_ms(), 50);
        assert_eq!(clock.sleeps(), 2);

        clock.advance(5);
        assert_eq!(clock.now_ms(), 55);
        assert_eq!(clock.sleeps(), 2);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let mut clock = SystemClock::new();
        let before = clock.now_ms();
        clock.sleep_ms(2);
        assert!(clock.now_ms() >= before + 2);
    }

    #[rstest]
    #[case(0, 0, true)]
    #[case(0, 100, false)]
    #[case(99, 100, false)]
    #[case(100, 100, true)]
    #[case(250, 100, true)]
    fn budget_exhaustion(#[case] elapsed: u64, #[case] duration: u64, #[case] exhausted: bool) {
        let mut clock = ManualClock::starting_at(1_000);
        let budget = FrameBudget::start(&clock, duration);
        clock.advance(elapsed);
        assert_eq!(budget.is_exhausted(&clock), exhausted);
    }

    #[test]
    fn step_sleeps_the_full_delay() {
        let mut clock = ManualClock::new();
        let budget = FrameBudget::start(&clock, 50);
        assert!(!budget.step(&mut clock, 40));
        assert!(budget.step(&mut clock, 40));
        assert_eq!(clock.now_ms(), 80);
    }

    #[test]
    fn pause_is_cut_short_at_budget_end() {
        let mut clock = ManualClock::new();
        let budget = FrameBudget::start(&clock, 150);
        clock.advance(100);
        assert!(budget.pause(&mut clock, 200));
        assert_eq!(clock.now_ms(), 150);
        assert_eq!(budget.remaining_ms(&clock), 0);
    }

    #[test]
    fn pause_on_spent_budget_does_not_sleep() {
        let mut clock = ManualClock::new();
        let budget = FrameBudget::start(&clock, 10);
        clock.advance(10);
        assert!(budget.pause(&mut clock, 100));
        assert_eq!(clock.sleeps(), 0);
    }
}
