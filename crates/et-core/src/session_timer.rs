//! Per-document editing stopwatch.
//!
//! A [`SessionTimer`] splits time since the last save into two parts:
//!
//! - the *confirmed boundary*: the clock reading at the last change that was
//!   accepted as active editing, not yet folded into the session total
//! - the *session total*: active time already committed for this save
//!   session
//!
//! Ordinary changes only move the boundary. When the gap since the boundary
//! exceeds the idle threshold the caller decides whether the gap counts
//! ([`SessionTimer::resolve_idle_as_active`]) or not
//! ([`SessionTimer::resolve_idle_as_excluded`]). A save folds both parts into
//! the cumulative total via [`SessionTimer::checkpoint`].

use std::time::Duration;

use crate::clock::Clock;

/// Converts a persisted seconds value into a [`Duration`].
///
/// Negative, NaN and infinite values become zero; values too large for a
/// `Duration` saturate.
pub fn duration_from_seconds(seconds: f64) -> Duration {
    if !seconds.is_finite() || seconds <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
}

/// Editing-time state machine for a single document.
#[derive(Debug)]
pub struct SessionTimer<C: Clock> {
    clock: C,
    cumulative_elapsed: Duration,
    session_accumulated: Duration,
    last_confirmed_idle_gap: Duration,
    clock_start: Duration,
    /// Clock reading at which the timer was stopped. `Some` is terminal.
    stopped_at: Option<Duration>,
}

impl<C: Clock> SessionTimer<C> {
    /// Creates a running timer seeded with a previously persisted total.
    pub fn new(clock: C, initial_elapsed: Duration) -> Self {
        let clock_start = clock.now();
        Self {
            clock,
            cumulative_elapsed: initial_elapsed,
            session_accumulated: Duration::ZERO,
            last_confirmed_idle_gap: Duration::ZERO,
            clock_start,
            stopped_at: None,
        }
    }

    /// Creates a running timer seeded with a total stored as seconds.
    pub fn from_seconds(clock: C, initial_elapsed_seconds: f64) -> Self {
        Self::new(clock, duration_from_seconds(initial_elapsed_seconds))
    }

    /// Time on the clock since it was last (re)started.
    fn clock_reading(&self) -> Duration {
        let now = self.stopped_at.unwrap_or_else(|| self.clock.now());
        now.saturating_sub(self.clock_start)
    }

    fn restart_clock(&mut self) {
        self.clock_start = self.clock.now();
    }

    /// Returns `true` after [`Self::stop`], logging the rejected operation.
    fn rejects(&self, operation: &str) -> bool {
        if self.stopped_at.is_some() {
            tracing::warn!(operation, "ignoring operation on stopped timer");
            return true;
        }
        false
    }

    /// Marks the current clock reading as the confirmed active boundary.
    ///
    /// Call only after [`Self::is_idle_exceeded`] returned `false`; an idle
    /// gap needs one of the `resolve_idle_*` transitions instead.
    pub fn record_activity(&mut self) {
        if self.rejects("record_activity") {
            return;
        }
        self.last_confirmed_idle_gap = self.clock_reading();
    }

    /// Whether the time since the last confirmed activity exceeds `threshold`.
    pub fn is_idle_exceeded(&self, threshold: Duration) -> bool {
        self.time_since_last_activity() > threshold
    }

    /// Time since the last confirmed activity.
    pub fn time_since_last_activity(&self) -> Duration {
        self.clock_reading()
            .saturating_sub(self.last_confirmed_idle_gap)
    }

    /// Counts an idle gap as editing time.
    pub fn resolve_idle_as_active(&mut self) {
        if self.rejects("resolve_idle_as_active") {
            return;
        }
        self.last_confirmed_idle_gap = self.clock_reading();
    }

    /// Drops an idle gap.
    ///
    /// Time up to the last confirmed activity is kept in the session total;
    /// everything after it, up to now, is discarded.
    pub fn resolve_idle_as_excluded(&mut self) {
        if self.rejects("resolve_idle_as_excluded") {
            return;
        }
        self.session_accumulated += self.last_confirmed_idle_gap;
        self.last_confirmed_idle_gap = Duration::ZERO;
        self.restart_clock();
    }

    /// Folds the current session into the cumulative total and starts a new
    /// session. Returns the new total for persistence.
    pub fn checkpoint(&mut self) -> Duration {
        if self.rejects("checkpoint") {
            return self.cumulative_elapsed;
        }
        self.cumulative_elapsed = self
            .cumulative_elapsed
            .saturating_add(self.session_accumulated)
            .saturating_add(self.last_confirmed_idle_gap);
        self.session_accumulated = Duration::ZERO;
        self.last_confirmed_idle_gap = Duration::ZERO;
        self.restart_clock();
        self.cumulative_elapsed
    }

    /// [`Self::checkpoint`], returning the total in seconds.
    pub fn checkpoint_seconds(&mut self) -> f64 {
        self.checkpoint().as_secs_f64()
    }

    /// Halts the clock. The timer accepts no further mutations.
    pub fn stop(&mut self) {
        if self.stopped_at.is_none() {
            self.stopped_at = Some(self.clock.now());
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped_at.is_some()
    }

    /// Cumulative confirmed editing time as of the last checkpoint.
    pub fn elapsed(&self) -> Duration {
        self.cumulative_elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    const THRESHOLD: Duration = Duration::from_secs(120);

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn new_timer_reports_seed() {
        let clock = ManualClock::new();
        for seed in [0, 1, 309, 86_400] {
            let timer = SessionTimer::new(clock.clone(), secs(seed));
            assert_eq!(timer.elapsed(), secs(seed));
        }
    }

    #[test]
    fn from_seconds_clamps_bad_seeds() {
        let clock = ManualClock::new();
        assert_eq!(
            SessionTimer::from_seconds(clock.clone(), -5.0).elapsed(),
            Duration::ZERO
        );
        assert_eq!(
            SessionTimer::from_seconds(clock.clone(), f64::NAN).elapsed(),
            Duration::ZERO
        );
        assert_eq!(
            SessionTimer::from_seconds(clock, 90.5).elapsed(),
            Duration::from_millis(90_500)
        );
    }

    #[test]
    fn activity_does_not_advance_total_until_checkpoint() {
        let clock = ManualClock::new();
        let mut timer = SessionTimer::new(clock.clone(), secs(10));

        clock.advance(secs(30));
        timer.record_activity();
        assert_eq!(timer.elapsed(), secs(10));

        assert_eq!(timer.checkpoint(), secs(40));
        assert_eq!(timer.elapsed(), secs(40));
    }

    #[test]
    fn trailing_time_after_last_activity_is_not_counted() {
        let clock = ManualClock::new();
        let mut timer = SessionTimer::new(clock.clone(), Duration::ZERO);

        clock.advance(secs(20));
        timer.record_activity();
        clock.advance(secs(50));

        // Save without a change: only the confirmed 20s count.
        assert_eq!(timer.checkpoint(), secs(20));
    }

    #[test]
    fn checkpoint_restarts_session() {
        let clock = ManualClock::new();
        let mut timer = SessionTimer::new(clock.clone(), Duration::ZERO);

        clock.advance(secs(60));
        timer.record_activity();
        assert_eq!(timer.checkpoint(), secs(60));

        clock.advance(secs(15));
        timer.record_activity();
        assert_eq!(timer.time_since_last_activity(), Duration::ZERO);
        assert_eq!(timer.checkpoint(), secs(75));
    }

    #[test]
    fn checkpoints_never_decrease() {
        let clock = ManualClock::new();
        let mut timer = SessionTimer::new(clock.clone(), secs(5));
        let mut previous = timer.checkpoint();

        for step in [3, 200, 45, 0, 130, 7] {
            clock.advance(secs(step));
            if timer.is_idle_exceeded(THRESHOLD) {
                if step % 2 == 0 {
                    timer.resolve_idle_as_active();
                } else {
                    timer.resolve_idle_as_excluded();
                }
            } else {
                timer.record_activity();
            }
            let current = timer.checkpoint();
            assert!(current >= previous, "{current:?} < {previous:?}");
            previous = current;
        }
    }

    #[test]
    fn idle_gap_is_detected_and_measured() {
        let clock = ManualClock::new();
        let mut timer = SessionTimer::new(clock.clone(), Duration::ZERO);
        timer.record_activity();

        clock.advance(secs(120));
        assert!(!timer.is_idle_exceeded(THRESHOLD));

        clock.advance(secs(180));
        assert!(timer.is_idle_exceeded(THRESHOLD));
        assert_eq!(timer.time_since_last_activity(), secs(300));
    }

    #[test]
    fn excluded_idle_gap_contributes_nothing() {
        let clock = ManualClock::new();
        let mut timer = SessionTimer::new(clock.clone(), secs(100));
        timer.record_activity();

        clock.advance(secs(300));
        assert!(timer.is_idle_exceeded(THRESHOLD));
        timer.resolve_idle_as_excluded();

        assert_eq!(timer.checkpoint(), secs(100));
    }

    #[test]
    fn included_idle_gap_counts_in_full() {
        let clock = ManualClock::new();
        let mut timer = SessionTimer::new(clock.clone(), secs(100));
        timer.record_activity();

        clock.advance(secs(300));
        assert!(timer.is_idle_exceeded(THRESHOLD));
        timer.resolve_idle_as_active();

        assert_eq!(timer.checkpoint(), secs(400));
    }

    #[test]
    fn excluding_idle_keeps_work_before_the_gap() {
        let clock = ManualClock::new();
        let mut timer = SessionTimer::new(clock.clone(), Duration::ZERO);

        clock.advance(secs(40));
        timer.record_activity();
        clock.advance(secs(500));
        timer.resolve_idle_as_excluded();

        // Clock restarted at the decision; new work counts from there.
        clock.advance(secs(10));
        timer.record_activity();

        assert_eq!(timer.checkpoint(), secs(50));
    }

    #[test]
    fn stopped_timer_ignores_mutations() {
        let clock = ManualClock::new();
        let mut timer = SessionTimer::new(clock.clone(), secs(7));

        clock.advance(secs(30));
        timer.stop();
        assert!(timer.is_stopped());

        clock.advance(secs(30));
        timer.record_activity();
        timer.resolve_idle_as_excluded();
        assert_eq!(timer.checkpoint(), secs(7));
        assert_eq!(timer.time_since_last_activity(), secs(30));
    }

    #[test]
    fn clock_moving_backwards_saturates() {
        let clock = ManualClock::new();
        clock.set(secs(100));
        let mut timer = SessionTimer::new(clock.clone(), Duration::ZERO);

        clock.set(secs(50));
        assert_eq!(timer.time_since_last_activity(), Duration::ZERO);
        timer.record_activity();
        assert_eq!(timer.checkpoint(), Duration::ZERO);
    }

    #[test]
    fn duration_from_seconds_handles_edge_values() {
        assert_eq!(duration_from_seconds(0.0), Duration::ZERO);
        assert_eq!(duration_from_seconds(-1.0), Duration::ZERO);
        assert_eq!(duration_from_seconds(f64::INFINITY), Duration::ZERO);
        assert_eq!(duration_from_seconds(f64::MAX), Duration::MAX);
        assert_eq!(duration_from_seconds(2.5), Duration::from_millis(2500));
    }
}
