use std::fmt;
use std::time::Duration;

use crate::time::{Clock, Interval, SystemClock};

use super::TimerError;

/// Default session length (25 minutes).
pub const DEFAULT_DURATION_SECS: u32 = 25 * 60;

/// Period of one countdown tick.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Copyable view of a timer, for HUDs and logging.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TimerSnapshot {
    pub duration: u32,
    pub remaining: u32,
    pub running: bool,
    pub progress: f32,
}

type TickObserver = Box<dyn FnMut(u32)>;

/// Countdown state machine.
///
/// States are `Paused` (no interval) and `Running` (interval armed). The only
/// mutations of `remaining` happen in `tick`, which is reachable only through
/// `pump` while an interval is armed, so no tick can land after `pause()`.
pub struct FocusTimer<C: Clock = SystemClock> {
    clock: C,
    duration: u32,
    remaining: u32,
    ticker: Option<Interval>,
    on_tick: Option<TickObserver>,
}

impl FocusTimer<SystemClock> {
    /// Creates a paused timer on the system clock.
    pub fn new(duration: u32) -> Result<Self, TimerError> {
        Self::with_clock(duration, SystemClock::new())
    }
}

impl<C: Clock> FocusTimer<C> {
    /// Creates a paused timer reading time from `clock`.
    pub fn with_clock(duration: u32, clock: C) -> Result<Self, TimerError> {
        validate(duration)?;
        Ok(Self {
            clock,
            duration,
            remaining: duration,
            ticker: None,
            on_tick: None,
        })
    }

    /// Registers an observer called with the new `remaining` after every tick.
    ///
    /// The observer cannot reach the timer; it only sees the value.
    pub fn on_tick(&mut self, observer: impl FnMut(u32) + 'static) {
        self.on_tick = Some(Box::new(observer));
    }

    /// Removes the tick observer.
    pub fn clear_on_tick(&mut self) {
        self.on_tick = None;
    }

    // ── accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn duration(&self) -> u32 {
        self.duration
    }

    #[inline]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    /// Fraction of the duration that has elapsed, in `[0, 1]`.
    #[inline]
    pub fn progress(&self) -> f32 {
        progress(self.remaining, self.duration)
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            duration: self.duration,
            remaining: self.remaining,
            running: self.is_running(),
            progress: self.progress(),
        }
    }

    /// Remaining time as `MM:SS` (minutes are not wrapped into hours).
    pub fn format_remaining(&self) -> String {
        Countdown(self.remaining).to_string()
    }

    /// Time until the next tick is due, `None` while paused.
    pub fn time_until_next_tick(&self) -> Option<Duration> {
        let now = self.clock.now();
        self.ticker.as_ref().map(|t| t.until_next(now))
    }

    // ── operations ────────────────────────────────────────────────────────

    /// Starts ticking. No-op while already running: there is never more than
    /// one armed interval.
    pub fn start(&mut self) {
        if self.ticker.is_some() {
            return;
        }
        self.ticker = Some(Interval::starting_at(self.clock.now(), TICK_PERIOD));
        log::debug!("focus timer started at {}s remaining", self.remaining);
    }

    /// Stops ticking. Deadlines that were due but not yet pumped are dropped.
    pub fn pause(&mut self) {
        if self.ticker.take().is_some() {
            log::debug!("focus timer paused at {}s remaining", self.remaining);
        }
    }

    /// Stops ticking and rewinds to a full countdown.
    ///
    /// `Some(secs)` replaces the duration; `None` keeps the current one.
    /// A zero duration is rejected and leaves the timer untouched.
    pub fn reset(&mut self, new_duration: Option<u32>) -> Result<(), TimerError> {
        let duration = new_duration.unwrap_or(self.duration);
        validate(duration)?;

        self.ticker = None;
        self.duration = duration;
        self.remaining = duration;
        log::debug!("focus timer reset to {duration}s");
        Ok(())
    }

    /// Applies every tick that has come due since the last call.
    ///
    /// Returns the number of ticks applied (0 while paused). Ticks are applied
    /// one after another, so observers see each intermediate value.
    pub fn pump(&mut self) -> u32 {
        let now = self.clock.now();
        let mut applied = 0;

        while let Some(ticker) = self.ticker.as_mut() {
            if !ticker.poll_once(now) {
                break;
            }
            self.tick();
            applied += 1;
        }

        applied
    }

    /// One countdown step. Saturates at zero and never stops the timer.
    pub(crate) fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
        if let Some(observer) = self.on_tick.as_mut() {
            observer(self.remaining);
        }
    }
}

impl<C: Clock> fmt::Debug for FocusTimer<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusTimer")
            .field("duration", &self.duration)
            .field("remaining", &self.remaining)
            .field("running", &self.is_running())
            .finish()
    }
}

#[inline]
fn validate(duration: u32) -> Result<(), TimerError> {
    if duration == 0 {
        Err(TimerError::InvalidDuration(duration))
    } else {
        Ok(())
    }
}

#[inline]
fn progress(remaining: u32, duration: u32) -> f32 {
    if duration == 0 {
        return 0.0;
    }
    (1.0 - remaining as f64 / duration as f64).clamp(0.0, 1.0) as f32
}

/// `MM:SS` formatter.
struct Countdown(u32);

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::time::ManualClock;

    fn timer(duration: u32) -> (FocusTimer<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let t = FocusTimer::with_clock(duration, clock.clone()).unwrap();
        (t, clock)
    }

    // ── reset ─────────────────────────────────────────────────────────────

    #[test]
    fn reset_with_duration_rewinds_and_stops() {
        for d in [1, 59, 300, 1500, 86_400] {
            let (mut t, clock) = timer(10);
            t.start();
            clock.advance_secs(3);
            t.pump();

            t.reset(Some(d)).unwrap();
            assert_eq!(t.remaining(), d);
            assert_eq!(t.duration(), d);
            assert!(!t.is_running());
            assert_eq!(t.progress(), 0.0);
        }
    }

    #[test]
    fn reset_rejects_zero_and_keeps_state() {
        let (mut t, clock) = timer(60);
        t.start();
        clock.advance_secs(5);
        t.pump();

        assert_eq!(t.reset(Some(0)), Err(TimerError::InvalidDuration(0)));
        assert_eq!(t.remaining(), 55);
        assert!(t.is_running());
    }

    #[test]
    fn new_rejects_zero_duration() {
        assert!(FocusTimer::with_clock(0, ManualClock::new()).is_err());
    }

    // ── ticking ───────────────────────────────────────────────────────────

    #[test]
    fn ticks_only_while_running() {
        let (mut t, clock) = timer(10);
        clock.advance_secs(5);
        assert_eq!(t.pump(), 0);
        assert_eq!(t.remaining(), 10);

        t.start();
        clock.advance_secs(2);
        assert_eq!(t.pump(), 2);
        assert_eq!(t.remaining(), 8);
    }

    #[test]
    fn remaining_floors_at_zero_and_timer_keeps_running() {
        let (mut t, clock) = timer(3);
        t.start();

        let mut last = t.remaining();
        for _ in 0..10 {
            clock.advance_secs(1);
            t.pump();
            assert!(t.remaining() <= last);
            last = t.remaining();
        }

        assert_eq!(t.remaining(), 0);
        assert!(t.is_running());
        assert_eq!(t.progress(), 1.0);
    }

    #[test]
    fn double_start_keeps_a_single_schedule() {
        let (mut t, clock) = timer(100);
        t.start();
        clock.advance(Duration::from_millis(500));
        t.start();
        clock.advance(Duration::from_millis(500));
        assert_eq!(t.pump(), 1);

        clock.advance_secs(10);
        assert_eq!(t.pump(), 10);
        assert_eq!(t.remaining(), 89);
    }

    #[test]
    fn pause_discards_pending_ticks() {
        let (mut t, clock) = timer(100);
        t.start();
        clock.advance_secs(3);
        t.pause();

        clock.advance_secs(30);
        assert_eq!(t.pump(), 0);
        assert_eq!(t.remaining(), 100);
        assert_eq!(t.time_until_next_tick(), None);
    }

    #[test]
    fn resume_after_pause_waits_a_full_period() {
        let (mut t, clock) = timer(100);
        t.start();
        clock.advance(Duration::from_millis(900));
        t.pause();
        t.start();
        clock.advance(Duration::from_millis(900));
        assert_eq!(t.pump(), 0);
        assert_eq!(t.time_until_next_tick(), Some(Duration::from_millis(100)));
    }

    // ── progress / observers ─────────────────────────────────────────────

    #[test]
    fn progress_matches_fraction_elapsed() {
        let (mut t, clock) = timer(300);
        t.start();
        clock.advance_secs(75);
        t.pump();
        assert_eq!(t.remaining(), 225);
        assert_eq!(t.progress(), 0.25);
    }

    #[test]
    fn observer_sees_every_value() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let (mut t, clock) = timer(3);
        t.on_tick(move |remaining| sink.borrow_mut().push(remaining));
        t.start();
        clock.advance_secs(5);
        t.pump();

        assert_eq!(*seen.borrow(), vec![2, 1, 0, 0, 0]);
        assert_eq!(t.remaining(), 0);
    }

    #[test]
    fn format_remaining_pads_minutes_and_seconds() {
        let (mut t, _) = timer(25 * 60);
        assert_eq!(t.format_remaining(), "25:00");
        t.reset(Some(65)).unwrap();
        assert_eq!(t.format_remaining(), "01:05");
        t.reset(Some(120 * 60)).unwrap();
        assert_eq!(t.format_remaining(), "120:00");
    }

    // ── scenario ──────────────────────────────────────────────────────────

    #[test]
    fn long_session_then_reset_to_same_duration() {
        let (mut t, clock) = timer(1500);
        t.start();
        for _ in 0..900 {
            clock.advance_secs(1);
            t.pump();
        }
        assert_eq!(t.remaining(), 600);
        assert!((t.progress() - 0.4).abs() < 1e-6);

        t.reset(None).unwrap();
        assert_eq!(t.remaining(), 1500);
        assert_eq!(t.duration(), 1500);
        assert_eq!(t.progress(), 0.0);
        assert!(!t.is_running());
    }
}
