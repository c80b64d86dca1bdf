use std::time::Duration;

use super::Clock;

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds.
    pub dt: f32,

    /// Monotonic timestamp since the clock was started (or last reset).
    pub timestamp: Duration,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

impl FrameTime {
    /// Timestamp in milliseconds, the unit paint routines animate against.
    #[inline]
    pub fn timestamp_ms(&self) -> f64 {
        self.timestamp.as_secs_f64() * 1000.0
    }
}

/// Frame clock producing `FrameTime` snapshots from an injected `Clock`.
///
/// One `FrameClock` per surface (or per window) so repaint loops do not share
/// delta-time state.
///
/// Delta time is clamped to avoid pathological values when the application is
/// paused by the debugger, minimized, or stalls. Timestamps are not clamped:
/// they always equal the time since start.
#[derive(Debug, Clone)]
pub struct FrameClock {
    origin: Duration,
    last: Duration,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a clock starting at `now` with default clamps.
    ///
    /// Clamp rationale:
    /// - minimum prevents zero-dt behavior from tight loops on some platforms
    /// - maximum prevents animation jumps after long stalls
    pub fn starting_at(now: Duration) -> Self {
        Self::with_clamps(now, Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(now: Duration, dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            origin: now,
            last: now,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Creates a clock starting at the current time of `clock`.
    pub fn from_clock(clock: &impl Clock) -> Self {
        Self::starting_at(clock.now())
    }

    /// Resets the timestamp origin and the delta baseline to `now`.
    pub fn reset(&mut self, now: Duration) {
        self.origin = now;
        self.last = now;
        self.frame_index = 0;
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self, now: Duration) -> FrameTime {
        // A clock reading behind `last` counts as no elapsed time.
        let now = now.max(self.last);
        let dt = (now - self.last).clamp(self.dt_min, self.dt_max);

        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            timestamp: now - self.origin,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_are_relative_to_start() {
        let mut fc = FrameClock::starting_at(Duration::from_secs(100));
        let ft = fc.tick(Duration::from_millis(100_016));
        assert_eq!(ft.timestamp, Duration::from_millis(16));
        assert_eq!(ft.frame_index, 0);
        assert_eq!(fc.tick(Duration::from_millis(100_032)).frame_index, 1);
    }

    #[test]
    fn dt_is_clamped_but_timestamp_is_not() {
        let mut fc = FrameClock::starting_at(Duration::ZERO);
        let ft = fc.tick(Duration::from_secs(10));
        assert_eq!(ft.dt, 0.25);
        assert_eq!(ft.timestamp, Duration::from_secs(10));
    }

    #[test]
    fn timestamps_never_decrease() {
        let mut fc = FrameClock::starting_at(Duration::ZERO);
        let a = fc.tick(Duration::from_millis(50));
        let b = fc.tick(Duration::from_millis(40));
        assert!(b.timestamp >= a.timestamp);
    }
}
