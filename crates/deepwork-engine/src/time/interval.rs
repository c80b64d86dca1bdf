use std::time::Duration;

/// Fixed-period schedule.
///
/// An `Interval` is armed at some instant and comes due every `period`
/// afterwards. It does not own a thread or a callback; the owner polls it
/// with the current time and performs one step per due period. Dropping the
/// interval (or never polling it again) is cancellation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    period: Duration,
    next_due: Duration,
}

impl Interval {
    /// Arms an interval whose first deadline is one `period` after `now`.
    ///
    /// A zero period is bumped to one millisecond so polling always terminates.
    pub fn starting_at(now: Duration, period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        Self { period, next_due: now.saturating_add(period) }
    }

    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Absolute time of the next deadline.
    #[inline]
    pub fn next_due(&self) -> Duration {
        self.next_due
    }

    /// Time left until the next deadline, zero if already due.
    #[inline]
    pub fn until_next(&self, now: Duration) -> Duration {
        self.next_due.saturating_sub(now)
    }

    /// Consumes one due deadline, if any.
    ///
    /// Returns `true` when a deadline at or before `now` was consumed; the
    /// next deadline is then one period later. Call repeatedly to catch up
    /// after a stall.
    pub fn poll_once(&mut self, now: Duration) -> bool {
        if now < self.next_due {
            return false;
        }
        self.next_due = self.next_due.saturating_add(self.period);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn first_deadline_is_one_period_out() {
        let mut iv = Interval::starting_at(secs(5), secs(1));
        assert!(!iv.poll_once(Duration::from_millis(5_999)));
        assert!(iv.poll_once(secs(6)));
        assert!(!iv.poll_once(secs(6)));
    }

    #[test]
    fn catches_up_one_deadline_per_poll() {
        let mut iv = Interval::starting_at(secs(0), secs(1));
        let mut due = 0;
        while iv.poll_once(Duration::from_millis(3_500)) {
            due += 1;
        }
        assert_eq!(due, 3);
        assert_eq!(iv.until_next(Duration::from_millis(3_500)), Duration::from_millis(500));
    }

    #[test]
    fn zero_period_is_bumped() {
        let iv = Interval::starting_at(secs(0), Duration::ZERO);
        assert_eq!(iv.period(), Duration::from_millis(1));
    }
}
