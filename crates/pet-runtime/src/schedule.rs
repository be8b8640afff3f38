//! Cooperative timers for the single-threaded controller loop.

/// A fixed-period timer polled by the controller.
///
/// Fires at most once per poll; periods missed while the host was suspended
/// are skipped rather than replayed, like a browser interval in a
/// background tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    period_ms: i64,
    next_due_ms: i64,
}

impl Interval {
    /// First firing one period after `now_ms`.
    pub fn starting_at(now_ms: i64, period_ms: u64) -> Self {
        let period_ms = i64::try_from(period_ms).unwrap_or(i64::MAX).max(1);
        Self {
            period_ms,
            next_due_ms: now_ms.saturating_add(period_ms),
        }
    }

    pub fn next_due_ms(&self) -> i64 {
        self.next_due_ms
    }

    /// Returns `true` when due and schedules the next firing on the
    /// same grid.
    pub fn poll(&mut self, now_ms: i64) -> bool {
        if now_ms < self.next_due_ms {
            return false;
        }
        let missed = (now_ms - self.next_due_ms) / self.period_ms + 1;
        self.next_due_ms = self
            .next_due_ms
            .saturating_add(missed.saturating_mul(self.period_ms));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_period() {
        let mut t = Interval::starting_at(0, 1_000);
        assert!(!t.poll(999));
        assert!(t.poll(1_000));
        assert!(!t.poll(1_500));
        assert!(t.poll(2_100));
        assert_eq!(t.next_due_ms(), 3_000);
    }

    #[test]
    fn long_gap_fires_once_and_stays_on_grid() {
        let mut t = Interval::starting_at(0, 1_000);
        assert!(t.poll(60_250));
        assert!(!t.poll(60_900));
        assert_eq!(t.next_due_ms(), 61_000);
    }

    #[test]
    fn zero_period_is_treated_as_one_ms() {
        let mut t = Interval::starting_at(10, 0);
        assert!(t.poll(11));
        assert!(t.poll(12));
    }
}
