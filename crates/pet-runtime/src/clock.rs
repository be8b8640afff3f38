//! Wall-clock access for the controller.

use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};

pub trait Clock {
    /// Current time as unix milliseconds.
    fn now_ms(&self) -> i64;
    /// Calendar day used to rotate quests.
    fn today(&self) -> NaiveDate;
}

/// The real clock. Quests rotate on the local calendar day.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock moved by hand. Clones share the same time, so a test can keep a
/// handle after giving one to a controller.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now_ms: Rc<Cell<i64>>,
}

impl ManualClock {
    pub fn new(start_ms: i64) -> Self {
        Self {
            now_ms: Rc::new(Cell::new(start_ms)),
        }
    }

    /// Starts at midnight UTC of `date`.
    pub fn at_date(date: NaiveDate) -> Self {
        let ms = date
            .and_hms_opt(0, 0, 0)
            .map(|dt| Utc.from_utc_datetime(&dt).timestamp_millis())
            .unwrap_or(0);
        Self::new(ms)
    }

    pub fn advance_ms(&self, ms: i64) {
        self.now_ms.set(self.now_ms.get().saturating_add(ms));
    }

    pub fn set_ms(&self, ms: i64) {
        self.now_ms.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.get()
    }

    /// UTC calendar day of the current instant.
    fn today(&self) -> NaiveDate {
        utc_datetime(self.now_ms.get()).date_naive()
    }
}

/// Unix millis to a UTC timestamp, saturating to the epoch when out of range.
pub fn utc_datetime(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_is_shared_between_clones() {
        let clock = ManualClock::new(1_000);
        let handle = clock.clone();
        handle.advance_ms(500);
        assert_eq!(clock.now_ms(), 1_500);
    }

    #[test]
    fn day_rolls_over_at_midnight_utc() {
        let d = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        let clock = ManualClock::at_date(d);
        assert_eq!(clock.today(), d);
        clock.advance_ms(24 * 60 * 60 * 1_000 - 1);
        assert_eq!(clock.today(), d);
        clock.advance_ms(1);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }
}
