//! Source of "today" for date validation.
//!
//! The clock is always passed in explicitly so that tests can pin the date.

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

/// Provides the current calendar date.
pub trait Clock: Send + Sync {
    /// Returns today's date.
    fn today(&self) -> NaiveDate;
}

/// Wall-clock time, observed in a fixed timezone.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    timezone: Tz,
}

impl SystemClock {
    /// Creates a clock that reports dates in `timezone`.
    #[must_use]
    pub const fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    /// Creates a clock from an IANA timezone name such as `Europe/Moscow`.
    ///
    /// Returns `None` for unknown names.
    #[must_use]
    pub fn from_timezone_name(name: &str) -> Option<Self> {
        name.parse::<Tz>().ok().map(Self::new)
    }

    /// Returns the timezone this clock observes.
    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.timezone
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }
}

/// A clock pinned to one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(FixedClock(date).today(), date);
    }

    #[test]
    fn test_timezone_name_parsing() {
        let clock = SystemClock::from_timezone_name("Asia/Vladivostok").expect("known timezone");
        assert_eq!(clock.timezone(), Tz::Asia__Vladivostok);
        assert!(SystemClock::from_timezone_name("Mars/Olympus_Mons").is_none());
    }

    #[test]
    fn test_system_clock_is_within_a_day_of_utc() {
        let utc_today = Utc::now().date_naive();
        let far_east = SystemClock::new(Tz::Pacific__Kiritimati).today();
        let far_west = SystemClock::new(Tz::Pacific__Pago_Pago).today();
        assert!((far_east - utc_today).num_days().abs() <= 1);
        assert!((far_west - utc_today).num_days().abs() <= 1);
    }
}
