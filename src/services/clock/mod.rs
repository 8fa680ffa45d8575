// Clock abstraction
// Every "now" and "today" the engine uses is read through this trait

use chrono::{Local, NaiveDate, NaiveDateTime};

#[cfg_attr(test, mockall::automock)]
pub trait Clock {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Wall clock in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Only implements `now`, so `today` comes from the trait default.
    struct FixedClock(NaiveDateTime);

    impl Clock for FixedClock {
        fn now(&self) -> NaiveDateTime {
            self.0
        }
    }

    #[test]
    fn test_today_derives_from_now() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        let clock = FixedClock(date.and_hms_opt(23, 59, 59).unwrap());
        assert_eq!(clock.today(), date);

        let clock = FixedClock(date.succ_opt().unwrap().and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    }

    #[test]
    fn test_system_clock_is_close_to_local_now() {
        let before = Local::now().naive_local();
        let now = SystemClock.now();
        assert!(now >= before);
    }
}
