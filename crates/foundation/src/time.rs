use chrono::{Local, NaiveDate};

/// Time primitives
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
pub struct Time(pub f64); // seconds

impl Time {
    pub fn since(self, earlier: Time) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }
}

/// Source of "today" for anything that compares calendar dates against the
/// wall clock.
///
/// Implementations must be cheap to call; callers query it once per operation.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock calendar date.
#[derive(Debug, Copy, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock pinned to one date, for replay and tests.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, FixedClock, Time};
    use chrono::NaiveDate;

    #[test]
    fn fixed_clock_is_stable() {
        let day = NaiveDate::from_ymd_opt(2022, 6, 15).unwrap();
        let clock = FixedClock(day);
        assert_eq!(clock.today(), day);
        assert_eq!(clock.today(), clock.today());
    }

    #[test]
    fn since_never_goes_negative() {
        assert_eq!(Time(5.0).since(Time(2.0)), 3.0);
        assert_eq!(Time(1.0).since(Time(2.0)), 0.0);
    }
}
