use chrono::{Local, NaiveDate};

/// Represents an entity responsible for providing dates across application. This allows "today"
/// to be fixed in tests.
#[cfg_attr(test, mockall::automock)]
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

pub struct DefaultClock;

impl Clock for DefaultClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}
