use chrono::{NaiveDate, NaiveDateTime};

/// Clock abstracts access to the current instant so services remain
/// deterministic in tests. Implementations decide which wall clock applies;
/// the engine itself only sees naive local time.
pub trait Clock: Send + Sync {
    /// Returns the current local timestamp.
    fn now(&self) -> NaiveDateTime;

    /// Returns the current local date. Defaults to `now().date()`.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}
