use chrono::{FixedOffset, NaiveDate, NaiveDateTime, Utc};

/// Source of "now" in the factory's single civil timezone. Handlers use
/// [`SystemClock`]; tests pass literal instants to the core functions
/// directly, so nothing in the derivation logic touches the wall clock.
pub trait Clock: Send + Sync {
    fn now_local(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now_local().date()
    }
}

pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    /// Builds a clock for a fixed UTC offset in minutes (east positive).
    /// An out-of-range offset falls back to UTC.
    pub fn from_offset_minutes(minutes: i32) -> Self {
        let offset = FixedOffset::east_opt(minutes * 60)
            .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap());
        Self { offset }
    }
}

impl Clock for SystemClock {
    fn now_local(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.offset).naive_local()
    }
}
