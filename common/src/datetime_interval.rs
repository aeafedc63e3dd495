//! Datetime intervals with optionally open ends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `None` on either side is an open end (unbounded towards -inf / +inf).
/// Both sides are always UTC; conversion happens when the interval is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "(Option<DateTime<Utc>>, Option<DateTime<Utc>>)", into = "(Option<DateTime<Utc>>, Option<DateTime<Utc>>)")]
pub struct DatetimeInterval {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DatetimeInterval {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    pub fn is_fully_open(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

impl From<(Option<DateTime<Utc>>, Option<DateTime<Utc>>)> for DatetimeInterval {
    fn from((start, end): (Option<DateTime<Utc>>, Option<DateTime<Utc>>)) -> Self {
        Self { start, end }
    }
}

impl From<DatetimeInterval> for (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    fn from(interval: DatetimeInterval) -> Self {
        (interval.start, interval.end)
    }
}
