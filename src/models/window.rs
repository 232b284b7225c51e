use chrono::{DateTime, Duration, Utc};

use crate::helpers::format_date;

pub const WINDOW_DAYS: i64 = 2;

/// Date range bounding one candle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Window {
    pub fn width() -> Duration {
        Duration::days(WINDOW_DAYS)
    }

    /// Splits `[start, end)` into consecutive windows of `width()` beginning at `start`.
    /// The last window may reach past `end`.
    pub fn partition(start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<Window> {
        let mut windows = Vec::new();
        let mut cursor = start;
        while cursor < end {
            let next = cursor + Self::width();
            windows.push(Window {
                start: cursor,
                end: next,
            });
            cursor = next;
        }
        windows
    }

    pub fn query_start(&self) -> String {
        format_date(self.start)
    }

    pub fn query_end(&self) -> String {
        format_date(self.end)
    }

    pub fn seconds(&self) -> i64 {
        (self.end - self.start).num_seconds()
    }
}
