use serde::Deserialize;

use crate::helpers::format_time2;

/// One OHLCV bucket. Field order matches the exchange's
/// `[time, low, high, open, close, volume]` rows.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(from = "(i64, f64, f64, f64, f64, f64)")]
pub struct Candle {
    pub time: i64,
    pub low: f64,
    pub high: f64,
    pub open: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(time: i64, low: f64, high: f64, open: f64, close: f64, volume: f64) -> Self {
        Self {
            time,
            low,
            high,
            open,
            close,
            volume,
        }
    }

    pub fn time2(&self) -> Option<String> {
        format_time2(self.time)
    }
}

impl From<(i64, f64, f64, f64, f64, f64)> for Candle {
    fn from((time, low, high, open, close, volume): (i64, f64, f64, f64, f64, f64)) -> Self {
        Self::new(time, low, high, open, close, volume)
    }
}
