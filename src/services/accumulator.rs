use clap::ValueEnum;
use log::{debug, warn};

use crate::models::{Candle, CandleTable};
use crate::{Error, Result};

/// What to do when the latest candles do not contain the last accumulated candle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OverlapPolicy {
    #[default]
    Fail,
    /// Keep every latest candle strictly after the accumulated ones.
    Append,
}

/// Chronological candles collected window by window.
#[derive(Debug, Default)]
pub struct CandleAccumulator {
    windows: Vec<Vec<Candle>>,
}

impl CandleAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chronologically ordered batch, dropping candles that are not
    /// strictly later than what is already held. Returns how many were kept.
    pub fn push_window(&mut self, batch: Vec<Candle>) -> usize {
        let received = batch.len();
        let mut last_time = self.last().map(|c| c.time);
        let mut kept = Vec::with_capacity(received);
        for candle in batch {
            if last_time.map_or(true, |t| candle.time > t) {
                last_time = Some(candle.time);
                kept.push(candle);
            }
        }
        if kept.len() < received {
            debug!("Dropped {} overlapping candles", received - kept.len());
        }
        let count = kept.len();
        self.windows.push(kept);
        count
    }

    pub fn last(&self) -> Option<&Candle> {
        self.windows.iter().rev().find_map(|window| window.last())
    }

    pub fn len(&self) -> usize {
        self.windows.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Trims the latest candles down to what follows the last accumulated
    /// candle and appends the remainder as a final window.
    pub fn reconcile_tail(
        &mut self,
        market: &str,
        latest: Vec<Candle>,
        policy: OverlapPolicy,
    ) -> Result<usize> {
        let tail = trim_overlap(market, self.last(), latest, policy)?;
        Ok(self.push_window(tail))
    }

    /// Concatenates every window, in order.
    pub fn concat(&self) -> Vec<Candle> {
        self.windows.iter().flatten().copied().collect()
    }

    pub fn into_table(self) -> Result<CandleTable> {
        CandleTable::from_candles(&self.concat())
    }
}

/// Keeps the entries of `latest` after the first one whose `Time2` equals the
/// `Time2` of `last`. With nothing accumulated, `latest` is kept whole.
/// A `last` whose time cannot be formatted never matches.
pub fn trim_overlap(
    market: &str,
    last: Option<&Candle>,
    latest: Vec<Candle>,
    policy: OverlapPolicy,
) -> Result<Vec<Candle>> {
    let Some(last) = last else {
        return Ok(latest);
    };
    let boundary = last.time2();
    if boundary.is_none() {
        warn!("Last accumulated candle has an out of range time {}", last.time);
    }
    let position = boundary
        .as_ref()
        .and_then(|boundary| latest.iter().position(|c| c.time2().as_ref() == Some(boundary)));
    let boundary = boundary.unwrap_or_else(|| last.time.to_string());

    match position {
        Some(index) => {
            debug!("Overlap at {boundary}, dropping {} candles", index + 1);
            Ok(latest.into_iter().skip(index + 1).collect())
        }
        None => match policy {
            OverlapPolicy::Fail => Err(Error::NoOverlap {
                market: market.to_string(),
                time2: boundary,
            }),
            OverlapPolicy::Append => {
                warn!("No overlap at {boundary} for {market}, appending newer candles only");
                Ok(latest.into_iter().filter(|c| c.time > last.time).collect())
            }
        },
    }
}
