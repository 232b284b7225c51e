use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use log::{debug, info};

use crate::helpers::output_file_name;
use crate::models::{CandleTable, Window};
use crate::services::{CandleAccumulator, CandleSource, OverlapPolicy};
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct HistoryRequest {
    pub market: String,
    /// Candle width in seconds.
    pub granularity: u32,
    pub num_days: u32,
    /// Pause after every request, for the exchange's rate limit.
    pub delay: Duration,
}

impl HistoryRequest {
    pub fn new(market: &str, granularity: u32, num_days: u32, delay: Duration) -> Self {
        Self {
            market: market.to_string(),
            granularity,
            num_days,
            delay,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.granularity == 0 {
            return Err(Error::InvalidParameter(
                "granularity must be a positive number of seconds".to_string(),
            ));
        }
        if self.market.trim().is_empty() {
            return Err(Error::InvalidParameter("market must not be empty".to_string()));
        }
        Ok(())
    }

    /// Start of the lookback window ending at `end`.
    pub fn start(&self, end: DateTime<Utc>) -> Result<DateTime<Utc>> {
        TimeDelta::try_days(i64::from(self.num_days))
            .and_then(|lookback| end.checked_sub_signed(lookback))
            .ok_or_else(|| {
                Error::InvalidParameter(format!(
                    "num_days {} reaches past the earliest supported date",
                    self.num_days
                ))
            })
    }
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub output_dir: PathBuf,
    pub overlap_policy: OverlapPolicy,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            overlap_policy: OverlapPolicy::default(),
        }
    }
}

pub struct HistoryFetcher<S: CandleSource> {
    source: S,
    config: FetchConfig,
}

impl<S: CandleSource> HistoryFetcher<S> {
    pub fn new(source: S, config: FetchConfig) -> Self {
        Self { source, config }
    }

    /// Fetches `num_days` of candles up to now and writes them to
    /// `{market}_{start}_{end}.csv` in the output directory.
    pub async fn fetch(&self, request: &HistoryRequest) -> Result<CandleTable> {
        self.fetch_until(request, Utc::now()).await
    }

    pub async fn fetch_until(
        &self,
        request: &HistoryRequest,
        end: DateTime<Utc>,
    ) -> Result<CandleTable> {
        request.validate()?;
        let start = request.start(end)?;
        let windows = Window::partition(start, end);
        info!(
            "Fetching {} {}s candles from {start} to {end} in {} windows",
            request.market,
            request.granularity,
            windows.len()
        );

        let mut accumulator = CandleAccumulator::new();
        for window in &windows {
            let mut batch = self
                .source
                .historic_rates(&request.market, request.granularity, Some(window))
                .await?;
            batch.reverse();
            let kept = accumulator.push_window(batch);
            debug!(
                "Window {}..{}: {kept} candles",
                window.query_start(),
                window.query_end()
            );
            self.pause(request.delay).await;
        }

        let mut latest = self
            .source
            .historic_rates(&request.market, request.granularity, None)
            .await?;
        latest.reverse();
        let appended =
            accumulator.reconcile_tail(&request.market, latest, self.config.overlap_policy)?;
        debug!("Appended {appended} latest candles");

        let table = accumulator.into_table()?;
        let path = self
            .config
            .output_dir
            .join(output_file_name(&request.market, start, end));
        table.write_csv(&path)?;
        info!("Saved {} candles to {}", table.len(), path.display());

        Ok(table)
    }

    /// Reads a table written by [`HistoryFetcher::fetch`], without touching the source.
    pub fn load_from_file(&self, path: impl AsRef<Path>) -> Result<CandleTable> {
        let path = path.as_ref();
        let table = CandleTable::read_csv(path)?;
        info!("Loaded {} rows from {}", table.len(), path.display());
        Ok(table)
    }

    async fn pause(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::TimeZone;

    use super::*;
    use crate::models::Candle;

    const STEP: i64 = 900;

    /// Replays canned responses, newest first, and records each request's window.
    struct ReplaySource {
        responses: Mutex<VecDeque<Vec<Candle>>>,
        requests: Mutex<Vec<Option<Window>>>,
    }

    impl ReplaySource {
        fn new(responses: Vec<Vec<Candle>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<Option<Window>> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CandleSource for ReplaySource {
        async fn historic_rates(
            &self,
            _market: &str,
            _granularity: u32,
            window: Option<&Window>,
        ) -> Result<Vec<Candle>> {
            self.requests.lock().unwrap().push(window.copied());
            let mut response = self.responses.lock().unwrap().pop_front().unwrap_or_default();
            response.reverse();
            Ok(response)
        }
    }

    fn end() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    /// `count` chronological candles starting `offset` steps after `from`.
    fn candles(from: DateTime<Utc>, offset: i64, count: i64) -> Vec<Candle> {
        (offset..offset + count)
            .map(|i| {
                let price = 1800.0 + i as f64 * 0.5;
                Candle::new(from.timestamp() + i * STEP, price - 2.0, price + 2.0, price, price + 1.0, 10.0)
            })
            .collect()
    }

    fn fetcher(responses: Vec<Vec<Candle>>, dir: &Path, policy: OverlapPolicy) -> HistoryFetcher<ReplaySource> {
        HistoryFetcher::new(
            ReplaySource::new(responses),
            FetchConfig {
                output_dir: dir.to_path_buf(),
                overlap_policy: policy,
            },
        )
    }

    fn request(num_days: u32) -> HistoryRequest {
        HistoryRequest::new("ETH-USD", 900, num_days, Duration::ZERO)
    }

    fn assert_strictly_increasing(candles: &[Candle]) {
        for pair in candles.windows(2) {
            assert!(pair[0].time < pair[1].time);
        }
    }

    #[tokio::test]
    async fn test_fetch_four_days() {
        let dir = tempfile::tempdir().unwrap();
        let start = end() - chrono::Duration::days(4);
        // 192 candles per 2 day window; the second window repeats the first's last candle
        let responses = vec![
            candles(start, 0, 192),
            candles(start, 191, 192),
            candles(start, 370, 20),
        ];
        let fetcher = fetcher(responses, dir.path(), OverlapPolicy::Fail);

        let table = fetcher.fetch_until(&request(4), end()).await.unwrap();

        let requests = fetcher.source.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].unwrap().start, start);
        assert_eq!(requests[1].unwrap().end, end());
        assert!(requests[2].is_none());

        // 0..=382 from the windows, then 383..=389 from the latest request
        let candles = table.candles().unwrap();
        assert_eq!(candles.len(), 390);
        assert_eq!(candles[0].time, start.timestamp());
        assert_strictly_increasing(&candles);

        let path = dir.path().join("ETH-USD_2026-10-12_2026-10-16.csv");
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_fetch_zero_days_keeps_latest() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = fetcher(vec![candles(end(), -10, 10)], dir.path(), OverlapPolicy::Fail);

        let table = fetcher.fetch_until(&request(0), end()).await.unwrap();

        assert_eq!(fetcher.source.requests(), vec![None]);
        assert_eq!(table.len(), 10);
        assert!(dir.path().join("ETH-USD_2026-10-16_2026-10-16.csv").exists());
    }

    #[tokio::test]
    async fn test_fetch_without_overlap_fails() {
        let dir = tempfile::tempdir().unwrap();
        let start = end() - chrono::Duration::days(2);
        let responses = vec![candles(start, 0, 100), candles(start, 150, 10)];
        let fetcher = fetcher(responses, dir.path(), OverlapPolicy::Fail);

        let result = fetcher.fetch_until(&request(2), end()).await;

        assert!(matches!(result, Err(Error::NoOverlap { .. })));
        assert!(!dir.path().join("ETH-USD_2026-10-14_2026-10-16.csv").exists());
    }

    #[tokio::test]
    async fn test_fetch_without_overlap_appends() {
        let dir = tempfile::tempdir().unwrap();
        let start = end() - chrono::Duration::days(2);
        let responses = vec![candles(start, 0, 100), candles(start, 150, 10)];
        let fetcher = fetcher(responses, dir.path(), OverlapPolicy::Append);

        let table = fetcher.fetch_until(&request(2), end()).await.unwrap();

        assert_eq!(table.len(), 110);
        assert_strictly_increasing(&table.candles().unwrap());
    }

    #[tokio::test]
    async fn test_fetch_empty_windows() {
        let dir = tempfile::tempdir().unwrap();
        let responses = vec![Vec::new(), Vec::new(), candles(end(), -4, 4)];
        let fetcher = fetcher(responses, dir.path(), OverlapPolicy::Fail);

        let table = fetcher.fetch_until(&request(3), end()).await.unwrap();

        assert_eq!(fetcher.source.requests().len(), 3);
        assert_eq!(table.len(), 4);
    }

    #[tokio::test]
    async fn test_fetch_rejects_zero_granularity() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = fetcher(Vec::new(), dir.path(), OverlapPolicy::Fail);
        let request = HistoryRequest::new("ETH-USD", 0, 4, Duration::ZERO);

        let result = fetcher.fetch_until(&request, end()).await;

        assert!(matches!(result, Err(Error::InvalidParameter(_))));
        assert!(fetcher.source.requests().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_rejects_lookback_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = fetcher(Vec::new(), dir.path(), OverlapPolicy::Fail);

        let result = fetcher.fetch_until(&request(u32::MAX), end()).await;

        assert!(matches!(result, Err(Error::InvalidParameter(_))));
        assert!(fetcher.source.requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_sleeps_after_each_window() {
        let dir = tempfile::tempdir().unwrap();
        let start = end() - chrono::Duration::days(4);
        let responses = vec![
            candles(start, 0, 192),
            candles(start, 191, 192),
            candles(start, 370, 20),
        ];
        let fetcher = fetcher(responses, dir.path(), OverlapPolicy::Fail);
        let delay = Duration::from_millis(500);
        let request = HistoryRequest::new("ETH-USD", 900, 4, delay);

        let began = tokio::time::Instant::now();
        fetcher.fetch_until(&request, end()).await.unwrap();
        let elapsed = began.elapsed();

        // two windows, one pause each
        assert!(elapsed >= delay * 2, "elapsed {elapsed:?}");
        assert!(elapsed < delay * 3, "elapsed {elapsed:?}");
        assert_eq!(fetcher.source.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let start = end() - chrono::Duration::days(2);
        let responses = vec![candles(start, 0, 192), candles(start, 180, 30)];
        let fetcher = fetcher(responses, dir.path(), OverlapPolicy::Fail);

        let table = fetcher.fetch_until(&request(2), end()).await.unwrap();
        let loaded = fetcher
            .load_from_file(dir.path().join("ETH-USD_2026-10-14_2026-10-16.csv"))
            .unwrap();

        assert_eq!(fetcher.source.requests().len(), 2);
        assert_eq!(loaded.len(), table.len());
        assert_eq!(loaded.candles().unwrap(), table.candles().unwrap());
    }
}
