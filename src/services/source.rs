use async_trait::async_trait;

use crate::models::{Candle, Window};
use crate::Result;

/// Upstream market data, returned newest first.
#[async_trait]
pub trait CandleSource: Send + Sync {
    /// Candles for `market` at `granularity` seconds. `None` asks for the
    /// source's default, most recent range.
    async fn historic_rates(
        &self,
        market: &str,
        granularity: u32,
        window: Option<&Window>,
    ) -> Result<Vec<Candle>>;
}
