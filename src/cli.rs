use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;

use crate::coinbase::{BaseUrl, Credentials};
use crate::services::{FetchConfig, HistoryRequest, OverlapPolicy};

/// Download historical candles for a Coinbase market into a CSV file.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    pub api_key: String,

    pub secret_key: String,

    pub passphrase: String,

    /// Currency pair, e.g. ETH-USD
    #[arg(short, long, default_value = "ETH-USD")]
    pub market: String,

    /// Candle width in seconds
    #[arg(short, long, default_value = "900", value_parser = parse_granularity)]
    pub granularity: u32,

    /// Days of history to fetch, counting back from now
    #[arg(short, long = "num_days", default_value = "30", value_parser = parse_num_days)]
    pub num_days: u32,

    /// Load this CSV file instead of fetching
    #[arg(short, long)]
    pub filename: Option<PathBuf>,

    /// Seconds to wait after each request
    #[arg(short, long, default_value = "0.5", value_parser = parse_delay)]
    pub delay: Duration,

    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    #[arg(long)]
    pub sandbox: bool,

    #[arg(long, value_enum, default_value_t = OverlapPolicy::Fail)]
    pub on_missing_overlap: OverlapPolicy,

    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.api_key, &self.secret_key, &self.passphrase)
    }

    pub fn base_url(&self) -> BaseUrl {
        if self.sandbox {
            BaseUrl::Sandbox
        } else {
            BaseUrl::Mainnet
        }
    }

    pub fn request(&self) -> HistoryRequest {
        HistoryRequest::new(&self.market, self.granularity, self.num_days, self.delay)
    }

    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            output_dir: self.output_dir.clone(),
            overlap_policy: self.on_missing_overlap,
        }
    }
}

pub fn parse_granularity(s: &str) -> Result<u32, String> {
    let secs = u32::from_str(s.trim()).map_err(|e| format!("invalid granularity {s:?}: {e}"))?;
    if secs == 0 {
        return Err("granularity must be at least 1 second".into());
    }
    Ok(secs)
}

pub fn parse_num_days(s: &str) -> Result<u32, String> {
    u32::from_str(s.trim()).map_err(|e| format!("invalid num_days {s:?}: {e}"))
}

pub fn parse_delay(s: &str) -> Result<Duration, String> {
    let secs = f64::from_str(s.trim()).map_err(|e| format!("invalid delay {s:?}: {e}"))?;
    if !secs.is_finite() || secs < 0.0 {
        return Err("delay must be a non-negative number of seconds".into());
    }
    Ok(Duration::from_secs_f64(secs))
}
