pub const MAINNET_API_URL: &str = "https://api.exchange.coinbase.com";
pub const SANDBOX_API_URL: &str = "https://api-public.sandbox.exchange.coinbase.com";

/// Most candles a single historic rates request returns.
pub const MAX_CANDLES_PER_REQUEST: i64 = 300;

/// Granularities, in seconds, the candles endpoint accepts.
pub const SUPPORTED_GRANULARITIES: [u32; 6] = [60, 300, 900, 3600, 21600, 86400];

pub(crate) const USER_AGENT: &str = concat!("candle-history/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseUrl {
    Mainnet,
    Sandbox,
}

impl BaseUrl {
    pub fn get_url(&self) -> String {
        match self {
            BaseUrl::Mainnet => MAINNET_API_URL.to_string(),
            BaseUrl::Sandbox => SANDBOX_API_URL.to_string(),
        }
    }
}

pub fn is_supported_granularity(granularity: u32) -> bool {
    SUPPORTED_GRANULARITIES.contains(&granularity)
}
