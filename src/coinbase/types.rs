use std::fmt;

use serde::Deserialize;

/// API credentials for the authenticated client.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub secret_key: String,
    pub passphrase: String,
}

impl Credentials {
    pub fn new(api_key: &str, secret_key: &str, passphrase: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            secret_key: secret_key.to_string(),
            passphrase: passphrase.to_string(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("secret_key", &"<redacted>")
            .field("passphrase", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoricRatesRequest {
    pub product_id: String,
    pub granularity: u32,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl HistoricRatesRequest {
    /// Path and query exactly as sent; this is also what gets signed.
    pub fn request_path(&self) -> String {
        let mut path = format!(
            "/products/{}/candles?granularity={}",
            self.product_id, self.granularity
        );
        if let Some(start) = &self.start {
            path.push_str(&format!("&start={start}"));
        }
        if let Some(end) = &self.end {
            path.push_str(&format!("&end={end}"));
        }
        path
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct ErrorResponse {
    pub message: String,
}
