use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};
use reqwest::{
    header::{self, HeaderMap, HeaderValue},
    Client,
};

use crate::coinbase::{
    consts::USER_AGENT, sign::sign_request, BaseUrl, Credentials, Error, HistoricRatesRequest,
    HttpClient, Result, MAX_CANDLES_PER_REQUEST,
};
use crate::models::{Candle, Window};
use crate::services::CandleSource;

/// Authenticated client for the Coinbase Exchange REST API.
#[derive(Debug)]
pub struct CoinbaseClient {
    pub http_client: HttpClient,
    credentials: Credentials,
}

impl CoinbaseClient {
    pub fn new(client: Option<Client>, credentials: Credentials, base_url: Option<BaseUrl>) -> Self {
        let client = client.unwrap_or_default();
        let base_url = base_url.unwrap_or(BaseUrl::Mainnet).get_url();

        CoinbaseClient {
            http_client: HttpClient { client, base_url },
            credentials,
        }
    }

    fn auth_headers(&self, timestamp: &str, method: &str, request_path: &str) -> Result<HeaderMap> {
        let signature = sign_request(
            &self.credentials.secret_key,
            timestamp,
            method,
            request_path,
            "",
        )?;

        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
        headers.insert("cb-access-key", header_value(&self.credentials.api_key)?);
        headers.insert("cb-access-sign", header_value(&signature)?);
        headers.insert("cb-access-timestamp", header_value(timestamp)?);
        headers.insert("cb-access-passphrase", header_value(&self.credentials.passphrase)?);
        Ok(headers)
    }

    /// Candle rows for a product, newest first, as the exchange returns them.
    pub async fn get_product_historic_rates(
        &self,
        request: &HistoricRatesRequest,
    ) -> Result<Vec<Candle>> {
        let request_path = request.request_path();
        let timestamp = Utc::now().timestamp().to_string();
        let headers = self.auth_headers(&timestamp, "GET", &request_path)?;

        let data = self.http_client.get(&request_path, headers).await?;
        let candles: Vec<Candle> =
            serde_json::from_str(&data).map_err(|e| Error::JsonParse(e.to_string()))?;
        debug!("Received {} candles for {request_path}", candles.len());
        Ok(candles)
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| Error::GenericRequest(e.to_string()))
}

#[async_trait]
impl CandleSource for CoinbaseClient {
    async fn historic_rates(
        &self,
        market: &str,
        granularity: u32,
        window: Option<&Window>,
    ) -> crate::Result<Vec<Candle>> {
        if let Some(window) = window {
            let expected = window.seconds() / i64::from(granularity.max(1));
            if expected > MAX_CANDLES_PER_REQUEST {
                warn!(
                    "Window {}..{} spans {expected} candles, the exchange returns at most {MAX_CANDLES_PER_REQUEST}",
                    window.query_start(),
                    window.query_end()
                );
            }
        }

        let request = HistoricRatesRequest {
            product_id: market.to_string(),
            granularity,
            start: window.map(Window::query_start),
            end: window.map(Window::query_end),
        };
        Ok(self.get_product_historic_rates(&request).await?)
    }
}
