use log::debug;
use reqwest::{header::HeaderMap, Client, Response};

use crate::coinbase::{Error, ErrorResponse, Result};

async fn parse_response(response: Response) -> Result<String> {
    let status_code = response.status().as_u16();
    let text = response
        .text()
        .await
        .map_err(|e| Error::GenericRequest(e.to_string()))?;

    if status_code < 400 {
        return Ok(text);
    }
    let message = serde_json::from_str::<ErrorResponse>(&text)
        .map(|error| error.message)
        .unwrap_or(text);
    if (400..500).contains(&status_code) {
        return Err(Error::ClientRequest {
            status_code,
            message,
        });
    }

    Err(Error::ServerRequest {
        status_code,
        message,
    })
}

#[derive(Debug)]
pub struct HttpClient {
    pub client: Client,
    pub base_url: String,
}

impl HttpClient {
    pub async fn get(&self, request_path: &str, headers: HeaderMap) -> Result<String> {
        let full_url = format!("{}{request_path}", self.base_url);
        debug!("GET {full_url}");
        let response = self
            .client
            .get(full_url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| Error::GenericRequest(e.to_string()))?;
        parse_response(response).await
    }
}
