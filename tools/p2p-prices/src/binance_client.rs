//! Binance P2P API client implementation
//!
//! This module provides a client for the advertisement search of Binance P2P.

use {
    crate::{
        error::PriceError,
        prices::{models::SearchRequest, BINANCE_P2P_API_BASE, SEARCH_ENDPOINT, UPSTREAM_TIMEOUT},
    },
    reqwest::{
        header::{
            HeaderMap,
            HeaderValue,
            ACCEPT,
            ACCEPT_LANGUAGE,
            CACHE_CONTROL,
            CONTENT_TYPE,
            ORIGIN,
            USER_AGENT,
        },
        Client,
    },
    serde_json::Value,
    std::time::Duration,
};

/// The search endpoint is internal to the Binance web app and only answers
/// requests that look like they come from a browser.
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Binance P2P API client for making requests
pub struct BinanceP2pClient {
    /// HTTP client for making requests
    client: Client,
    /// Base URL for Binance P2P API
    base_url: String,
    /// Timeout for a whole request, including reading the body
    timeout: Duration,
}

impl BinanceP2pClient {
    /// Creates a new Binance P2P client instance
    pub fn new(base_url: Option<&str>, timeout: Option<Duration>) -> Self {
        let base_url = base_url
            .unwrap_or(BINANCE_P2P_API_BASE)
            .trim_end_matches('/')
            .to_string();

        Self {
            client: Client::new(),
            base_url,
            timeout: timeout.unwrap_or(UPSTREAM_TIMEOUT),
        }
    }

    /// Posts an advertisement search and returns the decoded JSON body.
    ///
    /// The body is returned as a raw [Value] so that single malformed
    /// advertisements can be skipped instead of failing the whole search.
    pub async fn search(&self, request: &SearchRequest) -> Result<Value, PriceError> {
        let url = format!("{}/{}", self.base_url, SEARCH_ENDPOINT);

        let response = self
            .client
            .post(&url)
            .headers(browser_headers())
            .timeout(self.timeout)
            .json(request)
            .send()
            .await
            .map_err(PriceError::from_network_error)?;

        let status = response.status();

        let response = response
            .error_for_status()
            .map_err(PriceError::from_network_error)?;

        let text = response
            .text()
            .await
            .map_err(PriceError::from_network_error)?;

        log::debug!("Binance P2P answered {} with {} bytes", status, text.len());

        serde_json::from_str::<Value>(&text)
            .map_err(|e| PriceError::UpstreamMalformedResponse(e.to_string()))
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();

    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("es-ES,es;q=0.9,en;q=0.8"),
    );
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ORIGIN, HeaderValue::from_static(BINANCE_P2P_API_BASE));
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));

    headers
}
