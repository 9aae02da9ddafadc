// fetcher.rs
use crate::fetcher::{FetchError, RawSaleRecord};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::time::{Duration, Instant};
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://house.ffxiv.cyou/api/sales";

pub const DEFAULT_USER_AGENT: &str = concat!("house_calendar/", env!("CARGO_PKG_VERSION"));

/// Where the pipeline gets its sale records from.
/// The real implementation is `SalesFetcher`; tests plug in fixed data.
pub trait SalesSource {
    fn fetch_sales(&self, server_id: u32) -> Result<Vec<RawSaleRecord>, FetchError>;
}

pub struct SalesFetcher {
    client: Client,
    api_base: Url,
}

impl SalesFetcher {
    pub fn new(api_base: &str, user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let api_base = Url::parse(api_base).map_err(|e| FetchError::Url(e.to_string()))?;

        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self { client, api_base })
    }

    pub fn sales_url(&self, server_id: u32) -> Url {
        let mut url = self.api_base.clone();
        url.query_pairs_mut()
            .append_pair("server", &server_id.to_string());
        url
    }

    fn fetch_body(&self, server_id: u32) -> Result<String, FetchError> {
        let url = self.sales_url(server_id);
        let start = Instant::now();

        let resp = self
            .client
            .get(url.as_str())
            .send()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = resp.status();
        tracing::debug!(server_id, %status, elapsed = ?start.elapsed(), "sales request finished");

        // Only a plain 200 counts as success.
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                server_id,
                status: status.as_u16(),
            });
        }

        resp.text().map_err(|e| FetchError::Network(e.to_string()))
    }
}

impl SalesSource for SalesFetcher {
    fn fetch_sales(&self, server_id: u32) -> Result<Vec<RawSaleRecord>, FetchError> {
        let body = self.fetch_body(server_id)?;
        parse_sales(&body)
    }
}

pub fn parse_sales(body: &str) -> Result<Vec<RawSaleRecord>, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::JsonParse(e.to_string()))
}
