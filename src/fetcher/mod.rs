mod fetch_error;
mod fetcher;
mod models;

pub use fetch_error::FetchError;
pub use fetcher::{parse_sales, SalesFetcher, SalesSource, DEFAULT_API_BASE, DEFAULT_USER_AGENT};
pub use models::RawSaleRecord;
