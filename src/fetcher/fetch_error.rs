use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Unexpected HTTP status {status} for server {server_id}")]
    Status { server_id: u32, status: u16 },
    #[error("JSON parse error: {0}")]
    JsonParse(String),
    #[error("Invalid request url: {0}")]
    Url(String),
}
