pub mod aggregate;
pub mod ics;
pub mod merge;
pub mod store;

pub use ics::{Calendar, CalendarEvent};

use base64::Engine;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Appended to every event description.
pub const DATA_SOURCE_LINE: &str = "数据来源https://house.ffxiv.cyou";

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("Calendar parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("Calendar event ending at line {line} is missing {name}")]
    MissingProperty { line: usize, name: &'static str },
    #[error("Calendar I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Stable UID for an event key, so regenerated calendars keep their identities.
pub fn event_uid(key: &str) -> String {
    let hash = Sha256::digest(key.as_bytes());
    let token = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(hash);
    format!("{token}@house.ffxiv.cyou")
}

/// Member lines followed by the data-source line.
pub fn describe<I>(lines: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let mut out: Vec<String> = lines.into_iter().collect();
    out.push(DATA_SOURCE_LINE.to_string());
    out.join("\n")
}
