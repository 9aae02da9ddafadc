// src/domain/timezone.rs

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};

/// Calendars are written in China Standard Time, which has no DST.
pub const DISPLAY_TZID: &str = "Asia/Shanghai";
pub const DISPLAY_OFFSET_SECS: i32 = 8 * 60 * 60;

pub fn display_offset() -> Option<FixedOffset> {
    FixedOffset::east_opt(DISPLAY_OFFSET_SECS)
}

/// Unix seconds to UTC+8. `None` when the timestamp is out of chrono's range.
pub fn to_display_time(timestamp: i64) -> Option<DateTime<FixedOffset>> {
    let offset = display_offset()?;
    DateTime::from_timestamp(timestamp, 0).map(|dt| dt.with_timezone(&offset))
}

/// Reads a wall-clock time that is known to be in UTC+8.
pub fn from_display_local(naive: &NaiveDateTime) -> Option<DateTime<FixedOffset>> {
    display_offset()?.from_local_datetime(naive).single()
}
