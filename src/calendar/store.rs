use crate::calendar::{Calendar, CalendarError};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Loads a calendar file, or an empty calendar if there is none yet.
pub fn load_calendar(path: &Path) -> Result<Calendar, CalendarError> {
    match fs::read_to_string(path) {
        Ok(text) => Calendar::parse(&text),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Calendar::new()),
        Err(e) => Err(e.into()),
    }
}

pub fn save_calendar(path: &Path, calendar: &Calendar) -> Result<(), CalendarError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, calendar.to_ics())?;
    Ok(())
}
