mod driver;
mod snapshot;

pub use driver::{
    size_calendar_file, Pipeline, RunReport, ServerSummary, COMBINED_CALENDAR_FILE,
    MERGED_CALENDAR_FILE,
};
pub use snapshot::{FILTERED_FILE, PROCESSED_FILE};
