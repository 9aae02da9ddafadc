use crate::errors::PipelineError;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs;
use std::path::Path;

pub const FILTERED_FILE: &str = "filtered_data.json";
pub const PROCESSED_FILE: &str = "processed_data.json";

/// Pretty JSON with a 4-space indent. serde_json leaves non-ASCII text as-is.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;

    fs::write(path, buf)?;
    Ok(())
}
