use crate::calendar::aggregate::build_grouped_calendars;
use crate::calendar::merge::{merge_records, MergeSummary};
use crate::calendar::store::{load_calendar, save_calendar};
use crate::config::Strategy;
use crate::domain::{NormalizedRecord, Normalizer, SizeCategory};
use crate::errors::PipelineError;
use crate::fetcher::{RawSaleRecord, SalesSource};
use crate::pipeline::snapshot::{write_json, FILTERED_FILE, PROCESSED_FILE};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

pub const COMBINED_CALENDAR_FILE: &str = "calendar.ics";
pub const MERGED_CALENDAR_FILE: &str = "lottery_calendar.ics";

pub fn size_calendar_file(size: SizeCategory) -> String {
    format!("{}_抽选截止.ics", size.label().to_lowercase())
}

#[derive(Debug)]
pub struct ServerSummary {
    pub server_id: u32,
    pub fetched: usize,
    pub kept: usize,
    pub normalized: usize,
    pub files: Vec<PathBuf>,
    pub merge: Option<MergeSummary>,
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub succeeded: Vec<ServerSummary>,
    pub failed: Vec<(u32, PipelineError)>,
}

pub struct Pipeline<S: SalesSource> {
    source: S,
    normalizer: Normalizer,
    output_dir: PathBuf,
    strategy: Strategy,
}

impl<S: SalesSource> Pipeline<S> {
    pub fn new(source: S, normalizer: Normalizer, output_dir: PathBuf, strategy: Strategy) -> Self {
        Self {
            source,
            normalizer,
            output_dir,
            strategy,
        }
    }

    pub fn server_dir(&self, server_id: u32) -> PathBuf {
        self.output_dir.join(server_id.to_string())
    }

    /// Processes every server in order. A failing server is logged and skipped.
    pub fn run(&self, server_ids: &[u32], now: DateTime<Utc>) -> RunReport {
        let mut report = RunReport::default();

        for &server_id in server_ids {
            let server_name = self.normalizer.tables().server_name(server_id);

            match self.run_server(server_id, now) {
                Ok(summary) => {
                    tracing::info!(
                        server_id,
                        server_name,
                        fetched = summary.fetched,
                        kept = summary.kept,
                        normalized = summary.normalized,
                        files = summary.files.len(),
                        merge = ?summary.merge,
                        dir = %self.server_dir(server_id).display(),
                        "server files generated"
                    );
                    report.succeeded.push(summary);
                }
                Err(e) => {
                    tracing::error!(server_id, server_name, error = %e, "server failed");
                    report.failed.push((server_id, e));
                }
            }
        }

        report
    }

    pub fn run_server(
        &self,
        server_id: u32,
        now: DateTime<Utc>,
    ) -> Result<ServerSummary, PipelineError> {
        let records = self.source.fetch_sales(server_id)?;
        let fetched = records.len();

        let filtered: Vec<RawSaleRecord> = records
            .into_iter()
            .filter(RawSaleRecord::is_tracked_size)
            .collect();

        let dir = self.server_dir(server_id);
        let mut files = Vec::new();

        let filtered_path = dir.join(FILTERED_FILE);
        write_json(&filtered_path, &filtered)?;
        files.push(filtered_path);

        let normalized = self.normalizer.normalize_all(&filtered);
        let processed_path = dir.join(PROCESSED_FILE);
        write_json(&processed_path, &normalized)?;
        files.push(processed_path);

        let merge = match self.strategy {
            Strategy::Grouped => {
                let calendars = build_grouped_calendars(&normalized, now);

                for size in [SizeCategory::Medium, SizeCategory::Large] {
                    let path = dir.join(size_calendar_file(size));
                    save_calendar(&path, calendars.for_size(size))?;
                    files.push(path);
                }

                let path = dir.join(COMBINED_CALENDAR_FILE);
                save_calendar(&path, &calendars.combined)?;
                files.push(path);
                None
            }
            Strategy::Merge => {
                let path = dir.join(MERGED_CALENDAR_FILE);
                let summary = merge_calendar_file(&path, &normalized, now)?;
                files.push(path);
                Some(summary)
            }
        };

        Ok(ServerSummary {
            server_id,
            fetched,
            kept: filtered.len(),
            normalized: normalized.len(),
            files,
            merge,
        })
    }
}

/// Load, merge, write back. The file is rewritten even when nothing changed;
/// the output is byte-identical in that case.
pub fn merge_calendar_file(
    path: &Path,
    records: &[NormalizedRecord],
    now: DateTime<Utc>,
) -> Result<MergeSummary, PipelineError> {
    let mut calendar = load_calendar(path)?;
    let summary = merge_records(&mut calendar, records, now);

    if summary.changed() {
        tracing::info!(
            created = summary.created,
            updated = summary.updated,
            unchanged = summary.unchanged,
            "calendar updated"
        );
    } else {
        tracing::debug!(unchanged = summary.unchanged, "calendar already up to date");
    }

    save_calendar(path, &calendar)?;
    Ok(summary)
}
