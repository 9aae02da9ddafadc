// Stateful-merge strategy: one long-lived event per lot, deadlines only ever move forward.

use crate::calendar::{describe, event_uid, Calendar, CalendarEvent};
use crate::domain::lookup::{UNKNOWN_AREA, UNKNOWN_REGION_TYPE};
use crate::domain::NormalizedRecord;
use chrono::{DateTime, Utc};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeSummary {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
}

impl MergeSummary {
    pub fn changed(&self) -> bool {
        self.created + self.updated > 0
    }
}

/// e.g. `L房 海雾村 3区6号 部队 抽选截止`. Events are matched on this title, so it
/// must be unique per (area, slot, id, region type): unknown codes keep their raw value.
pub fn lot_title(record: &NormalizedRecord) -> String {
    format!(
        "{} {} {}{} {} 抽选截止",
        record.size.label(),
        name_or_code(&record.area_name, UNKNOWN_AREA, record.area),
        record.slot_description(),
        record.id_description(),
        name_or_code(&record.region_type_name, UNKNOWN_REGION_TYPE, record.region_type)
    )
}

fn name_or_code(name: &str, placeholder: &str, code: i64) -> String {
    if name == placeholder {
        format!("{placeholder}({code})")
    } else {
        name.to_string()
    }
}

fn lot_uid(record: &NormalizedRecord) -> String {
    let key = record.identity();
    event_uid(&format!(
        "lot/{}/{}/{}/{}/{}",
        record.server, key.area, key.slot, key.id, key.region_type
    ))
}

/// Folds `records` into `calendar`. An existing event is only touched when the new
/// deadline is strictly later than its current end, so replaying the same data is a no-op.
pub fn merge_records(
    calendar: &mut Calendar,
    records: &[NormalizedRecord],
    now: DateTime<Utc>,
) -> MergeSummary {
    let mut summary = MergeSummary::default();

    for record in records {
        let title = lot_title(record);
        let deadline = record.deadline;

        match calendar.find_by_summary_mut(&title) {
            Some(existing) => {
                let is_later = existing.end.map_or(true, |end| deadline > end);
                if is_later {
                    tracing::debug!(%title, %deadline, "extending lot deadline");
                    existing.end = Some(deadline);
                    existing.description = describe([record.descriptor()]);
                    existing.dtstamp = now;
                    summary.updated += 1;
                } else {
                    summary.unchanged += 1;
                }
            }
            None => {
                calendar.push(CalendarEvent {
                    uid: lot_uid(record),
                    dtstamp: now,
                    summary: title,
                    start: record.observed_or_deadline(),
                    end: Some(deadline),
                    description: describe([record.descriptor()]),
                });
                summary.created += 1;
            }
        }
    }

    summary
}
