// Grouped-snapshot strategy: one event per (deadline, size), rebuilt from scratch every run.

use crate::calendar::{describe, event_uid, Calendar, CalendarEvent};
use crate::domain::{NormalizedRecord, SizeCategory};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct GroupedCalendars {
    pub medium: Calendar,
    pub large: Calendar,
    /// Both size categories in one file.
    pub combined: Calendar,
}

impl GroupedCalendars {
    pub fn for_size(&self, size: SizeCategory) -> &Calendar {
        match size {
            SizeCategory::Medium => &self.medium,
            SizeCategory::Large => &self.large,
        }
    }
}

pub fn group_title(size: SizeCategory) -> String {
    format!("{}抽选截止", size.label())
}

pub fn build_grouped_calendars(
    records: &[NormalizedRecord],
    now: DateTime<Utc>,
) -> GroupedCalendars {
    let mut groups: BTreeMap<(i64, SizeCategory), Vec<&NormalizedRecord>> = BTreeMap::new();
    for record in records {
        groups
            .entry((record.deadline_timestamp, record.size))
            .or_default()
            .push(record);
    }

    let mut calendars = GroupedCalendars::default();

    for ((deadline_timestamp, size), members) in groups {
        // every member shares the deadline
        let deadline = members[0].deadline;

        let event = CalendarEvent {
            uid: event_uid(&format!(
                "group/{}/{}/{}",
                members[0].server,
                deadline_timestamp,
                size.code()
            )),
            dtstamp: now,
            summary: group_title(size),
            start: deadline,
            end: Some(deadline),
            description: describe(members.iter().map(|r| r.descriptor())),
        };

        calendars.combined.push(event.clone());
        match size {
            SizeCategory::Medium => calendars.medium.push(event),
            SizeCategory::Large => calendars.large.push(event),
        }
    }

    calendars
}
