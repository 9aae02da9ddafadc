// src/domain/record.rs

use crate::domain::cycle::CycleRule;
use crate::domain::lookup::LookupTables;
use crate::domain::timezone::to_display_time;
use crate::fetcher::RawSaleRecord;
use chrono::{DateTime, FixedOffset};
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SizeCategory {
    Medium,
    Large,
}

impl SizeCategory {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(SizeCategory::Medium),
            2 => Some(SizeCategory::Large),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            SizeCategory::Medium => 1,
            SizeCategory::Large => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SizeCategory::Medium => "M房",
            SizeCategory::Large => "L房",
        }
    }
}

impl Serialize for SizeCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.code())
    }
}

/// What makes two sightings "the same lot" within one server's calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LotIdentity {
    pub area: i64,
    pub slot: i64,
    pub id: i64,
    pub region_type: i64,
}

/// A sale record with names resolved and its deadline computed.
/// This is what `processed_data.json` holds and what both calendar strategies consume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    #[serde(rename = "Area")]
    pub area: i64,
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Slot")]
    pub slot: i64,
    #[serde(rename = "RegionType")]
    pub region_type: i64,
    #[serde(rename = "Size")]
    pub size: SizeCategory,
    #[serde(rename = "Server")]
    pub server: u32,

    #[serde(rename = "ServerName")]
    pub server_name: String,
    #[serde(rename = "AreaName")]
    pub area_name: String,
    #[serde(rename = "RegionTypeName")]
    pub region_type_name: String,

    /// `FirstSeen`, else `LastSeen`. Recorded even when a non-zero `EndTime` set the deadline.
    #[serde(rename = "Observed")]
    pub observed: Option<i64>,
    #[serde(rename = "Purchase_endtime")]
    pub deadline_timestamp: i64,
    #[serde(rename = "Deadline")]
    pub deadline: DateTime<FixedOffset>,
}

impl NormalizedRecord {
    pub fn slot_description(&self) -> String {
        format!("{}区", self.slot.saturating_add(1))
    }

    pub fn id_description(&self) -> String {
        format!("{}号", self.id.saturating_add(1))
    }

    /// e.g. `拉诺西亚 - 海雾村 - 3区 - 6号 - 部队`
    pub fn descriptor(&self) -> String {
        format!(
            "{} - {} - {} - {} - {}",
            self.server_name,
            self.area_name,
            self.slot_description(),
            self.id_description(),
            self.region_type_name
        )
    }

    pub fn identity(&self) -> LotIdentity {
        LotIdentity {
            area: self.area,
            slot: self.slot,
            id: self.id,
            region_type: self.region_type,
        }
    }

    /// Start of the merged per-lot event: when the lot was seen, never later than the deadline.
    pub fn observed_or_deadline(&self) -> DateTime<FixedOffset> {
        self.observed
            .and_then(to_display_time)
            .map(|seen| seen.min(self.deadline))
            .unwrap_or(self.deadline)
    }
}

pub struct Normalizer {
    tables: LookupTables,
    rule: CycleRule,
}

impl Normalizer {
    pub fn new(tables: LookupTables, rule: CycleRule) -> Self {
        Self { tables, rule }
    }

    pub fn tables(&self) -> &LookupTables {
        &self.tables
    }

    /// Returns `None` for records that cannot be placed on a calendar:
    /// untracked sizes, or no usable timestamp.
    pub fn normalize(&self, raw: &RawSaleRecord) -> Option<NormalizedRecord> {
        let size = SizeCategory::from_code(raw.size)?;

        let observed = raw
            .first_seen
            .filter(|t| *t > 0)
            .or(raw.last_seen.filter(|t| *t > 0));

        let deadline_timestamp = match raw.end_time.filter(|t| *t > 0) {
            Some(end) => end,
            None => self.rule.deadline(observed?)?,
        };
        let deadline = to_display_time(deadline_timestamp)?;

        Some(NormalizedRecord {
            area: raw.area,
            id: raw.id,
            slot: raw.slot,
            region_type: raw.region_type,
            size,
            server: raw.server,
            server_name: self.tables.server_name(raw.server).to_string(),
            area_name: self.tables.area_name(raw.area).to_string(),
            region_type_name: self.tables.region_type_name(raw.region_type).to_string(),
            observed,
            deadline_timestamp,
            deadline,
        })
    }

    /// Normalizes a batch, silently dropping what cannot be placed.
    pub fn normalize_all(&self, records: &[RawSaleRecord]) -> Vec<NormalizedRecord> {
        let normalized: Vec<NormalizedRecord> =
            records.iter().filter_map(|r| self.normalize(r)).collect();

        let dropped = records.len() - normalized.len();
        if dropped > 0 {
            tracing::debug!(dropped, "records without a usable timestamp were skipped");
        }

        normalized
    }
}
