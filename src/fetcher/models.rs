use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// [
//  {
//    "Server": 1042,
//    "Area": 0,          0..=4, see domain::lookup
//    "Slot": 2,          zero-based ward
//    "ID": 5,            zero-based plot
//    "Size": 2,          1 = M, 2 = L
//    "RegionType": 1,    1 = free company, 2 = individual, 0 = other
//    "FirstSeen": 1719849600,
//    "LastSeen": 1719936000,
//    "EndTime": 0,       0 when the sale end is unknown
//    "State": 1,
//    ...
//  }
// ]

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawSaleRecord {
    #[serde(rename = "Server")]
    pub server: u32,
    #[serde(rename = "Area")]
    pub area: i64,
    #[serde(rename = "Slot")]
    pub slot: i64,
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "RegionType")]
    pub region_type: i64,
    #[serde(rename = "Size")]
    pub size: i64,

    #[serde(rename = "FirstSeen", default, deserialize_with = "lenient_timestamp")]
    pub first_seen: Option<i64>,
    #[serde(rename = "LastSeen", default, deserialize_with = "lenient_timestamp")]
    pub last_seen: Option<i64>,
    #[serde(rename = "EndTime", default, deserialize_with = "lenient_timestamp")]
    pub end_time: Option<i64>,

    #[serde(rename = "State", default, skip_serializing_if = "Option::is_none")]
    pub state: Option<Value>,

    // Anything else the API sends is carried through to filtered_data.json untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawSaleRecord {
    /// Only medium (1) and large (2) lots are tracked.
    pub fn is_tracked_size(&self) -> bool {
        matches!(self.size, 1 | 2)
    }
}

/// Accepts numbers and numeric strings. Anything else is treated as "no timestamp"
/// so a single bad field never fails the whole batch.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(timestamp_from_value))
}

fn timestamp_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}
