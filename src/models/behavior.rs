use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Formats tried, in order, after RFC 3339. The first is the MIND behavior log layout
/// (e.g. `11/15/2019 8:55:22 AM`).
const TIMESTAMP_FORMATS: &[&str] = &[
    "%m/%d/%Y %I:%M:%S %p",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// One logged user session from the behavior log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "BehaviorRow")]
pub struct BehaviorRecord {
    pub user_id: String,
    /// Raw session time as it appears in the source; may be missing or unparseable
    pub timestamp: Option<String>,
    /// Space-separated article IDs viewed as of this session
    pub history: Option<String>,
}

/// Behavior row as exported to JSON; MIND exports name the time column `time`
#[derive(Deserialize)]
struct BehaviorRow {
    user_id: String,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    time: Option<String>,
    #[serde(default)]
    history: Option<String>,
}

impl From<BehaviorRow> for BehaviorRecord {
    /// `timestamp` wins over `time` when a row carries both
    fn from(row: BehaviorRow) -> Self {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        Self {
            user_id: row.user_id.trim().to_string(),
            timestamp: non_empty(row.timestamp).or_else(|| non_empty(row.time)),
            history: row.history,
        }
    }
}

impl BehaviorRecord {
    pub fn new(
        user_id: impl Into<String>,
        timestamp: Option<&str>,
        history: Option<&str>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            timestamp: timestamp.map(str::to_string),
            history: history.map(str::to_string),
        }
    }

    /// Session time, or `None` when absent or not in a recognised format
    pub fn parsed_timestamp(&self) -> Option<NaiveDateTime> {
        self.timestamp.as_deref().and_then(parse_timestamp)
    }

    /// Viewed article IDs in log order, duplicates preserved
    pub fn history_ids(&self) -> impl Iterator<Item = &str> {
        self.history.as_deref().unwrap_or_default().split_whitespace()
    }
}

/// Parses a behavior log timestamp into a naive (zone-less) datetime.
///
/// Offsets in RFC 3339 input are normalised to UTC.
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_utc());
    }

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
