use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{DateKey, DeviceId, Difficulty, Grid};

pub type NotesPayload = Vec<Vec<Vec<u8>>>;

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyPuzzle {
    pub grid: Grid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_grid: Option<Grid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<NotesPayload>,
    #[serde(default)]
    pub elapsed_time: u64,
    #[serde(default)]
    pub completed: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<u64>,
    #[serde(default = "default_true")]
    pub session_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

impl DailyPuzzle {
    pub fn is_completed(&self) -> bool {
        self.completed == 1
    }

    pub fn is_expired(&self) -> bool {
        !self.session_active && !self.is_completed()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRequest {
    pub device_id: DeviceId,
    pub date: DateKey,
    pub grid: Grid,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub rank: u32,
    pub total: u32,
    pub percentile: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResponse {
    pub correct: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed_time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranking: Option<Ranking>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistProgressRequest {
    pub device_id: DeviceId,
    pub date: DateKey,
    pub user_grid: Grid,
    pub elapsed_time: u64,
    #[serde(default)]
    pub notes: Option<NotesPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: DateKey,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub completed: u8,
    #[serde(default)]
    pub elapsed_time: u64,
    #[serde(default)]
    pub completion_time: Option<u64>,
    #[serde(default, deserialize_with = "utc_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// The service stores naive UTC timestamps and emits them without an offset.
fn utc_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(with_offset.with_timezone(&Utc)));
    }
    raw.parse::<NaiveDateTime>()
        .map(|naive| Some(naive.and_utc()))
        .map_err(serde::de::Error::custom)
}
