//! Wire DTOs for the HRMOS attendance API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::ports::DayRecord;

#[derive(Debug, Deserialize)]
pub(super) struct TokenDto {
    pub(super) token: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct UserDto {
    pub(super) id: i64,
    pub(super) email: Option<String>,
}

/// One row of `work_outputs/daily/{date}`.
///
/// Time fields are only checked for presence; HRMOS returns them as strings
/// or `null`.
#[derive(Debug, Deserialize)]
pub(super) struct WorkOutputDto {
    pub(super) user_id: i64,
    #[serde(default)]
    pub(super) start_at: Option<Value>,
    #[serde(default)]
    pub(super) stamping_start_at: Option<Value>,
    #[serde(default)]
    pub(super) end_at: Option<Value>,
    #[serde(default)]
    pub(super) stamping_end_at: Option<Value>,
}

impl WorkOutputDto {
    pub(super) fn to_day_record(&self) -> DayRecord {
        DayRecord {
            started: self.start_at.is_some() || self.stamping_start_at.is_some(),
            ended: self.end_at.is_some() || self.stamping_end_at.is_some(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct StampLogRequestDto {
    pub(super) user_id: i64,
    pub(super) stamp_type: u8,
    pub(super) datetime: String,
}
