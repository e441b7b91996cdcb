//! JSON response bodies for the check-in endpoints.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{
    AttendanceStatus, CheckinTarget, OfficeRecord, ProfileStatus, UserSession, WorkLocation,
};

/// Office shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OfficeView {
    #[schema(example = "39.110.215.6")]
    pub network_address: String,
    #[schema(example = "銀座オフィス")]
    pub display_name: String,
    #[schema(example = ":office:")]
    pub emoji: String,
    #[schema(example = "銀座オフィスで勤務中")]
    pub status_text: String,
}

impl From<&OfficeRecord> for OfficeView {
    fn from(office: &OfficeRecord) -> Self {
        Self {
            network_address: office.network_address().to_owned(),
            display_name: office.display_name().to_owned(),
            emoji: office.emoji().to_owned(),
            status_text: office.status_text().to_owned(),
        }
    }
}

/// Off-site location option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationView {
    #[schema(example = "remote")]
    pub key: String,
    #[schema(example = "リモートワーク")]
    pub display_name: String,
    #[schema(example = ":heads-down:")]
    pub emoji: String,
    #[schema(example = "リモートワーク中")]
    pub status_text: String,
}

impl From<&WorkLocation> for LocationView {
    fn from(location: &WorkLocation) -> Self {
        Self {
            key: location.key().to_owned(),
            display_name: location.display_name().to_owned(),
            emoji: location.emoji().to_owned(),
            status_text: location.status_text().to_owned(),
        }
    }
}

/// Profile status as written to Slack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusView {
    pub status_text: String,
    pub status_emoji: String,
}

impl From<&ProfileStatus> for StatusView {
    fn from(status: &ProfileStatus) -> Self {
        Self {
            status_text: status.status_text().to_owned(),
            status_emoji: status.status_emoji().to_owned(),
        }
    }
}

/// Outcome kind of a check-in call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Success,
}

/// Body returned by `POST /checkin`, `/checkin_other` and `/checkout`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckinResponse {
    #[schema(example = "銀座オフィスで出勤しました / HRMOS出勤打刻完了")]
    pub message: String,
    pub message_type: MessageType,
    pub status: StatusView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub office: Option<OfficeView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationView>,
    /// Attendance flags read back after stamping.
    pub attendance: AttendanceView,
}

impl CheckinResponse {
    pub fn success(
        message: String,
        status: &ProfileStatus,
        target: Option<&CheckinTarget>,
        attendance: AttendanceView,
    ) -> Self {
        let (office, location) = match target {
            Some(CheckinTarget::Office(office)) => (Some(office.into()), None),
            Some(CheckinTarget::Location(location)) => (None, Some(location.into())),
            None => (None, None),
        };
        Self {
            message,
            message_type: MessageType::Success,
            status: status.into(),
            office,
            location,
            attendance,
        }
    }
}

/// Signed-in user summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    #[schema(example = "U0123ABCD")]
    pub id: String,
    #[schema(example = "山田 花子")]
    pub name: String,
    #[schema(example = "hanako@altenergy.co.jp")]
    pub email: String,
}

impl From<&UserSession> for UserView {
    fn from(user: &UserSession) -> Self {
        Self {
            id: user.user_id().to_owned(),
            name: user.display_name().to_owned(),
            email: user.email().as_str().to_owned(),
        }
    }
}

/// Attendance flags on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceView {
    /// An attendance system is configured.
    pub enabled: bool,
    /// The user is linked to an attendance account.
    pub linked: bool,
    pub checked_in: bool,
    pub checked_out: bool,
}

impl AttendanceView {
    pub fn new(enabled: bool, linked: bool, status: AttendanceStatus) -> Self {
        Self {
            enabled,
            linked,
            checked_in: status.checked_in,
            checked_out: status.checked_out,
        }
    }
}

/// Body returned by `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub user: UserView,
    #[schema(example = "39.110.215.6")]
    pub client_address: Option<String>,
    /// Office matching the client address, if any.
    pub office: Option<OfficeView>,
    pub locations: Vec<LocationView>,
    pub attendance: AttendanceView,
}
