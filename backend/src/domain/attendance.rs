//! Attendance stamping that follows a successful status transition.
//!
//! The attendance system is optional. When it is not configured, or the
//! session has no linked attendance user, every operation is a no-op. Errors
//! from the attendance system are logged and reported in the response
//! message but never fail the request.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate};
use mockable::Clock;
use serde::Serialize;

use crate::domain::ports::{AttendanceLedger, StampKind};
use crate::domain::{AttendanceUserId, EmailAddress};

/// Japan Standard Time; the attendance system keys days by JST date.
pub const JST: FixedOffset = match FixedOffset::east_opt(9 * 3600) {
    Some(offset) => offset,
    None => panic!("JST offset is in range"),
};

/// Result of an attendance stamp attempt, rendered as a message suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceNote {
    /// Attendance is not configured or the user is not linked.
    Skipped,
    /// A new stamp was recorded.
    Recorded(StampKind),
    /// A stamp of this kind already existed for today.
    AlreadyRecorded(StampKind),
    /// The attendance system failed.
    Failed,
}

impl AttendanceNote {
    /// Text appended to the check-in or check-out message.
    ///
    /// # Examples
    /// ```
    /// use checkin::domain::AttendanceNote;
    /// use checkin::domain::ports::StampKind;
    ///
    /// assert_eq!(AttendanceNote::Skipped.suffix(), "");
    /// assert_eq!(
    ///     AttendanceNote::Recorded(StampKind::Arrival).suffix(),
    ///     " / HRMOS出勤打刻完了"
    /// );
    /// ```
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Skipped => "",
            Self::Recorded(StampKind::Arrival) => " / HRMOS出勤打刻完了",
            Self::Recorded(StampKind::Departure) => " / HRMOS退勤打刻完了",
            Self::AlreadyRecorded(StampKind::Arrival) => " / 勤務地を更新しました",
            Self::AlreadyRecorded(StampKind::Departure) => " / 既に退勤打刻済みです",
            Self::Failed => " / HRMOS打刻エラー",
        }
    }
}

/// Today's attendance flags shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStatus {
    pub checked_in: bool,
    pub checked_out: bool,
}

/// Coordinates user linking and stamping against the attendance ledger.
#[derive(Clone)]
pub struct AttendanceService {
    ledger: Option<Arc<dyn AttendanceLedger>>,
    clock: Arc<dyn Clock>,
}

impl AttendanceService {
    /// Service backed by `ledger`; `None` disables attendance entirely.
    pub fn new(ledger: Option<Arc<dyn AttendanceLedger>>, clock: Arc<dyn Clock>) -> Self {
        Self { ledger, clock }
    }

    /// Service with no attendance system configured.
    pub fn disabled(clock: Arc<dyn Clock>) -> Self {
        Self::new(None, clock)
    }

    pub fn is_enabled(&self) -> bool {
        self.ledger.is_some()
    }

    fn now(&self) -> DateTime<FixedOffset> {
        self.clock.utc().with_timezone(&JST)
    }

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// Find the attendance user for `email`.
    ///
    /// Lookup failures are logged and yield `None` so login can proceed.
    pub async fn link(&self, email: &EmailAddress) -> Option<AttendanceUserId> {
        let ledger = self.ledger.as_ref()?;
        match ledger.find_user_by_email(email.as_str()).await {
            Ok(Some(user)) => {
                tracing::info!(attendance_user_id = %user, "attendance user linked");
                Some(user)
            }
            Ok(None) => {
                tracing::info!("no attendance user matches the login email");
                None
            }
            Err(error) => {
                tracing::warn!(error = %error, "attendance user lookup failed");
                None
            }
        }
    }

    /// Today's flags for the dashboard; unavailable data reads as unstamped.
    pub async fn status(&self, user: Option<AttendanceUserId>) -> AttendanceStatus {
        let (Some(ledger), Some(user)) = (self.ledger.as_ref(), user) else {
            return AttendanceStatus::default();
        };
        match ledger.day_record(user, self.today()).await {
            Ok(Some(record)) => AttendanceStatus {
                checked_in: record.started,
                checked_out: record.ended,
            },
            Ok(None) => AttendanceStatus::default(),
            Err(error) => {
                tracing::warn!(attendance_user_id = %user, error = %error, "attendance status lookup failed");
                AttendanceStatus::default()
            }
        }
    }

    /// Stamp `kind` unless today's record already holds one.
    ///
    /// A failed lookup of today's record is logged and treated as "nothing
    /// stamped yet" so the stamp is still attempted.
    pub async fn record(&self, user: Option<AttendanceUserId>, kind: StampKind) -> AttendanceNote {
        let (Some(ledger), Some(user)) = (self.ledger.as_ref(), user) else {
            return AttendanceNote::Skipped;
        };

        let now = self.now();
        match ledger.day_record(user, now.date_naive()).await {
            Ok(Some(record)) if record.has(kind) => {
                tracing::info!(attendance_user_id = %user, ?kind, "attendance already stamped");
                return AttendanceNote::AlreadyRecorded(kind);
            }
            Ok(_) => {}
            Err(error) => {
                tracing::warn!(attendance_user_id = %user, error = %error, "attendance record lookup failed");
            }
        }

        match ledger.stamp(user, kind, now).await {
            Ok(()) => {
                tracing::info!(attendance_user_id = %user, ?kind, "attendance stamped");
                AttendanceNote::Recorded(kind)
            }
            Err(error) => {
                tracing::warn!(attendance_user_id = %user, ?kind, error = %error, "attendance stamp failed");
                AttendanceNote::Failed
            }
        }
    }
}

#[cfg(test)]
#[path = "attendance_tests.rs"]
mod tests;
