//! Driven port for the attendance (time-clock) system.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate};

use super::define_port_error;
use crate::domain::AttendanceUserId;

define_port_error! {
    /// Errors raised by attendance-system adapters.
    pub enum AttendanceLedgerError {
        /// Obtaining a short-lived API token failed.
        Authentication { message: String } => "attendance authentication failed: {message}",
        /// Network transport failed or timed out.
        Transport { message: String } => "attendance transport failed: {message}",
        /// The system answered with a non-success status.
        Status { status: u16, message: String } =>
            "attendance request failed with status {status}: {message}",
        /// The response body could not be decoded.
        Decode { message: String } => "attendance response decode failed: {message}",
    }
}

/// Kind of time-clock stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StampKind {
    /// Start of the working day.
    Arrival,
    /// End of the working day.
    Departure,
}

impl StampKind {
    /// Numeric stamp type used on the wire.
    pub fn code(self) -> u8 {
        match self {
            Self::Arrival => 1,
            Self::Departure => 2,
        }
    }
}

/// What the attendance system already holds for one user and day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayRecord {
    /// An arrival stamp exists.
    pub started: bool,
    /// A departure stamp exists.
    pub ended: bool,
}

impl DayRecord {
    /// True when a stamp of `kind` is already recorded.
    pub fn has(self, kind: StampKind) -> bool {
        match kind {
            StampKind::Arrival => self.started,
            StampKind::Departure => self.ended,
        }
    }
}

/// Port over the attendance system's user directory and stamp log.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceLedger: Send + Sync {
    /// Find the attendance user whose email matches exactly.
    async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AttendanceUserId>, AttendanceLedgerError>;

    /// Today's record for `user`, or `None` when the day has no entry.
    async fn day_record(
        &self,
        user: AttendanceUserId,
        date: NaiveDate,
    ) -> Result<Option<DayRecord>, AttendanceLedgerError>;

    /// Record a stamp of `kind` at `at`.
    async fn stamp(
        &self,
        user: AttendanceUserId,
        kind: StampKind,
        at: DateTime<FixedOffset>,
    ) -> Result<(), AttendanceLedgerError>;
}
