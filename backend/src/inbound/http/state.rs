//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` and so depend only
//! on domain services and ports, which keeps them testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{AttendanceLedger, IdentityProvider, ProfileStatusWriter};
use crate::domain::{AttendanceService, CheckinPolicy, StatusTransitionController};

/// Parameter object bundling the port implementations.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub identity: Arc<dyn IdentityProvider>,
    pub profile_writer: Arc<dyn ProfileStatusWriter>,
    /// `None` when no attendance system is configured.
    pub attendance_ledger: Option<Arc<dyn AttendanceLedger>>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub identity: Arc<dyn IdentityProvider>,
    pub controller: StatusTransitionController,
    pub attendance: AttendanceService,
}

impl HttpState {
    /// Wire the domain services over the supplied ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use checkin::domain::ports::{FixtureIdentityProvider, FixtureProfileStatusWriter};
    /// use checkin::domain::{AllowedDomain, CheckinPolicy, OfficeDirectory};
    /// use checkin::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let policy = CheckinPolicy::new(
    ///     OfficeDirectory::builtin(),
    ///     AllowedDomain::new("altenergy.co.jp").expect("domain"),
    /// );
    /// let state = HttpState::new(
    ///     HttpStatePorts {
    ///         identity: Arc::new(FixtureIdentityProvider::default()),
    ///         profile_writer: Arc::new(FixtureProfileStatusWriter),
    ///         attendance_ledger: None,
    ///     },
    ///     policy,
    ///     Arc::new(mockable::DefaultClock),
    /// );
    /// assert!(!state.attendance.is_enabled());
    /// ```
    pub fn new(ports: HttpStatePorts, policy: CheckinPolicy, clock: Arc<dyn Clock>) -> Self {
        let HttpStatePorts {
            identity,
            profile_writer,
            attendance_ledger,
        } = ports;
        Self {
            identity,
            controller: StatusTransitionController::new(Arc::new(policy), profile_writer),
            attendance: AttendanceService::new(attendance_ledger, clock),
        }
    }

    pub fn policy(&self) -> &CheckinPolicy {
        self.controller.policy()
    }
}
