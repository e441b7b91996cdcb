//! Domain ports for the hexagonal boundary.
//!
//! Outbound adapters (Slack, HRMOS) implement these traits; the domain
//! services and HTTP handlers depend only on the trait objects.

mod macros;
pub(crate) use macros::define_port_error;

mod attendance_ledger;
mod identity_provider;
mod profile_status_writer;

#[cfg(test)]
pub use attendance_ledger::MockAttendanceLedger;
pub use attendance_ledger::{AttendanceLedger, AttendanceLedgerError, DayRecord, StampKind};
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{FixtureIdentityProvider, IdentityProvider, IdentityProviderError};
#[cfg(test)]
pub use profile_status_writer::MockProfileStatusWriter;
pub use profile_status_writer::{
    FixtureProfileStatusWriter, ProfileStatusError, ProfileStatusWriter,
};
