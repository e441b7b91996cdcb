//! Domain primitives, policies and services.
//!
//! Purpose: hold the transport-agnostic core of the check-in service. The
//! office table and work locations are immutable after start-up; the status
//! transition controller and attendance service reach the outside world only
//! through the traits in [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode — API error payload and stable identifier.
//! - OfficeDirectory / OfficeRecord — office table and origin resolver.
//! - WorkLocations / WorkLocation — selectable off-site locations.
//! - StatusTransitionController — decides and writes profile statuses.
//! - AttendanceService — optional attendance stamping.

pub mod attendance;
pub mod checkin;
pub mod error;
pub mod identity;
pub mod office;
pub mod ports;
pub mod trace_id;
pub mod work_location;

pub use self::attendance::{AttendanceNote, AttendanceService, AttendanceStatus, JST};
pub use self::checkin::{
    AuthorizationFailure, CheckinAction, CheckinError, CheckinPolicy, CheckinTarget,
    ProfileStatus, StatusTransitionController, Transition, desired_status,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identity::{
    AccessToken, AllowedDomain, AttendanceUserId, EmailAddress, Identity,
    IdentityValidationError, UserSession,
};
pub use self::office::{OfficeDirectory, OfficeRecord, OfficeTableError};
pub use self::trace_id::TraceId;
pub use self::work_location::{WorkLocation, WorkLocations};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use checkin::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
