//! Status transition controller.
//!
//! Decides which profile status a check-in or check-out request should
//! produce and issues exactly one mutation through the
//! [`ProfileStatusWriter`] port. The controller holds no per-request state:
//! every call re-derives the desired status from the action and the caller's
//! trusted origin.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::domain::ports::{ProfileStatusError, ProfileStatusWriter};
use crate::domain::{
    AllowedDomain, EmailAddress, Error, OfficeDirectory, OfficeRecord, UserSession, WorkLocation,
    WorkLocations,
};

/// What the user asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckinAction {
    /// Check in at the office matching the caller's origin.
    CheckIn,
    /// Clear the status.
    CheckOut,
    /// Check in at an explicitly chosen off-site location.
    CheckInAt(String),
}

/// Profile status payload; both fields empty means "cleared".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStatus {
    status_text: String,
    status_emoji: String,
}

impl ProfileStatus {
    /// Build a status from text and emoji shortcode.
    pub fn new(status_text: impl Into<String>, status_emoji: impl Into<String>) -> Self {
        Self {
            status_text: status_text.into(),
            status_emoji: status_emoji.into(),
        }
    }

    /// The cleared status written on check-out.
    pub fn cleared() -> Self {
        Self::default()
    }

    /// True when both fields are empty.
    pub fn is_cleared(&self) -> bool {
        self.status_text.is_empty() && self.status_emoji.is_empty()
    }

    pub fn status_text(&self) -> &str {
        self.status_text.as_str()
    }

    pub fn status_emoji(&self) -> &str {
        self.status_emoji.as_str()
    }
}

/// Where the user checked in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CheckinTarget {
    /// A physical office resolved from the origin.
    Office(OfficeRecord),
    /// An explicitly chosen off-site location.
    Location(WorkLocation),
}

impl CheckinTarget {
    /// Human-readable name used in response messages.
    pub fn display_name(&self) -> &str {
        match self {
            Self::Office(office) => office.display_name(),
            Self::Location(location) => location.display_name(),
        }
    }
}

/// Map a resolved target to the status it should produce.
///
/// `None` stands for check-out and yields the cleared status.
///
/// # Examples
/// ```
/// use checkin::domain::{desired_status, CheckinTarget, OfficeDirectory};
///
/// let offices = OfficeDirectory::builtin();
/// let office = offices.resolve("39.110.215.6").cloned().expect("office");
/// let status = desired_status(Some(&CheckinTarget::Office(office)));
/// assert_eq!(status.status_emoji(), ":office:");
/// assert!(desired_status(None).is_cleared());
/// ```
pub fn desired_status(target: Option<&CheckinTarget>) -> ProfileStatus {
    match target {
        None => ProfileStatus::cleared(),
        Some(CheckinTarget::Office(office)) => {
            ProfileStatus::new(office.status_text(), office.emoji())
        }
        Some(CheckinTarget::Location(location)) => {
            ProfileStatus::new(location.status_text(), location.emoji())
        }
    }
}

/// Outcome of a successful transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Status written to the profile.
    pub status: ProfileStatus,
    /// Resolved target; `None` for check-out.
    pub target: Option<CheckinTarget>,
}

/// Why a caller may not act at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizationFailure {
    /// No authenticated session.
    #[error("login required")]
    MissingSession,
    /// Email domain differs from the allowed organisational domain.
    #[error("email domain {domain:?} is not permitted")]
    OutsideDomain { domain: String },
}

/// Terminal failures of a check-in request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckinError {
    #[error(transparent)]
    Authorization(#[from] AuthorizationFailure),
    /// The origin matches no configured office.
    #[error("office not recognised for origin {origin:?}")]
    Resolution { origin: String },
    /// The requested off-site location key is unknown.
    #[error("unknown work location {key:?}")]
    UnknownLocation { key: String },
    /// The profile API call failed.
    #[error("profile status update failed: {0}")]
    ExternalApi(#[from] ProfileStatusError),
}

impl From<CheckinError> for Error {
    fn from(err: CheckinError) -> Self {
        match err {
            CheckinError::Authorization(AuthorizationFailure::MissingSession) => {
                Error::unauthorized("login required")
            }
            CheckinError::Authorization(AuthorizationFailure::OutsideDomain { .. }) => {
                Error::forbidden("this account is not permitted to use the service")
            }
            CheckinError::Resolution { origin } => Error::not_found("office not recognised")
                .with_details(json!({ "clientAddress": origin })),
            CheckinError::UnknownLocation { key } => Error::invalid_request("unknown work location")
                .with_details(json!({ "field": "location_type", "value": key })),
            CheckinError::ExternalApi(source) => {
                let error = Error::service_unavailable("profile status update failed");
                match source.provider_code() {
                    Some(code) => error.with_details(json!({ "providerError": code })),
                    None => error,
                }
            }
        }
    }
}

/// Immutable configuration consulted by the controller.
#[derive(Debug, Clone)]
pub struct CheckinPolicy {
    offices: OfficeDirectory,
    locations: WorkLocations,
    allowed_domain: AllowedDomain,
}

impl CheckinPolicy {
    pub fn new(offices: OfficeDirectory, allowed_domain: AllowedDomain) -> Self {
        Self {
            offices,
            locations: WorkLocations,
            allowed_domain,
        }
    }

    pub fn offices(&self) -> &OfficeDirectory {
        &self.offices
    }

    pub fn locations(&self) -> WorkLocations {
        self.locations
    }

    pub fn allowed_domain(&self) -> &AllowedDomain {
        &self.allowed_domain
    }

    /// Check that an email belongs to the allowed domain.
    pub fn admit_email(&self, email: &EmailAddress) -> Result<(), AuthorizationFailure> {
        if self.allowed_domain.admits(email) {
            Ok(())
        } else {
            Err(AuthorizationFailure::OutsideDomain {
                domain: email.domain().to_owned(),
            })
        }
    }

    /// Require a session whose email belongs to the allowed domain.
    pub fn authorize<'a>(
        &self,
        session: Option<&'a UserSession>,
    ) -> Result<&'a UserSession, AuthorizationFailure> {
        let session = session.ok_or(AuthorizationFailure::MissingSession)?;
        self.admit_email(session.email())?;
        Ok(session)
    }

    /// Resolve the action's target without side effects.
    pub fn resolve_target(
        &self,
        action: &CheckinAction,
        origin: &str,
    ) -> Result<Option<CheckinTarget>, CheckinError> {
        match action {
            CheckinAction::CheckOut => Ok(None),
            CheckinAction::CheckIn => self
                .offices
                .resolve(origin)
                .cloned()
                .map(|office| Some(CheckinTarget::Office(office)))
                .ok_or_else(|| CheckinError::Resolution {
                    origin: origin.to_owned(),
                }),
            CheckinAction::CheckInAt(key) => self
                .locations
                .find(key)
                .cloned()
                .map(|location| Some(CheckinTarget::Location(location)))
                .ok_or_else(|| CheckinError::UnknownLocation { key: key.clone() }),
        }
    }
}

/// Applies check-in and check-out actions to the user's profile status.
#[derive(Clone)]
pub struct StatusTransitionController {
    policy: Arc<CheckinPolicy>,
    writer: Arc<dyn ProfileStatusWriter>,
}

impl StatusTransitionController {
    pub fn new(policy: Arc<CheckinPolicy>, writer: Arc<dyn ProfileStatusWriter>) -> Self {
        Self { policy, writer }
    }

    pub fn policy(&self) -> &CheckinPolicy {
        &self.policy
    }

    /// Authorise, resolve and write the status for one request.
    ///
    /// The domain restriction is checked first for every action. A check-in
    /// whose origin matches no office fails with [`CheckinError::Resolution`]
    /// before the writer is touched. The writer is called at most once and
    /// its failure is never retried.
    pub async fn apply(
        &self,
        session: Option<&UserSession>,
        action: &CheckinAction,
        origin: &str,
    ) -> Result<Transition, CheckinError> {
        let session = self.policy.authorize(session)?;
        let target = self.policy.resolve_target(action, origin)?;
        let status = desired_status(target.as_ref());

        if let Err(error) = self.writer.set_status(session.access_token(), &status).await {
            tracing::warn!(
                user_id = session.user_id(),
                error = %error,
                "profile status update failed"
            );
            return Err(CheckinError::ExternalApi(error));
        }

        tracing::info!(
            user_id = session.user_id(),
            status_text = status.status_text(),
            "profile status updated"
        );
        Ok(Transition { status, target })
    }
}

#[cfg(test)]
#[path = "checkin_tests.rs"]
mod tests;
