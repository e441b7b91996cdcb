//! Driven port for writing the user's collaboration-platform status.
//!
//! The controller issues exactly one call per request and never reads the
//! current status back, so adapters only need a single write operation.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{AccessToken, ProfileStatus};

define_port_error! {
    /// Errors surfaced while writing a profile status.
    pub enum ProfileStatusError {
        /// Network transport failed before a response arrived.
        Transport { message: String } =>
            "profile status transport failed: {message}",
        /// The call exceeded its timeout; the write may or may not have landed.
        Timeout { message: String } =>
            "profile status request timed out: {message}",
        /// The platform throttled the request.
        RateLimited { message: String } =>
            "profile status request was rate limited: {message}",
        /// The platform answered but refused the write (for example `invalid_auth`).
        Rejected { code: String } =>
            "profile status update rejected: {code}",
        /// The response could not be decoded.
        Decode { message: String } =>
            "profile status response decode failed: {message}",
    }
}

impl ProfileStatusError {
    /// Provider error code suitable for surfacing to the caller, if any.
    pub fn provider_code(&self) -> Option<&str> {
        match self {
            Self::Rejected { code } => Some(code.as_str()),
            Self::RateLimited { .. } => Some("ratelimited"),
            _ => None,
        }
    }
}

/// Port for mutating a user's profile status.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileStatusWriter: Send + Sync {
    /// Replace the user's status with `status`; an empty status clears it.
    async fn set_status(
        &self,
        token: &AccessToken,
        status: &ProfileStatus,
    ) -> Result<(), ProfileStatusError>;
}

/// Fixture writer that accepts every update without side effects.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureProfileStatusWriter;

#[async_trait]
impl ProfileStatusWriter for FixtureProfileStatusWriter {
    async fn set_status(
        &self,
        _token: &AccessToken,
        status: &ProfileStatus,
    ) -> Result<(), ProfileStatusError> {
        tracing::debug!(
            status_text = status.status_text(),
            status_emoji = status.status_emoji(),
            "fixture profile status accepted"
        );
        Ok(())
    }
}
