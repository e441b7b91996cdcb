//! Authenticated identities, sessions and the organisational domain policy.
//!
//! The OAuth provider hands back an [`Identity`]; once it passes the
//! [`AllowedDomain`] check it becomes a [`UserSession`] stored in the
//! session cookie for subsequent requests.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::Zeroizing;

/// Validation errors for identity primitives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityValidationError {
    /// Email address was blank.
    #[error("email address must not be empty")]
    EmptyEmail,
    /// Email address did not have exactly one `@` with text on both sides.
    #[error("email address {0:?} is malformed")]
    MalformedEmail(String),
    /// Allowed domain was blank or contained `@`.
    #[error("allowed domain {0:?} is invalid")]
    InvalidDomain(String),
    /// Access token was blank.
    #[error("access token must not be empty")]
    EmptyAccessToken,
}

/// Email address with exactly one `@`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate an email address.
    ///
    /// # Examples
    /// ```
    /// use checkin::domain::EmailAddress;
    ///
    /// let email = EmailAddress::new("hanako@altenergy.co.jp").expect("valid email");
    /// assert_eq!(email.domain(), "altenergy.co.jp");
    /// ```
    pub fn new(raw: impl Into<String>) -> Result<Self, IdentityValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(IdentityValidationError::EmptyEmail);
        }
        match raw.split_once('@') {
            Some((local, domain))
                if !local.is_empty()
                    && !domain.is_empty()
                    && !domain.contains('@')
                    && raw.trim() == raw =>
            {
                Ok(Self(raw))
            }
            _ => Err(IdentityValidationError::MalformedEmail(raw)),
        }
    }

    /// Domain part after the `@`.
    pub fn domain(&self) -> &str {
        self.0
            .split_once('@')
            .map_or("", |(_, domain)| domain)
    }

    /// Borrow the full address.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// The single organisational domain allowed to use the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedDomain(String);

impl AllowedDomain {
    /// Validate a bare domain such as `altenergy.co.jp`.
    pub fn new(raw: impl Into<String>) -> Result<Self, IdentityValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() || raw.trim() != raw || raw.contains('@') {
            return Err(IdentityValidationError::InvalidDomain(raw));
        }
        Ok(Self(raw))
    }

    /// True when the email's domain equals this domain exactly.
    ///
    /// Subdomains and look-alike suffixes are rejected.
    ///
    /// # Examples
    /// ```
    /// use checkin::domain::{AllowedDomain, EmailAddress};
    ///
    /// let domain = AllowedDomain::new("altenergy.co.jp").unwrap();
    /// assert!(domain.admits(&EmailAddress::new("a@altenergy.co.jp").unwrap()));
    /// assert!(!domain.admits(&EmailAddress::new("a@mail.altenergy.co.jp").unwrap()));
    /// ```
    pub fn admits(&self, email: &EmailAddress) -> bool {
        email.domain() == self.0
    }

    /// Borrow the domain string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for AllowedDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// User-scoped OAuth access token, zeroised on drop and redacted in `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    /// Wrap a non-empty token.
    pub fn new(raw: impl Into<String>) -> Result<Self, IdentityValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(IdentityValidationError::EmptyAccessToken);
        }
        Ok(Self(Zeroizing::new(raw)))
    }

    /// Expose the secret for an outbound `Authorization` header.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Identifier of the user in the attendance system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttendanceUserId(i64);

impl AttendanceUserId {
    /// Wrap a raw attendance-system id.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw numeric id.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for AttendanceUserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity returned by the OAuth provider before any policy is applied.
///
/// `email` stays raw because providers may omit it; the domain check turns a
/// missing or malformed address into a rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Provider user id (Slack `U…`).
    pub user_id: String,
    /// Display name, falling back to the handle.
    pub display_name: String,
    /// Raw email address as reported by the provider.
    pub email: String,
    /// User-scoped token used for profile mutations.
    pub access_token: AccessToken,
}

/// Authenticated user held in the session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSession {
    user_id: String,
    display_name: String,
    email: EmailAddress,
    access_token: AccessToken,
    attendance_user_id: Option<AttendanceUserId>,
}

impl UserSession {
    /// Assemble a session from its parts.
    pub fn new(
        user_id: impl Into<String>,
        display_name: impl Into<String>,
        email: EmailAddress,
        access_token: AccessToken,
        attendance_user_id: Option<AttendanceUserId>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
            email,
            access_token,
            attendance_user_id,
        }
    }

    /// Provider user id.
    pub fn user_id(&self) -> &str {
        self.user_id.as_str()
    }

    /// Display name.
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Verified email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Token for profile mutations.
    pub fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    /// Linked attendance-system user, if any.
    pub fn attendance_user_id(&self) -> Option<AttendanceUserId> {
        self.attendance_user_id
    }
}
