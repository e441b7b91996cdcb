//! Wire DTOs for the Slack Web API.
//!
//! Slack answers most calls with HTTP 200 and an `ok` flag; failures carry a
//! short machine-readable `error` string.

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(super) struct OAuthAccessDto {
    pub(super) ok: bool,
    pub(super) error: Option<String>,
    pub(super) authed_user: Option<AuthedUserDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct AuthedUserDto {
    pub(super) id: String,
    pub(super) access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct UsersInfoDto {
    pub(super) ok: bool,
    pub(super) error: Option<String>,
    pub(super) user: Option<UserDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct UserDto {
    pub(super) name: Option<String>,
    pub(super) real_name: Option<String>,
    #[serde(default)]
    pub(super) profile: UserProfileDto,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct UserProfileDto {
    pub(super) email: Option<String>,
}

impl UserDto {
    /// `real_name` when present and non-empty, else the handle.
    pub(super) fn display_name(&self) -> String {
        self.real_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or(self.name.as_deref())
            .unwrap_or_default()
            .to_owned()
    }
}

/// Plain `{ok, error}` acknowledgement.
#[derive(Debug, Deserialize)]
pub(super) struct AckDto {
    pub(super) ok: bool,
    pub(super) error: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ProfileSetRequestDto<'a> {
    pub(super) profile: ProfileStatusDto<'a>,
}

#[derive(Debug, Serialize)]
pub(super) struct ProfileStatusDto<'a> {
    pub(super) status_text: &'a str,
    pub(super) status_emoji: &'a str,
    pub(super) status_expiration: i64,
}

/// Error code reported by a failed Slack call.
pub(super) fn error_code(error: Option<String>) -> String {
    error
        .filter(|code| !code.is_empty())
        .unwrap_or_else(|| "unknown_error".to_owned())
}
