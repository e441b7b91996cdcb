//! Reqwest-backed `users.profile.set` writer.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;

use super::dto::{AckDto, ProfileSetRequestDto, ProfileStatusDto, error_code};
use super::oauth::SlackClientError;
use crate::domain::ports::{ProfileStatusError, ProfileStatusWriter};
use crate::domain::{AccessToken, ProfileStatus};
use crate::outbound::http_support::{as_directory, status_message};

/// Writes the profile status through Slack's Web API.
pub struct SlackProfileWriter {
    client: Client,
    endpoint: Url,
}

impl SlackProfileWriter {
    /// Build a writer against `api_base` (for example `https://slack.com`).
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed or the
    /// endpoint cannot be derived from `api_base`.
    pub fn new(api_base: Url, timeout: Duration) -> Result<Self, SlackClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        let endpoint = as_directory(api_base).join("api/users.profile.set")?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl ProfileStatusWriter for SlackProfileWriter {
    async fn set_status(
        &self,
        token: &AccessToken,
        status: &ProfileStatus,
    ) -> Result<(), ProfileStatusError> {
        let payload = ProfileSetRequestDto {
            profile: ProfileStatusDto {
                status_text: status.status_text(),
                status_emoji: status.status_emoji(),
                status_expiration: 0,
            },
        };
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(token.expose())
            .json(&payload)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_ack(body.as_ref())
    }
}

fn parse_ack(body: &[u8]) -> Result<(), ProfileStatusError> {
    let ack: AckDto = serde_json::from_slice(body).map_err(|error| {
        ProfileStatusError::decode(format!("invalid users.profile.set payload: {error}"))
    })?;
    if ack.ok {
        return Ok(());
    }
    match error_code(ack.error) {
        code if code == "ratelimited" => Err(ProfileStatusError::rate_limited(code)),
        code => Err(ProfileStatusError::rejected(code)),
    }
}

fn map_transport_error(error: reqwest::Error) -> ProfileStatusError {
    if error.is_timeout() {
        ProfileStatusError::timeout(error.to_string())
    } else {
        ProfileStatusError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ProfileStatusError {
    let message = status_message(status.as_u16(), body);
    match status {
        StatusCode::TOO_MANY_REQUESTS => ProfileStatusError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            ProfileStatusError::timeout(message)
        }
        _ => ProfileStatusError::transport(message),
    }
}
