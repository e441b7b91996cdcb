//! Reqwest-backed Slack OAuth v2 identity provider.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;
use zeroize::Zeroizing;

use super::dto::{OAuthAccessDto, UsersInfoDto, error_code};
use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{AccessToken, Identity};
use crate::outbound::http_support::{as_directory, status_message};

/// User scopes requested on the consent screen.
pub const USER_SCOPES: &str = "users:read,users:read.email,users.profile:write";

/// Slack application credentials and endpoints.
#[derive(Clone)]
pub struct SlackOAuthConfig {
    pub client_id: String,
    pub client_secret: Zeroizing<String>,
    /// Callback URL registered with the Slack app.
    pub redirect_uri: Url,
    /// Slack origin, `https://slack.com` in production.
    pub api_base: Url,
    pub timeout: Duration,
}

/// Identity provider that runs the authorization-code flow against Slack.
pub struct SlackOAuthClient {
    client: Client,
    client_id: String,
    client_secret: Zeroizing<String>,
    redirect_uri: Url,
    authorize_endpoint: Url,
    access_endpoint: Url,
    users_info_endpoint: Url,
}

impl SlackOAuthClient {
    /// Build the client and resolve every endpoint up front.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed or the
    /// base URL cannot be joined with the Slack paths.
    pub fn new(config: SlackOAuthConfig) -> Result<Self, SlackClientError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        let base = as_directory(config.api_base);
        Ok(Self {
            client,
            client_id: config.client_id,
            client_secret: config.client_secret,
            redirect_uri: config.redirect_uri,
            authorize_endpoint: base.join("oauth/v2/authorize")?,
            access_endpoint: base.join("api/oauth.v2.access")?,
            users_info_endpoint: base.join("api/users.info")?,
        })
    }

    async fn exchange_code(
        &self,
        code: &str,
    ) -> Result<(String, AccessToken), IdentityProviderError> {
        let form = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];
        let response = self
            .client
            .post(self.access_endpoint.clone())
            .form(&form)
            .send()
            .await
            .map_err(map_transport_error)?;
        let body = read_success_body(response).await?;
        parse_access_response(&body)
    }

    async fn fetch_user(
        &self,
        user_id: &str,
        token: &AccessToken,
    ) -> Result<UserInfo, IdentityProviderError> {
        let response = self
            .client
            .get(self.users_info_endpoint.clone())
            .query(&[("user", user_id)])
            .bearer_auth(token.expose())
            .send()
            .await
            .map_err(map_transport_error)?;
        let body = read_success_body(response).await?;
        parse_user_info(&body)
    }
}

/// Failure to construct a Slack client.
#[derive(Debug, thiserror::Error)]
pub enum SlackClientError {
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid Slack base URL: {0}")]
    Url(#[from] url::ParseError),
}

#[async_trait]
impl IdentityProvider for SlackOAuthClient {
    fn authorize_url(&self) -> Url {
        let mut url = self.authorize_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("user_scope", USER_SCOPES)
            .append_pair("redirect_uri", self.redirect_uri.as_str());
        url
    }

    async fn complete(&self, code: &str) -> Result<Identity, IdentityProviderError> {
        let (user_id, access_token) = self.exchange_code(code).await?;
        let info = self.fetch_user(&user_id, &access_token).await?;
        Ok(Identity {
            user_id,
            display_name: info.display_name,
            email: info.email,
            access_token,
        })
    }
}

#[derive(Debug, PartialEq, Eq)]
struct UserInfo {
    display_name: String,
    email: String,
}

async fn read_success_body(
    response: reqwest::Response,
) -> Result<Vec<u8>, IdentityProviderError> {
    let status = response.status();
    let body = response.bytes().await.map_err(map_transport_error)?;
    if !status.is_success() {
        return Err(IdentityProviderError::transport(status_message(
            status.as_u16(),
            body.as_ref(),
        )));
    }
    Ok(body.to_vec())
}

fn parse_access_response(body: &[u8]) -> Result<(String, AccessToken), IdentityProviderError> {
    let decoded: OAuthAccessDto = serde_json::from_slice(body).map_err(|error| {
        IdentityProviderError::decode(format!("invalid oauth.v2.access payload: {error}"))
    })?;
    if !decoded.ok {
        return Err(IdentityProviderError::denied(error_code(decoded.error)));
    }
    let authed_user = decoded
        .authed_user
        .ok_or_else(|| IdentityProviderError::decode("oauth.v2.access response lacks authed_user"))?;
    let token = authed_user
        .access_token
        .ok_or_else(|| IdentityProviderError::decode("authed_user carries no access token"))
        .and_then(|raw| {
            AccessToken::new(raw).map_err(|error| IdentityProviderError::decode(error.to_string()))
        })?;
    Ok((authed_user.id, token))
}

fn parse_user_info(body: &[u8]) -> Result<UserInfo, IdentityProviderError> {
    let decoded: UsersInfoDto = serde_json::from_slice(body).map_err(|error| {
        IdentityProviderError::decode(format!("invalid users.info payload: {error}"))
    })?;
    if !decoded.ok {
        return Err(IdentityProviderError::denied(error_code(decoded.error)));
    }
    let user = decoded
        .user
        .ok_or_else(|| IdentityProviderError::decode("users.info response lacks user"))?;
    Ok(UserInfo {
        display_name: user.display_name(),
        email: user.profile.email.unwrap_or_default(),
    })
}

fn map_transport_error(error: reqwest::Error) -> IdentityProviderError {
    IdentityProviderError::transport(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn client() -> SlackOAuthClient {
        SlackOAuthClient::new(SlackOAuthConfig {
            client_id: "123.456".to_owned(),
            client_secret: Zeroizing::new("shh".to_owned()),
            redirect_uri: Url::parse("https://checkin.example/slack/callback").expect("url"),
            api_base: Url::parse("https://slack.com").expect("url"),
            timeout: Duration::from_secs(10),
        })
        .expect("client builds")
    }

    #[rstest]
    fn authorize_url_carries_client_scopes_and_redirect(client: SlackOAuthClient) {
        let url = client.authorize_url();
        assert_eq!(url.host_str(), Some("slack.com"));
        assert_eq!(url.path(), "/oauth/v2/authorize");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("client_id".to_owned(), "123.456".to_owned()),
                ("user_scope".to_owned(), USER_SCOPES.to_owned()),
                (
                    "redirect_uri".to_owned(),
                    "https://checkin.example/slack/callback".to_owned()
                ),
            ]
        );
    }

    #[rstest]
    fn access_response_yields_user_and_token() {
        let body = br#"{"ok":true,"authed_user":{"id":"U1","access_token":"xoxp-1","scope":"users:read"}}"#;
        let (user_id, token) = parse_access_response(body).expect("parse succeeds");
        assert_eq!(user_id, "U1");
        assert_eq!(token.expose(), "xoxp-1");
    }

    #[rstest]
    #[case(br#"{"ok":false,"error":"invalid_code"}"# as &[u8], "invalid_code")]
    #[case(br#"{"ok":false}"#, "unknown_error")]
    fn failed_exchange_is_denied(#[case] body: &[u8], #[case] code: &str) {
        assert_eq!(
            parse_access_response(body).expect_err("must fail"),
            IdentityProviderError::denied(code)
        );
    }

    #[rstest]
    #[case(br#"{"ok":true}"# as &[u8])]
    #[case(br#"{"ok":true,"authed_user":{"id":"U1"}}"#)]
    #[case(b"<html>")]
    fn incomplete_exchange_is_a_decode_error(#[case] body: &[u8]) {
        assert!(matches!(
            parse_access_response(body),
            Err(IdentityProviderError::Decode { .. })
        ));
    }

    #[rstest]
    #[case(
        r#"{"ok":true,"user":{"name":"hanako","real_name":"山田 花子","profile":{"email":"h@altenergy.co.jp"}}}"#.as_bytes(),
        "山田 花子",
        "h@altenergy.co.jp"
    )]
    #[case(
        br#"{"ok":true,"user":{"name":"hanako","real_name":"","profile":{}}}"#,
        "hanako",
        ""
    )]
    fn user_info_prefers_real_name(
        #[case] body: &[u8],
        #[case] display_name: &str,
        #[case] email: &str,
    ) {
        let info = parse_user_info(body).expect("parse succeeds");
        assert_eq!(info.display_name, display_name);
        assert_eq!(info.email, email);
    }

    #[rstest]
    fn failed_user_info_is_denied() {
        let body = br#"{"ok":false,"error":"user_not_found"}"#;
        assert_eq!(
            parse_user_info(body).expect_err("must fail"),
            IdentityProviderError::denied("user_not_found")
        );
    }
}
