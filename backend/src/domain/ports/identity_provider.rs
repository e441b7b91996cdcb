//! Driven port for the OAuth identity provider.

use async_trait::async_trait;
use url::Url;

use super::define_port_error;
use crate::domain::{AccessToken, Identity};

define_port_error! {
    /// Errors raised while exchanging an authorization code for an identity.
    pub enum IdentityProviderError {
        /// The provider refused the exchange or the identity lookup.
        Denied { code: String } => "identity provider denied the request: {code}",
        /// Network transport failed or timed out.
        Transport { message: String } => "identity provider transport failed: {message}",
        /// The provider answered with a body we could not decode.
        Decode { message: String } => "identity provider response decode failed: {message}",
    }
}

/// Port for the authorization-code OAuth flow.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Consent URL the browser is redirected to from `/login`.
    fn authorize_url(&self) -> Url;

    /// Exchange an authorization code and fetch the user's identity.
    async fn complete(&self, code: &str) -> Result<Identity, IdentityProviderError>;
}

/// Fixture provider that turns any code into the same identity.
#[derive(Debug, Clone)]
pub struct FixtureIdentityProvider {
    identity: Identity,
}

impl FixtureIdentityProvider {
    /// Provider that always returns `identity`.
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }
}

impl Default for FixtureIdentityProvider {
    fn default() -> Self {
        Self::new(Identity {
            user_id: "U000FIXTURE".to_owned(),
            display_name: "Fixture User".to_owned(),
            email: "fixture@altenergy.co.jp".to_owned(),
            access_token: AccessToken::new("xoxp-fixture")
                .unwrap_or_else(|_| unreachable!("fixture token is non-empty")),
        })
    }
}

#[async_trait]
impl IdentityProvider for FixtureIdentityProvider {
    fn authorize_url(&self) -> Url {
        Url::parse("https://identity.invalid/authorize")
            .unwrap_or_else(|_| unreachable!("fixture URL is valid"))
    }

    async fn complete(&self, code: &str) -> Result<Identity, IdentityProviderError> {
        if code.trim().is_empty() {
            return Err(IdentityProviderError::denied("invalid_code"));
        }
        Ok(self.identity.clone())
    }
}
