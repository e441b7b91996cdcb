//! Service configuration loaded via OrthoConfig.
//!
//! Each group reads its own environment prefix (`SLACK_`, `HRMOS_`,
//! `CHECKIN_`). Values are validated once at start-up and turned into the
//! adapter configs the server wires together.
//!
//! Slack credentials are read verbatim through [`mockable::Env`]: client ids
//! look like `1234567890123.9876543210987` and must never be coerced into
//! numbers.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use mockable::Env;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;
use zeroize::Zeroizing;

use crate::domain::{AllowedDomain, IdentityValidationError};
use crate::outbound::hrmos::HrmosConfig;
use crate::outbound::slack::SlackOAuthConfig;

const DEFAULT_SLACK_API_BASE: &str = "https://slack.com";
const DEFAULT_HRMOS_API_BASE: &str = "https://ieyasu.co/api";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_ALLOWED_DOMAIN: &str = "altenergy.co.jp";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
const SLACK_CLIENT_ID_ENV: &str = "SLACK_CLIENT_ID";
const SLACK_CLIENT_SECRET_ENV: &str = "SLACK_CLIENT_SECRET";

/// Configuration that cannot be turned into a running service.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("missing required setting {name}")]
    Missing { name: &'static str },
    #[error("invalid URL in {name}: {source}")]
    Url {
        name: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("invalid allowed domain: {0}")]
    Domain(#[from] IdentityValidationError),
}

fn required(value: Option<&str>, name: &'static str) -> Result<String, SettingsError> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .ok_or(SettingsError::Missing { name })
}

fn parse_url(raw: &str, name: &'static str) -> Result<Url, SettingsError> {
    Url::parse(raw).map_err(|source| SettingsError::Url { name, source })
}

/// Slack application settings other than the credentials.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SLACK")]
pub struct SlackSettings {
    /// Callback URL registered with the Slack app.
    pub redirect_uri: Option<String>,
    /// Override for the Slack origin, mainly for tests.
    pub api_base: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl SlackSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Slack origin, defaulting to `https://slack.com`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Url`] when the override is not a URL.
    pub fn api_base(&self) -> Result<Url, SettingsError> {
        parse_url(
            self.api_base.as_deref().unwrap_or(DEFAULT_SLACK_API_BASE),
            "SLACK_API_BASE",
        )
    }

    /// Build the OAuth client configuration, taking the client id and secret
    /// from `env`.
    ///
    /// # Errors
    ///
    /// Fails when the client id, secret or redirect URI is missing or when a
    /// URL does not parse.
    pub fn oauth_config<E: Env>(&self, env: &E) -> Result<SlackOAuthConfig, SettingsError> {
        let redirect_uri = required(self.redirect_uri.as_deref(), "SLACK_REDIRECT_URI")?;
        let client_id = required(
            env.string(SLACK_CLIENT_ID_ENV).as_deref(),
            SLACK_CLIENT_ID_ENV,
        )?;
        let client_secret = Zeroizing::new(required(
            env.string(SLACK_CLIENT_SECRET_ENV).as_deref(),
            SLACK_CLIENT_SECRET_ENV,
        )?);
        Ok(SlackOAuthConfig {
            client_id,
            client_secret,
            redirect_uri: parse_url(&redirect_uri, "SLACK_REDIRECT_URI")?,
            api_base: self.api_base()?,
            timeout: self.timeout(),
        })
    }
}

/// Attendance system credentials; attendance is off unless both the company
/// and the secret are set.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "HRMOS")]
pub struct HrmosSettings {
    /// Company identifier used in every API path.
    pub company_url: Option<String>,
    pub api_secret: Option<String>,
    pub api_base: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl HrmosSettings {
    /// The attendance client configuration, or `None` when not configured.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Url`] when the API base does not parse.
    pub fn hrmos_config(&self) -> Result<Option<HrmosConfig>, SettingsError> {
        let (Ok(company), Ok(secret)) = (
            required(self.company_url.as_deref(), "HRMOS_COMPANY_URL"),
            required(self.api_secret.as_deref(), "HRMOS_API_SECRET"),
        ) else {
            return Ok(None);
        };
        let api_base = parse_url(
            self.api_base.as_deref().unwrap_or(DEFAULT_HRMOS_API_BASE),
            "HRMOS_API_BASE",
        )?;
        Ok(Some(HrmosConfig {
            api_base,
            company,
            api_secret: Zeroizing::new(secret),
            timeout: Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        }))
    }
}

/// Check-in policy and listener settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CHECKIN")]
pub struct CheckinSettings {
    /// Organisational email domain admitted to the service.
    pub allowed_domain: Option<String>,
    /// JSON office table; the built-in table is used when unset.
    pub offices_file: Option<PathBuf>,
    /// Trust the first `X-Forwarded-For` hop; on unless set to false.
    pub trust_forwarded_for: Option<bool>,
    pub bind_addr: Option<String>,
}

impl CheckinSettings {
    #[must_use]
    pub fn trust_forwarded_for(&self) -> bool {
        self.trust_forwarded_for.unwrap_or(true)
    }

    /// # Errors
    ///
    /// Returns [`SettingsError::Domain`] for a blank or malformed domain.
    pub fn allowed_domain(&self) -> Result<AllowedDomain, SettingsError> {
        Ok(AllowedDomain::new(
            self.allowed_domain
                .as_deref()
                .unwrap_or(DEFAULT_ALLOWED_DOMAIN),
        )?)
    }

    /// # Errors
    ///
    /// Returns [`SettingsError::BindAddr`] when the address does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }
}
