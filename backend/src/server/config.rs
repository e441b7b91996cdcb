//! HTTP server configuration object.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};

use checkin::domain::{AllowedDomain, OfficeDirectory};
use checkin::inbound::http::origin::OriginPolicy;
use checkin::outbound::hrmos::HrmosConfig;
use checkin::outbound::slack::SlackOAuthConfig;

/// Everything the server needs, assembled once in `main`.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) offices: OfficeDirectory,
    pub(crate) allowed_domain: AllowedDomain,
    pub(crate) origin_policy: OriginPolicy,
    pub(crate) slack: Option<SlackOAuthConfig>,
    pub(crate) hrmos: Option<HrmosConfig>,
}

impl ServerConfig {
    /// Session and listener settings with the built-in office table, the
    /// default origin policy and fixture adapters.
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
        allowed_domain: AllowedDomain,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            offices: OfficeDirectory::builtin(),
            allowed_domain,
            origin_policy: OriginPolicy::default(),
            slack: None,
            hrmos: None,
        }
    }

    #[must_use]
    pub fn with_offices(mut self, offices: OfficeDirectory) -> Self {
        self.offices = offices;
        self
    }

    #[must_use]
    pub fn with_origin_policy(mut self, policy: OriginPolicy) -> Self {
        self.origin_policy = policy;
        self
    }

    /// Use the real Slack adapters.
    #[must_use]
    pub fn with_slack(mut self, slack: SlackOAuthConfig) -> Self {
        self.slack = Some(slack);
        self
    }

    /// Enable attendance stamping.
    #[must_use]
    pub fn with_hrmos(mut self, hrmos: Option<HrmosConfig>) -> Self {
        self.hrmos = hrmos;
        self
    }
}
