//! Builders for the HTTP state ports.

use std::sync::Arc;

use actix_web::web;
use tracing::{info, warn};

use checkin::domain::ports::{
    AttendanceLedger, FixtureIdentityProvider, FixtureProfileStatusWriter, IdentityProvider,
    ProfileStatusWriter,
};
use checkin::domain::CheckinPolicy;
use checkin::inbound::http::state::{HttpState, HttpStatePorts};
use checkin::outbound::hrmos::{HrmosClient, HrmosConfig};
use checkin::outbound::slack::{SlackOAuthClient, SlackOAuthConfig, SlackProfileWriter};

use super::ServerConfig;

type SlackPorts = (Arc<dyn IdentityProvider>, Arc<dyn ProfileStatusWriter>);

/// Slack adapters when configured, fixtures otherwise.
fn build_slack_ports(slack: Option<&SlackOAuthConfig>) -> std::io::Result<SlackPorts> {
    let Some(config) = slack else {
        warn!("Slack is not configured; using fixture identity and status writer");
        return Ok((
            Arc::new(FixtureIdentityProvider::default()),
            Arc::new(FixtureProfileStatusWriter),
        ));
    };
    let identity = SlackOAuthClient::new(config.clone())
        .map_err(|e| std::io::Error::other(format!("Slack OAuth client: {e}")))?;
    let writer = SlackProfileWriter::new(config.api_base.clone(), config.timeout)
        .map_err(|e| std::io::Error::other(format!("Slack profile writer: {e}")))?;
    Ok((Arc::new(identity), Arc::new(writer)))
}

fn build_attendance_ledger(
    hrmos: Option<&HrmosConfig>,
) -> std::io::Result<Option<Arc<dyn AttendanceLedger>>> {
    let Some(config) = hrmos else {
        info!("HRMOS is not configured; attendance stamping disabled");
        return Ok(None);
    };
    let client = HrmosClient::new(config.clone())
        .map_err(|e| std::io::Error::other(format!("HRMOS client: {e}")))?;
    Ok(Some(Arc::new(client)))
}

/// Wire the HTTP state from the server configuration.
///
/// # Errors
///
/// Returns [`std::io::Error`] when an outbound client cannot be built.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let (identity, profile_writer) = build_slack_ports(config.slack.as_ref())?;
    let attendance_ledger = build_attendance_ledger(config.hrmos.as_ref())?;
    let policy = CheckinPolicy::new(config.offices.clone(), config.allowed_domain.clone());
    Ok(web::Data::new(HttpState::new(
        HttpStatePorts {
            identity,
            profile_writer,
            attendance_ledger,
        },
        policy,
        Arc::new(mockable::DefaultClock),
    )))
}
