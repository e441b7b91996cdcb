//! Check-in service entry point: loads configuration, initialises tracing
//! and runs the HTTP server.

mod server;

use std::ffi::OsString;
use std::path::Path;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use checkin::domain::OfficeDirectory;
use checkin::inbound::http::health::HealthState;
use checkin::inbound::http::origin::OriginPolicy;
use checkin::inbound::http::session_config::{BuildMode, session_settings_from_env};
use checkin::settings::{CheckinSettings, HrmosSettings, SlackSettings};

use server::{ServerConfig, create_server};

fn config_error(error: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(error.to_string())
}

fn load_offices(path: Option<&Path>) -> std::io::Result<OfficeDirectory> {
    let Some(path) = path else {
        info!("no office file configured; using built-in table");
        return Ok(OfficeDirectory::builtin());
    };
    let bytes = std::fs::read(path)?;
    let offices = OfficeDirectory::from_json_slice(&bytes).map_err(config_error)?;
    info!(path = %path.display(), offices = offices.len(), "office table loaded");
    Ok(offices)
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    // Settings come from the environment and config files only.
    let args = || std::env::args_os().take(1).collect::<Vec<OsString>>();
    let checkin_settings = CheckinSettings::load_from_iter(args()).map_err(config_error)?;
    let slack_settings = SlackSettings::load_from_iter(args()).map_err(config_error)?;
    let hrmos_settings = HrmosSettings::load_from_iter(args()).map_err(config_error)?;

    let env = DefaultEnv::new();
    let session = session_settings_from_env(&env, BuildMode::from_debug_assertions())
        .map_err(config_error)?;

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        checkin_settings.bind_addr().map_err(config_error)?,
        checkin_settings.allowed_domain().map_err(config_error)?,
    )
    .with_offices(load_offices(checkin_settings.offices_file.as_deref())?)
    .with_origin_policy(OriginPolicy {
        trust_forwarded_for: checkin_settings.trust_forwarded_for(),
    })
    .with_hrmos(hrmos_settings.hrmos_config().map_err(config_error)?);

    match slack_settings.oauth_config(&env) {
        Ok(slack) => config = config.with_slack(slack),
        Err(error) if cfg!(debug_assertions) => {
            warn!(error = %error, "Slack settings incomplete; running with fixtures");
        }
        Err(error) => return Err(config_error(error)),
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}
