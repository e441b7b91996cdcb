//! HTTP inbound adapter: sign-in, check-in endpoints and probes.

pub mod auth;
pub mod checkin;
pub mod error;
pub mod health;
pub mod origin;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod views;

pub use error::ApiResult;
