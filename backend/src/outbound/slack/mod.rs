//! Slack outbound adapters.
//!
//! Thin HTTP implementations of the `IdentityProvider` and
//! `ProfileStatusWriter` ports.

mod dto;
mod oauth;
mod profile;

pub use oauth::{SlackClientError, SlackOAuthClient, SlackOAuthConfig, USER_SCOPES};
pub use profile::SlackProfileWriter;
