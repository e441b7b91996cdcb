//! Outbound adapters implementing domain ports for external services.
//!
//! - **slack**: OAuth v2 exchange, `users.info` and `users.profile.set`
//! - **hrmos**: attendance-system user directory and stamp log
//!
//! Adapters are thin translators between domain types and the providers'
//! wire formats. They contain no business logic.

mod http_support;
pub mod hrmos;
pub mod slack;
