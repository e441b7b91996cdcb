//! Office check-in service library.
//!
//! Mirrors where a member of the organisation is working into their Slack
//! profile status, optionally stamping attendance in HRMOS.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
