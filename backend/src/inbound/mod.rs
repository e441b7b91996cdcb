//! Inbound adapters that translate HTTP requests into domain calls.

pub mod http;
