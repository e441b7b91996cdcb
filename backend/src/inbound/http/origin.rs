//! Trusted client origin extraction.
//!
//! Behind the load balancer the caller's public address arrives as the first
//! `X-Forwarded-For` entry; without a trusted proxy the socket peer address is
//! used. The resulting string is handed to the office resolver unchanged.

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};

use crate::domain::Error;

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Whether the first `X-Forwarded-For` hop is trusted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OriginPolicy {
    pub trust_forwarded_for: bool,
}

/// The caller's trusted network origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOrigin(String);

impl ClientOrigin {
    /// Derive the origin from `req` under `policy`.
    pub fn extract(req: &HttpRequest, policy: OriginPolicy) -> Result<Self, Error> {
        if policy.trust_forwarded_for {
            if let Some(first) = first_forwarded_hop(req) {
                return Ok(Self(first));
            }
        }
        req.peer_addr()
            .map(|addr| Self(addr.ip().to_string()))
            .ok_or_else(|| Error::invalid_request("client address unavailable"))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

fn first_forwarded_hop(req: &HttpRequest) -> Option<String> {
    let raw = req.headers().get(FORWARDED_FOR)?.to_str().ok()?;
    let first = raw.split(',').next()?.trim();
    (!first.is_empty()).then(|| first.to_owned())
}

impl FromRequest for ClientOrigin {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let policy = req
            .app_data::<web::Data<OriginPolicy>>()
            .map(|data| *data.get_ref())
            .unwrap_or_default();
        ready(Self::extract(req, policy))
    }
}
