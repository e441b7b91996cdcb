//! Reqwest-backed HRMOS attendance ledger.
//!
//! Every operation obtains a fresh short-lived API token with the company's
//! secret and then calls the resource endpoint with `Token` authorisation.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;
use zeroize::Zeroizing;

use super::dto::{StampLogRequestDto, TokenDto, UserDto, WorkOutputDto};
use crate::domain::AttendanceUserId;
use crate::domain::ports::{AttendanceLedger, AttendanceLedgerError, DayRecord, StampKind};
use crate::outbound::http_support::{as_directory, status_message};

/// Page size used for user listing and daily work outputs.
pub const PAGE_SIZE: usize = 100;
const MAX_USER_PAGES: u32 = 50;

/// HRMOS company credentials.
#[derive(Clone)]
pub struct HrmosConfig {
    /// API root, `https://ieyasu.co/api` in production.
    pub api_base: Url,
    /// Company identifier that forms part of every path.
    pub company: String,
    /// Secret sent as `Basic` credentials to obtain tokens.
    pub api_secret: Zeroizing<String>,
    pub timeout: Duration,
}

/// Failure to construct an HRMOS client.
#[derive(Debug, thiserror::Error)]
pub enum HrmosClientError {
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid HRMOS base URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Attendance ledger adapter for HRMOS.
pub struct HrmosClient {
    client: Client,
    base: Url,
    api_secret: Zeroizing<String>,
}

impl HrmosClient {
    /// Build the client for `{api_base}/{company}/v1/`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be built or the
    /// company path does not form a valid URL.
    pub fn new(config: HrmosConfig) -> Result<Self, HrmosClientError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        let base = as_directory(config.api_base).join(&format!("{}/v1/", config.company))?;
        Ok(Self {
            client,
            base,
            api_secret: config.api_secret,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, AttendanceLedgerError> {
        self.base
            .join(path)
            .map_err(|error| AttendanceLedgerError::transport(format!("invalid path {path}: {error}")))
    }

    async fn token(&self) -> Result<Zeroizing<String>, AttendanceLedgerError> {
        let response = self
            .client
            .get(self.endpoint("authentication/token")?)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Basic {}", self.api_secret.as_str()),
            )
            .send()
            .await
            .map_err(|error| AttendanceLedgerError::authentication(error.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| AttendanceLedgerError::authentication(error.to_string()))?;
        if !status.is_success() {
            return Err(AttendanceLedgerError::authentication(status_message(
                status.as_u16(),
                body.as_ref(),
            )));
        }
        let decoded: TokenDto = decode(body.as_ref(), "authentication/token")?;
        Ok(Zeroizing::new(decoded.token))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<T, AttendanceLedgerError> {
        let body = send(request).await?;
        decode(&body, what)
    }
}

fn with_token(request: RequestBuilder, token: &str) -> RequestBuilder {
    request.header(reqwest::header::AUTHORIZATION, format!("Token {token}"))
}

async fn send(request: RequestBuilder) -> Result<Vec<u8>, AttendanceLedgerError> {
    let response = request.send().await.map_err(map_transport_error)?;
    let status = response.status();
    let body = response.bytes().await.map_err(map_transport_error)?;
    if !status.is_success() {
        return Err(AttendanceLedgerError::status(
            status.as_u16(),
            status_message(status.as_u16(), body.as_ref()),
        ));
    }
    Ok(body.to_vec())
}

fn decode<T: DeserializeOwned>(body: &[u8], what: &str) -> Result<T, AttendanceLedgerError> {
    serde_json::from_slice(body)
        .map_err(|error| AttendanceLedgerError::decode(format!("invalid {what} payload: {error}")))
}

fn map_transport_error(error: reqwest::Error) -> AttendanceLedgerError {
    AttendanceLedgerError::transport(error.to_string())
}

/// Find `email` in one page; `Continue` when the page was full.
fn scan_user_page(page: &[UserDto], email: &str) -> PageScan {
    if let Some(user) = page.iter().find(|user| user.email.as_deref() == Some(email)) {
        return PageScan::Found(AttendanceUserId::new(user.id));
    }
    if page.len() < PAGE_SIZE {
        PageScan::Exhausted
    } else {
        PageScan::Continue
    }
}

#[derive(Debug, PartialEq, Eq)]
enum PageScan {
    Found(AttendanceUserId),
    Continue,
    Exhausted,
}

fn find_day_record(rows: &[WorkOutputDto], user: AttendanceUserId) -> Option<DayRecord> {
    rows.iter()
        .find(|row| row.user_id == user.get())
        .map(WorkOutputDto::to_day_record)
}

fn stamp_request(user: AttendanceUserId, kind: StampKind, at: DateTime<FixedOffset>) -> StampLogRequestDto {
    StampLogRequestDto {
        user_id: user.get(),
        stamp_type: kind.code(),
        datetime: at.format("%Y-%m-%dT%H:%M:%S%:z").to_string(),
    }
}

#[async_trait]
impl AttendanceLedger for HrmosClient {
    async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AttendanceUserId>, AttendanceLedgerError> {
        let token = self.token().await?;
        let endpoint = self.endpoint("users")?;
        for page in 1..=MAX_USER_PAGES {
            let request = with_token(self.client.get(endpoint.clone()), &token).query(&[
                ("limit", PAGE_SIZE.to_string()),
                ("page", page.to_string()),
            ]);
            let users: Vec<UserDto> = self.send_json(request, "users").await?;
            match scan_user_page(&users, email) {
                PageScan::Found(user) => return Ok(Some(user)),
                PageScan::Exhausted => return Ok(None),
                PageScan::Continue => {}
            }
        }
        tracing::warn!(pages = MAX_USER_PAGES, "HRMOS user listing truncated");
        Ok(None)
    }

    async fn day_record(
        &self,
        user: AttendanceUserId,
        date: NaiveDate,
    ) -> Result<Option<DayRecord>, AttendanceLedgerError> {
        let token = self.token().await?;
        let endpoint = self.endpoint(&format!("work_outputs/daily/{}", date.format("%Y-%m-%d")))?;
        let request = with_token(self.client.get(endpoint), &token)
            .query(&[("limit", PAGE_SIZE.to_string())]);
        let rows: Vec<WorkOutputDto> = self.send_json(request, "work_outputs").await?;
        Ok(find_day_record(&rows, user))
    }

    async fn stamp(
        &self,
        user: AttendanceUserId,
        kind: StampKind,
        at: DateTime<FixedOffset>,
    ) -> Result<(), AttendanceLedgerError> {
        let token = self.token().await?;
        let request = with_token(self.client.post(self.endpoint("stamp_logs")?), &token)
            .json(&stamp_request(user, kind, at));
        send(request).await.map(|_| ())
    }
}
