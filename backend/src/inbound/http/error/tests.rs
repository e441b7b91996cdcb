//! Tests for HTTP error mapping.

use super::*;
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use serde_json::json;

use crate::domain::{CheckinError, Error};
use crate::domain::ports::ProfileStatusError;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("login required"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("outside domain"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("office not recognised"), StatusCode::NOT_FOUND)]
#[case(Error::service_unavailable("slack down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] err: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&err), status);
}

async fn decode_response(
    error: Error,
    expected_status: StatusCode,
    expected_trace_id: Option<&str>,
) -> Error {
    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), expected_status);

    let header = response.headers().get(TRACE_ID_HEADER);
    match expected_trace_id {
        Some(expected) => {
            let trace_id = header
                .expect("trace-id header is set by error_response")
                .to_str()
                .expect("trace-id is ASCII");
            assert_eq!(trace_id, expected);
        }
        None => assert!(header.is_none(), "trace-id header should not be present"),
    }

    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("Error JSON deserialisation succeeds")
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(expected_trace_id: String) {
    let error = Error::internal("session cookie key missing")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"path": "/etc/secret"}));

    let redacted = decode_response(
        error,
        StatusCode::INTERNAL_SERVER_ERROR,
        Some(expected_trace_id.as_str()),
    )
    .await;

    assert_eq!(redacted.code(), ErrorCode::InternalError);
    assert_eq!(redacted.message(), "Internal server error");
    assert!(redacted.details().is_none());
}

#[rstest]
#[actix_web::test]
async fn resolution_failure_keeps_details(expected_trace_id: String) {
    let error = Error::from(CheckinError::Resolution {
        origin: "203.0.113.9".to_owned(),
    })
    .with_trace_id(expected_trace_id.clone());

    let payload =
        decode_response(error, StatusCode::NOT_FOUND, Some(expected_trace_id.as_str())).await;

    assert_eq!(payload.message(), "office not recognised");
    assert_eq!(
        payload.details(),
        Some(&json!({"clientAddress": "203.0.113.9"}))
    );
}

#[rstest]
#[actix_web::test]
async fn external_api_failure_is_service_unavailable() {
    let error = Error::from(CheckinError::ExternalApi(ProfileStatusError::rejected(
        "invalid_auth",
    )));

    let payload = decode_response(error, StatusCode::SERVICE_UNAVAILABLE, None).await;

    assert_eq!(payload.trace_id(), None);
    assert_eq!(
        payload.details(),
        Some(&json!({"providerError": "invalid_auth"}))
    );
}

#[rstest]
fn actix_errors_become_internal() {
    let actix = actix_web::error::ErrorBadGateway("upstream");
    assert_eq!(Error::from(actix).code(), ErrorCode::InternalError);
}

#[rstest]
#[case(Error::not_found("office not recognised"))]
#[case(Error::service_unavailable("slack down"))]
#[case(Error::internal("boom"))]
fn error_responses_are_not_cached(#[case] err: Error) {
    let response = ResponseError::error_response(&err);

    assert_eq!(
        response
            .headers()
            .get(actix_web::http::header::CACHE_CONTROL)
            .and_then(|value| value.to_str().ok()),
        Some("no-store")
    );
}
