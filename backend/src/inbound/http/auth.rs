//! Slack sign-in handlers.
//!
//! ```text
//! GET /login                 -> 302 Slack consent screen
//! GET /slack/callback?code=  -> 302 /
//! GET /logout                -> 302 /login
//! ```

use actix_web::http::header;
use actix_web::{HttpResponse, get, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::domain::ports::IdentityProviderError;
use crate::domain::{EmailAddress, Error, UserSession};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Query string Slack appends to the redirect URI.
#[derive(Debug, Deserialize, IntoParams)]
pub struct CallbackQuery {
    /// Authorization code to exchange.
    pub code: Option<String>,
    /// Set when the user declined consent.
    pub error: Option<String>,
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Start the OAuth flow.
#[utoipa::path(
    get,
    path = "/login",
    responses((status = 302, description = "Redirect to the Slack consent screen")),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[get("/login")]
pub async fn login(state: web::Data<HttpState>) -> HttpResponse {
    redirect(state.identity.authorize_url().as_str())
}

/// Complete the OAuth flow and establish a session.
#[utoipa::path(
    get,
    path = "/slack/callback",
    params(CallbackQuery),
    responses(
        (status = 302, description = "Signed in; redirect to the dashboard",
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Consent declined or code rejected", body = ErrorSchema),
        (status = 403, description = "Account outside the allowed domain", body = ErrorSchema),
        (status = 503, description = "Slack unreachable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "slackCallback",
    security([])
)]
#[get("/slack/callback")]
pub async fn slack_callback(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<CallbackQuery>,
) -> ApiResult<HttpResponse> {
    let CallbackQuery { code, error } = query.into_inner();
    if let Some(error) = error {
        return Err(Error::invalid_request("authorisation was not granted")
            .with_details(json!({ "providerError": error })));
    }
    let code = code
        .filter(|code| !code.trim().is_empty())
        .ok_or_else(|| Error::invalid_request("authorisation code missing"))?;

    let identity = state
        .identity
        .complete(&code)
        .await
        .map_err(map_identity_error)?;

    let allowed = state.policy().allowed_domain();
    let email = EmailAddress::new(identity.email.clone())
        .ok()
        .filter(|email| state.policy().admit_email(email).is_ok())
        .ok_or_else(|| {
            tracing::warn!(user_id = %identity.user_id, "sign-in rejected outside allowed domain");
            Error::forbidden(format!("this service is limited to @{allowed} accounts"))
        })?;

    let attendance_user_id = state.attendance.link(&email).await;
    let user = UserSession::new(
        identity.user_id,
        identity.display_name,
        email,
        identity.access_token,
        attendance_user_id,
    );
    session.persist_user(&user)?;
    tracing::info!(user_id = user.user_id(), "user signed in");
    Ok(redirect("/"))
}

fn map_identity_error(error: IdentityProviderError) -> Error {
    tracing::warn!(error = %error, "Slack sign-in failed");
    match error {
        IdentityProviderError::Denied { code } => Error::invalid_request("Slack rejected the sign-in")
            .with_details(json!({ "providerError": code })),
        IdentityProviderError::Transport { .. } | IdentityProviderError::Decode { .. } => {
            Error::service_unavailable("Slack is unavailable")
        }
    }
}

/// End the session.
#[utoipa::path(
    get,
    path = "/logout",
    responses((status = 302, description = "Session cleared; redirect to /login")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[get("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    redirect("/login")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::domain::ports::{
        FixtureProfileStatusWriter, MockAttendanceLedger, MockIdentityProvider,
    };
    use crate::domain::{
        AccessToken, AllowedDomain, AttendanceUserId, CheckinPolicy, Identity, OfficeDirectory,
    };
    use crate::inbound::http::state::HttpStatePorts;
    use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};

    fn identity(email: &str) -> Identity {
        Identity {
            user_id: "U777".to_owned(),
            display_name: "Taro".to_owned(),
            email: email.to_owned(),
            access_token: AccessToken::new("xoxp-777").expect("token"),
        }
    }

    fn state(
        identity: MockIdentityProvider,
        ledger: Option<MockAttendanceLedger>,
    ) -> web::Data<HttpState> {
        let policy = CheckinPolicy::new(
            OfficeDirectory::builtin(),
            AllowedDomain::new("altenergy.co.jp").expect("domain"),
        );
        web::Data::new(HttpState::new(
            HttpStatePorts {
                identity: Arc::new(identity),
                profile_writer: Arc::new(FixtureProfileStatusWriter),
                attendance_ledger: ledger.map(|ledger| Arc::new(ledger) as _),
            },
            policy,
            Arc::new(mockable::DefaultClock),
        ))
    }

    fn test_app(
        state: web::Data<HttpState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(state)
            .wrap(test_session_middleware())
            .service(login)
            .service(slack_callback)
            .service(logout)
    }

    #[actix_web::test]
    async fn login_redirects_to_consent_screen() {
        let mut provider = MockIdentityProvider::new();
        provider.expect_authorize_url().returning(|| {
            url::Url::parse("https://slack.com/oauth/v2/authorize?client_id=1").expect("url")
        });
        let app = actix_test::init_service(test_app(state(provider, None))).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/login").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(
            res.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
            Some("https://slack.com/oauth/v2/authorize?client_id=1")
        );
    }

    #[rstest]
    #[case("/slack/callback?error=access_denied", "authorisation was not granted")]
    #[case("/slack/callback", "authorisation code missing")]
    #[case("/slack/callback?code=", "authorisation code missing")]
    #[actix_web::test]
    async fn callback_rejects_missing_code(#[case] uri: &str, #[case] message: &str) {
        let mut provider = MockIdentityProvider::new();
        provider.expect_complete().never();
        let app = actix_test::init_service(test_app(state(provider, None))).await;

        let res =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
                .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["message"], message);
    }

    #[actix_web::test]
    async fn callback_maps_denied_exchange_to_bad_request() {
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_complete()
            .returning(|_| Err(IdentityProviderError::denied("invalid_code")));
        let app = actix_test::init_service(test_app(state(provider, None))).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/slack/callback?code=stale")
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["details"]["providerError"], "invalid_code");
    }

    #[rstest]
    #[case("mallory@example.com")]
    #[case("mallory@mail.altenergy.co.jp")]
    #[case("")]
    #[actix_web::test]
    async fn callback_rejects_outsiders(#[case] email: &str) {
        let email = email.to_owned();
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_complete()
            .returning(move |_| Ok(identity(&email)));
        let app = actix_test::init_service(test_app(state(provider, None))).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/slack/callback?code=abc")
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert!(
            res.response()
                .cookies()
                .all(|cookie| cookie.name() != "session")
        );
    }

    #[actix_web::test]
    async fn callback_links_attendance_and_sets_session() {
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_complete()
            .withf(|code| code == "abc")
            .returning(|_| Ok(identity("taro@altenergy.co.jp")));
        let mut ledger = MockAttendanceLedger::new();
        ledger
            .expect_find_user_by_email()
            .withf(|email| email == "taro@altenergy.co.jp")
            .times(1)
            .returning(|_| Ok(Some(AttendanceUserId::new(9))));
        let app = actix_test::init_service(test_app(state(provider, Some(ledger)))).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/slack/callback?code=abc")
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(
            res.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
            Some("/")
        );
        assert!(!session_cookie(&res).value().is_empty());
    }

    #[actix_web::test]
    async fn logout_clears_session_and_redirects() {
        let app =
            actix_test::init_service(test_app(state(MockIdentityProvider::new(), None))).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/logout").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(
            res.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
            Some("/login")
        );
    }
}
