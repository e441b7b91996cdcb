//! End-to-end HTTP flow over the fixture adapters.
//!
//! Signs in through the OAuth callback, checks in from an office address
//! behind the proxy, checks out and logs out, asserting the session cookie
//! and trace headers along the way.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use rstest::{fixture, rstest};
use serde_json::Value;

use checkin::Trace;
use checkin::domain::ports::{FixtureIdentityProvider, FixtureProfileStatusWriter};
use checkin::domain::{AllowedDomain, CheckinPolicy, OfficeDirectory};
use checkin::inbound::http::auth::{login, logout, slack_callback};
use checkin::inbound::http::checkin::{check_in, checkin_other, checkout, dashboard};
use checkin::inbound::http::origin::OriginPolicy;
use checkin::inbound::http::state::{HttpState, HttpStatePorts};
use checkin::middleware::TRACE_ID_HEADER;

#[fixture]
fn state() -> web::Data<HttpState> {
    let policy = CheckinPolicy::new(
        OfficeDirectory::builtin(),
        AllowedDomain::new("altenergy.co.jp").expect("domain"),
    );
    web::Data::new(HttpState::new(
        HttpStatePorts {
            identity: Arc::new(FixtureIdentityProvider::default()),
            profile_writer: Arc::new(FixtureProfileStatusWriter),
            attendance_ledger: None,
        },
        policy,
        Arc::new(mockable::DefaultClock),
    ))
}

fn app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    App::new()
        .app_data(state)
        .app_data(web::Data::new(OriginPolicy {
            trust_forwarded_for: true,
        }))
        .wrap(session)
        .wrap(Trace)
        .service(dashboard)
        .service(check_in)
        .service(checkin_other)
        .service(checkout)
        .service(login)
        .service(slack_callback)
        .service(logout)
}

fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

fn location<B>(res: &ServiceResponse<B>) -> Option<&str> {
    res.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

#[rstest]
#[actix_web::test]
async fn sign_in_check_in_check_out_and_log_out(state: web::Data<HttpState>) {
    let app = test::init_service(app(state)).await;

    let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), Some("/login"));

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/slack/callback?code=fixture-code")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), Some("/"));
    let cookie = session_cookie(&res);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/checkin")
            .insert_header(("X-Forwarded-For", "143.189.212.172, 10.0.0.3"))
            .peer_addr("10.0.0.3:40000".parse().expect("peer"))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key(TRACE_ID_HEADER));
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "立川オフィスで出勤しました");
    assert_eq!(body["status"]["statusText"], "立川オフィスで勤務中");
    assert_eq!(body["status"]["statusEmoji"], ":cityscape:");

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/checkout")
            .peer_addr("203.0.113.9:40000".parse().expect("peer"))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "退勤しました。お疲れ様でした！");
    assert_eq!(body["status"]["statusText"], "");

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), Some("/login"));
    assert_eq!(session_cookie(&res).value(), "");
}

#[rstest]
#[actix_web::test]
async fn unknown_office_keeps_trace_id_in_error(state: web::Data<HttpState>) {
    let app = test::init_service(app(state)).await;
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/slack/callback?code=fixture-code")
            .to_request(),
    )
    .await;
    let cookie = session_cookie(&res);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/checkin")
            .insert_header(("X-Forwarded-For", "203.0.113.9"))
            .peer_addr("10.0.0.3:40000".parse().expect("peer"))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let header_trace = res
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace header");
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "office not recognised");
    assert_eq!(body["details"]["clientAddress"], "203.0.113.9");
    assert_eq!(body["traceId"], header_trace.as_str());
}

#[rstest]
#[actix_web::test]
async fn dashboard_lists_locations_after_sign_in(state: web::Data<HttpState>) {
    let app = test::init_service(app(state)).await;
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/slack/callback?code=fixture-code")
            .to_request(),
    )
    .await;
    let cookie = session_cookie(&res);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/")
            .insert_header(("X-Forwarded-For", "39.110.215.6"))
            .peer_addr("10.0.0.3:40000".parse().expect("peer"))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["user"]["email"], "fixture@altenergy.co.jp");
    assert_eq!(body["office"]["displayName"], "銀座オフィス");
    assert_eq!(body["attendance"]["enabled"], false);
    let keys: Vec<&str> = body["locations"]
        .as_array()
        .expect("locations")
        .iter()
        .filter_map(|location| location["key"].as_str())
        .collect();
    assert_eq!(keys, ["remote", "site"]);
}
