//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use checkin::Trace;
#[cfg(debug_assertions)]
use checkin::doc::ApiDoc;
use checkin::inbound::http::auth::{login, logout, slack_callback};
use checkin::inbound::http::checkin::{check_in, checkin_other, checkout, dashboard};
use checkin::inbound::http::health::{HealthState, live, ready};
use checkin::inbound::http::origin::OriginPolicy;
use checkin::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

const SESSION_TTL_HOURS: i64 = 2;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    origin_policy: web::Data<OriginPolicy>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        origin_policy,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(PersistentSession::default().session_ttl(
            actix_web::cookie::time::Duration::hours(SESSION_TTL_HOURS),
        ))
        .build();

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(origin_policy)
        .wrap(session)
        .wrap(Trace)
        .service(dashboard)
        .service(check_in)
        .service(checkin_other)
        .service(checkout)
        .service(login)
        .service(slack_callback)
        .service(logout)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct the Actix HTTP server.
///
/// Readiness is flagged once the listener is bound.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when an outbound client cannot be built or
/// the socket cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config)?;
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        origin_policy,
        ..
    } = config;
    let origin_policy = web::Data::new(origin_policy);

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            origin_policy: origin_policy.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use checkin::domain::AllowedDomain;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[actix_web::test]
    async fn session_cookie_expires_after_two_hours() {
        let config = ServerConfig::new(
            Key::generate(),
            false,
            SameSite::Lax,
            "127.0.0.1:0".parse().expect("addr"),
            AllowedDomain::new("altenergy.co.jp").expect("domain"),
        );
        let app = test::init_service(build_app(AppDependencies {
            health_state: web::Data::new(HealthState::new()),
            http_state: build_http_state(&config).expect("state"),
            origin_policy: web::Data::new(OriginPolicy::default()),
            key: config.key.clone(),
            cookie_secure: false,
            same_site: SameSite::Lax,
        }))
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/slack/callback?code=fixture-code")
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::FOUND);
        let cookie = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie");
        assert_eq!(
            cookie.max_age(),
            Some(actix_web::cookie::time::Duration::hours(2))
        );
        assert_eq!(cookie.http_only(), Some(true));
    }
}
