//! OpenAPI document for the check-in service.
//!
//! Registers every handler path, the response DTOs and the error schema
//! wrappers. Swagger UI serves it in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::checkin::CheckinOtherForm;
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::views::{
    AttendanceView, CheckinResponse, DashboardResponse, LocationView, MessageType, OfficeView,
    StatusView, UserView,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Encrypted session cookie issued by GET /slack/callback.",
            ))),
        );
    }
}

/// OpenAPI document for the HTTP surface.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Office check-in API",
        description = "Slack sign-in, office check-in and check-out, and health probes."
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::slack_callback,
        crate::inbound::http::auth::logout,
        crate::inbound::http::checkin::dashboard,
        crate::inbound::http::checkin::check_in,
        crate::inbound::http::checkin::checkin_other,
        crate::inbound::http::checkin::checkout,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        CheckinOtherForm,
        CheckinResponse,
        DashboardResponse,
        AttendanceView,
        LocationView,
        MessageType,
        OfficeView,
        StatusView,
        UserView,
    )),
    tags(
        (name = "auth", description = "Slack sign-in"),
        (name = "checkin", description = "Presence status updates"),
        (name = "health", description = "Probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    use super::*;

    fn object_fields(schema: &RefOr<Schema>) -> Vec<String> {
        match schema {
            RefOr::T(Schema::Object(obj)) => obj.properties.keys().cloned().collect(),
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("/")]
    #[case("/checkin")]
    #[case("/checkin_other")]
    #[case("/checkout")]
    #[case("/login")]
    #[case("/slack/callback")]
    #[case("/logout")]
    #[case("/health/ready")]
    fn document_lists_path(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[test]
    fn error_schema_uses_camel_case_trace_id() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let fields = object_fields(schemas.get("crate.domain.Error").expect("Error schema"));
        assert!(fields.iter().any(|field| field == "traceId"));
        assert!(fields.iter().any(|field| field == "code"));
    }

    #[test]
    fn checkin_response_schema_has_message_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let fields = object_fields(schemas.get("CheckinResponse").expect("CheckinResponse"));
        for field in ["message", "messageType", "status", "attendance"] {
            assert!(fields.iter().any(|name| name == field), "missing {field}");
        }
    }
}
