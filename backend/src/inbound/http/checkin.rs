//! Check-in, check-out and dashboard handlers.
//!
//! ```text
//! GET  /                                  dashboard JSON
//! POST /checkin                           office from the trusted origin
//! POST /checkin_other  location_type=...  explicit off-site location
//! POST /checkout                          clear the status
//! ```

use actix_web::http::header;
use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::ports::StampKind;
use crate::domain::{CheckinAction, CheckinError, Transition, UserSession};
use crate::inbound::http::ApiResult;
use crate::inbound::http::origin::ClientOrigin;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::views::{
    AttendanceView, CheckinResponse, DashboardResponse, LocationView, OfficeView, UserView,
};

/// Form body for `POST /checkin_other`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckinOtherForm {
    /// Work location key such as `remote` or `site`.
    #[serde(default)]
    #[schema(example = "remote")]
    pub location_type: String,
}

fn origin_str(origin: Option<&ClientOrigin>) -> &str {
    origin.map_or("", ClientOrigin::as_str)
}

async fn run(
    state: &HttpState,
    session: &SessionContext,
    action: CheckinAction,
    origin: &str,
) -> ApiResult<(Transition, Option<UserSession>)> {
    let user = session.user()?;
    let transition = state.controller.apply(user.as_ref(), &action, origin).await?;
    Ok((transition, user))
}

/// Attendance flags for `user` as the ledger reports them now.
async fn attendance_view(state: &HttpState, user: Option<&UserSession>) -> AttendanceView {
    let linked = user.and_then(UserSession::attendance_user_id);
    let status = state.attendance.status(linked).await;
    AttendanceView::new(state.attendance.is_enabled(), linked.is_some(), status)
}

async fn arrive(
    state: &HttpState,
    session: &SessionContext,
    action: CheckinAction,
    origin: &str,
) -> ApiResult<web::Json<CheckinResponse>> {
    let (transition, user) = run(state, session, action, origin).await?;
    let note = state
        .attendance
        .record(
            user.as_ref().and_then(UserSession::attendance_user_id),
            StampKind::Arrival,
        )
        .await;
    let name = transition
        .target
        .as_ref()
        .map_or("", |target| target.display_name());
    let message = format!("{name}で出勤しました{}", note.suffix());
    Ok(web::Json(CheckinResponse::success(
        message,
        &transition.status,
        transition.target.as_ref(),
        attendance_view(state, user.as_ref()).await,
    )))
}

/// Check in at the office matching the caller's network origin.
#[utoipa::path(
    post,
    path = "/checkin",
    responses(
        (status = 200, description = "Status set to the office", body = CheckinResponse),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 403, description = "Account outside the allowed domain", body = ErrorSchema),
        (status = 404, description = "Office not recognised", body = ErrorSchema),
        (status = 503, description = "Slack profile update failed", body = ErrorSchema)
    ),
    tags = ["checkin"],
    operation_id = "checkIn"
)]
#[post("/checkin")]
pub async fn check_in(
    state: web::Data<HttpState>,
    session: SessionContext,
    origin: Option<ClientOrigin>,
) -> ApiResult<web::Json<CheckinResponse>> {
    arrive(
        &state,
        &session,
        CheckinAction::CheckIn,
        origin_str(origin.as_ref()),
    )
    .await
}

/// Check in at an explicitly chosen off-site location.
#[utoipa::path(
    post,
    path = "/checkin_other",
    request_body(content = CheckinOtherForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Status set to the location", body = CheckinResponse),
        (status = 400, description = "Unknown location", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 403, description = "Account outside the allowed domain", body = ErrorSchema),
        (status = 503, description = "Slack profile update failed", body = ErrorSchema)
    ),
    tags = ["checkin"],
    operation_id = "checkInOther"
)]
#[post("/checkin_other")]
pub async fn checkin_other(
    state: web::Data<HttpState>,
    session: SessionContext,
    origin: Option<ClientOrigin>,
    form: web::Form<CheckinOtherForm>,
) -> ApiResult<web::Json<CheckinResponse>> {
    let action = CheckinAction::CheckInAt(form.into_inner().location_type);
    arrive(&state, &session, action, origin_str(origin.as_ref())).await
}

/// Clear the status and record departure.
#[utoipa::path(
    post,
    path = "/checkout",
    responses(
        (status = 200, description = "Status cleared", body = CheckinResponse),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 403, description = "Account outside the allowed domain", body = ErrorSchema),
        (status = 503, description = "Slack profile update failed", body = ErrorSchema)
    ),
    tags = ["checkin"],
    operation_id = "checkOut"
)]
#[post("/checkout")]
pub async fn checkout(
    state: web::Data<HttpState>,
    session: SessionContext,
    origin: Option<ClientOrigin>,
) -> ApiResult<web::Json<CheckinResponse>> {
    let (transition, user) = run(
        &state,
        &session,
        CheckinAction::CheckOut,
        origin_str(origin.as_ref()),
    )
    .await?;
    let note = state
        .attendance
        .record(
            user.as_ref().and_then(UserSession::attendance_user_id),
            StampKind::Departure,
        )
        .await;
    let message = format!("退勤しました。お疲れ様でした！{}", note.suffix());
    Ok(web::Json(CheckinResponse::success(
        message,
        &transition.status,
        None,
        attendance_view(&state, user.as_ref()).await,
    )))
}

/// Dashboard for the signed-in user; redirects to `/login` otherwise.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Dashboard", body = DashboardResponse),
        (status = 302, description = "Not signed in; redirect to /login"),
        (status = 403, description = "Account outside the allowed domain", body = ErrorSchema)
    ),
    tags = ["checkin"],
    operation_id = "dashboard"
)]
#[get("/")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
    origin: Option<ClientOrigin>,
) -> ApiResult<HttpResponse> {
    let Some(user) = session.user()? else {
        return Ok(HttpResponse::Found()
            .insert_header((header::LOCATION, "/login"))
            .finish());
    };
    let policy = state.policy();
    policy
        .authorize(Some(&user))
        .map_err(CheckinError::from)?;

    let office = origin
        .as_ref()
        .and_then(|origin| policy.offices().resolve(origin.as_str()))
        .map(OfficeView::from);
    let attendance = attendance_view(&state, Some(&user)).await;
    let body = DashboardResponse {
        user: UserView::from(&user),
        client_address: origin.map(|origin| origin.as_str().to_owned()),
        office,
        locations: policy
            .locations()
            .all()
            .iter()
            .map(LocationView::from)
            .collect(),
        attendance,
    };
    Ok(HttpResponse::Ok().json(body))
}

#[cfg(test)]
#[path = "checkin_tests.rs"]
mod tests;
