use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use maud::Markup;
use serde::Deserialize;
use serde_json::Value;

use super::dispatch::ConsentEvent;
use super::domain::Activity;
use super::session::SessionHandle;
use super::view::{render_form, render_page};
use crate::error::AppError;

pub const PAGE_PATH: &str = "/";
pub const FORM_PATH: &str = "/api/v1/consent/form";
pub const STATE_PATH: &str = "/api/v1/consent/state";
pub const ACTIVITY_PATH: &str = "/api/v1/consent/activity";
pub const PROPERTY_PATH: &str = "/api/v1/consent/property";
pub const STANDARDS_PATH: &str = "/api/v1/consent/standards";
pub const GENERATE_PATH: &str = "/api/v1/consent/generate";

/// Body posted by the activity selector.
#[derive(Debug, Deserialize)]
pub struct ActivitySelection {
    pub activity: String,
}

/// Routes for the form page and the two inbound channels. Every mutating
/// route answers with the re-rendered form fragment.
pub fn consent_router(session: SessionHandle) -> Router {
    Router::new()
        .route(PAGE_PATH, get(page_handler))
        .route(FORM_PATH, get(form_handler))
        .route(STATE_PATH, get(state_handler))
        .route(ACTIVITY_PATH, post(activity_handler))
        .route(PROPERTY_PATH, post(property_handler))
        .route(STANDARDS_PATH, post(standards_handler))
        .route(GENERATE_PATH, post(generate_handler))
        .with_state(session)
}

pub(crate) async fn page_handler(State(session): State<SessionHandle>) -> Response {
    html_response(render_page(&session.snapshot()))
}

pub(crate) async fn form_handler(State(session): State<SessionHandle>) -> Response {
    html_response(render_form(&session.snapshot()))
}

pub(crate) async fn state_handler(State(session): State<SessionHandle>) -> Response {
    Json(session.snapshot()).into_response()
}

pub(crate) async fn activity_handler(
    State(session): State<SessionHandle>,
    Json(selection): Json<ActivitySelection>,
) -> Result<Response, AppError> {
    let event = ConsentEvent::SelectActivity(Activity::new(selection.activity));
    dispatch_and_render(&session, event).await
}

pub(crate) async fn property_handler(
    State(session): State<SessionHandle>,
    Json(raw): Json<Value>,
) -> Result<Response, AppError> {
    dispatch_and_render(&session, ConsentEvent::SelectMapProperty(raw)).await
}

pub(crate) async fn standards_handler(
    State(session): State<SessionHandle>,
    Json(raw): Json<Value>,
) -> Result<Response, AppError> {
    dispatch_and_render(&session, ConsentEvent::ReceiveStandards(raw)).await
}

pub(crate) async fn generate_handler(
    State(session): State<SessionHandle>,
) -> Result<Response, AppError> {
    dispatch_and_render(&session, ConsentEvent::GenerateStandards).await
}

async fn dispatch_and_render(
    session: &SessionHandle,
    event: ConsentEvent,
) -> Result<Response, AppError> {
    let model = session.dispatch(event).await?;
    Ok(html_response(render_form(&model)))
}

fn html_response(markup: Markup) -> Response {
    (
        [(header::CONTENT_TYPE, mime::TEXT_HTML_UTF_8.as_ref())],
        markup.into_string(),
    )
        .into_response()
}
