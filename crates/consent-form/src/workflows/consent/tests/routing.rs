use super::common::*;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::consent::errors::{GENERIC_ERROR, MISSING_ACTIVITY_AND_PROPERTY};
use crate::workflows::consent::router::{
    consent_router, ACTIVITY_PATH, GENERATE_PATH, PAGE_PATH, PROPERTY_PATH, STANDARDS_PATH,
    STATE_PATH,
};
use crate::workflows::consent::session::{spawn_session, SessionHandle};

fn session() -> SessionHandle {
    let (session, _task) = spawn_session(model(), dispatcher(), Arc::new(RecordingEngine::default()));
    session
}

fn post_json(path: &str, payload: &Value) -> Request<Body> {
    Request::post(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(payload).expect("json body")))
        .expect("request builds")
}

#[tokio::test]
async fn page_route_renders_html() {
    let router = consent_router(session());
    let response = router
        .oneshot(Request::get(PAGE_PATH).body(Body::empty()).expect("request builds"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("text/html; charset=utf-8")
    );
    let body = read_body(response).await;
    assert!(body.contains("Generate Standards"));
}

#[tokio::test]
async fn property_route_selects_parcel() {
    let session = session();
    let router = consent_router(session.clone());

    let response = router
        .oneshot(post_json(PROPERTY_PATH, &property_json()))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_body(response).await;
    assert!(body.contains("12 Main St, Ponsonby, Auckland 1011"));
    assert_eq!(
        session
            .snapshot()
            .selected_property
            .map(|property| property.dp_zone),
        Some("R1".to_string())
    );
}

#[tokio::test]
async fn malformed_property_renders_generic_banner() {
    let router = consent_router(session());
    let response = router
        .oneshot(post_json(PROPERTY_PATH, &property_json_without("suburb")))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_body(response).await;
    assert!(body.contains(GENERIC_ERROR));
}

#[tokio::test]
async fn generate_without_selection_renders_hint() {
    let router = consent_router(session());
    let response = router
        .oneshot(Request::post(GENERATE_PATH).body(Body::empty()).expect("request builds"))
        .await
        .expect("route executes");

    let body = read_body(response).await;
    assert!(body.contains(MISSING_ACTIVITY_AND_PROPERTY));
}

#[tokio::test]
async fn standards_callback_and_state_snapshot() {
    let session = session();

    let response = consent_router(session.clone())
        .oneshot(post_json(ACTIVITY_PATH, &json!({ "activity": "Build a deck" })))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let response = consent_router(session.clone())
        .oneshot(post_json(STANDARDS_PATH, &standards_json(&["deck"])))
        .await
        .expect("route executes");
    let body = read_body(response).await;
    assert!(!body.contains("Generate Standards"));

    let response = consent_router(session)
        .oneshot(Request::get(STATE_PATH).body(Body::empty()).expect("request builds"))
        .await
        .expect("route executes");
    let body = read_body(response).await;
    let state: Value = serde_json::from_str(&body).expect("json state");
    assert_eq!(state["selected_activity"], json!("Build a deck"));
    assert_eq!(state["standards"][0]["key"], json!("deck"));
    assert_eq!(state["standards"][0]["activityStatus"], json!("Controlled"));
}
