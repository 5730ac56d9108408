use axum::http::StatusCode;
use chrono::Utc;
use serde_json::json;
use tower::ServiceExt;

use rsvp_shared::auth::{mint_session_token_at, SESSION_MAX_AGE_SECS};
use rsvp_shared::models::{Identity, Role};
use rsvp_shared::test_utils::http_test_utils::{create_test_request, response_to_json};

use super::*;

#[tokio::test]
async fn login_without_prior_record_awaits_rsvp() {
    let (app, directory, _) = create_test_app();
    let id = directory.add_invitee("Jane Doe", PUBLIC_PASSWORD);

    let body = login(&app, "Jane Doe").await;

    assert_eq!(body["inviteeId"], id);
    assert_eq!(body["name"], "Jane Doe");
    assert_eq!(body["role"], "invitee");
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["state"]["phase"], "awaitingRsvp");
}

#[tokio::test]
async fn login_with_existing_rsvp_starts_answered() {
    let (app, directory, _) = create_test_app();
    let id = directory.add_invitee("Jane Doe", PUBLIC_PASSWORD);
    directory.set_rsvp(&id, "No");

    let body = login(&app, "Jane Doe").await;

    assert_eq!(body["state"]["phase"], "answered");
    assert_eq!(body["state"]["rsvp"], "No");
    // No guest sub-state unless the answer is Yes.
    assert!(body["state"].get("guests").is_none());
}

#[tokio::test]
async fn login_with_yes_rsvp_reports_guest_phase() {
    let (app, directory, _) = create_test_app();
    let id = directory.add_invitee("Jane Doe", PUBLIC_PASSWORD);
    directory.set_rsvp(&id, "Yes");

    let body = login(&app, "Jane Doe").await;
    assert_eq!(body["state"]["guests"], "awaitingGuests");

    directory.set_guests(&id, "");
    let body = login(&app, "Jane Doe").await;
    assert_eq!(body["state"]["guests"], "guestsRecorded");
}

#[tokio::test]
async fn unrecognized_stored_rsvp_counts_as_unanswered() {
    let (app, directory, _) = create_test_app();
    let id = directory.add_invitee("Jane Doe", PUBLIC_PASSWORD);
    directory.set_rsvp(&id, "Maybe");

    let body = login(&app, "Jane Doe").await;
    assert_eq!(body["state"]["phase"], "awaitingRsvp");
}

#[tokio::test]
async fn login_failures_are_opaque() {
    let (app, directory, _) = create_test_app();
    directory.add_invitee("Jane Doe", PUBLIC_PASSWORD);

    // Unknown name.
    let response = app
        .clone()
        .oneshot(create_test_request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "name": "Nobody" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let unknown_name_body = response_to_json(response).await;

    // Transport-level failure for a known name.
    directory.fail_logins(true);
    let response = app
        .clone()
        .oneshot(create_test_request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "name": "Jane Doe" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let transport_body = response_to_json(response).await;

    // Identical rendering for both failure modes.
    assert_eq!(unknown_name_body, transport_body);
    assert_eq!(transport_body["message"], "Incorrect login info.");
}

#[tokio::test]
async fn empty_name_is_rejected_before_any_directory_call() {
    let (app, directory, _) = create_test_app();

    let response = app
        .clone()
        .oneshot(create_test_request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "name": "   " })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(directory.counts().login, 0);
}

#[tokio::test]
async fn admin_password_is_substituted_from_config() {
    let (app, directory, _) = create_test_app();
    directory.add_invitee(ADMIN_NAME, ADMIN_PASSWORD);

    let response = app
        .clone()
        .oneshot(create_test_request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "name": ADMIN_NAME, "password": "whatever-the-client-sent" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_to_json(response).await;
    assert_eq!(body["role"], "admin");

    // The Directory saw the configured secret, not the client credential.
    let seen = directory.last_login().unwrap();
    assert_eq!(seen.password, ADMIN_PASSWORD);
}

#[tokio::test]
async fn public_placeholder_is_used_when_password_missing() {
    let (app, directory, _) = create_test_app();
    directory.add_invitee("Jane Doe", PUBLIC_PASSWORD);

    login(&app, "Jane Doe").await;

    let seen = directory.last_login().unwrap();
    assert_eq!(seen.password, PUBLIC_PASSWORD);
}

#[tokio::test]
async fn missing_token_is_rejected() {
    let (app, _, _) = create_test_app();

    let response = app
        .clone()
        .oneshot(create_test_request("GET", "/invitation", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn session_older_than_a_day_is_treated_as_absent() {
    let (app, directory, config) = create_test_app();
    let id = directory.add_invitee("Jane Doe", PUBLIC_PASSWORD);

    let identity = Identity {
        invitee_id: id,
        name: "Jane Doe".to_string(),
        role: Role::Invitee,
        access_token: "stale-token".to_string(),
    };
    let issued = Utc::now().timestamp() - SESSION_MAX_AGE_SECS - 3600;
    let expired = mint_session_token_at(&config.session_secret, &identity, issued).unwrap();

    let response = app
        .clone()
        .oneshot(create_test_request("GET", "/invitation", Some(expired.as_str()), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_returns_to_the_unauthenticated_view() {
    let (app, directory, _) = create_test_app();
    directory.add_invitee("Jane Doe", PUBLIC_PASSWORD);
    let token = login_token(&app, "Jane Doe").await;

    let response = app
        .clone()
        .oneshot(create_test_request("POST", "/auth/logout", Some(token.as_str()), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_to_json(response).await;
    assert_eq!(body["state"]["phase"], "unauthenticated");
}

#[tokio::test]
async fn unknown_routes_fall_back_to_404() {
    let (app, _, _) = create_test_app();

    let response = app
        .clone()
        .oneshot(create_test_request("GET", "/no/such/route", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
