use std::sync::Arc;

use axum::http::StatusCode;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use rsvp_shared::config::{AdminAccount, AppConfig};
use rsvp_shared::test_utils::http_test_utils::{create_test_request, response_to_json};
use rsvp_shared::test_utils::mock_directory::MockDirectoryClient;
use rsvp_shared::test_utils::test_logging::init_test_logging;

use crate::routes::create_router_with_client;

mod auth_handlers_test;

pub const TEST_SECRET: &str = "test-session-secret";
pub const PUBLIC_PASSWORD: &str = "open-sesame";
pub const ADMIN_NAME: &str = "April Organizer";
pub const ADMIN_PASSWORD: &str = "organizer-secret";

pub fn test_config() -> Arc<AppConfig> {
    Arc::new(AppConfig {
        directory_api_url: "http://directory.test".to_string(),
        session_secret: TEST_SECRET.to_string(),
        public_rsvp_password: PUBLIC_PASSWORD.to_string(),
        invitation_image_url: "https://assets.test/invitation.png".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        admins: vec![AdminAccount {
            name: ADMIN_NAME.to_string(),
            password: Some(ADMIN_PASSWORD.to_string()),
        }],
    })
}

pub fn create_test_app() -> (Router, Arc<MockDirectoryClient>, Arc<AppConfig>) {
    init_test_logging();
    let directory = Arc::new(MockDirectoryClient::new());
    let config = test_config();
    let app = create_router_with_client(directory.clone(), config.clone());
    (app, directory, config)
}

/// Logs in through the real endpoint and returns the full response body.
pub async fn login(app: &Router, name: &str) -> Value {
    let response = app
        .clone()
        .oneshot(create_test_request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "name": name })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response_to_json(response).await
}

/// Convenience for the common case: log in and hand back the session token.
pub async fn login_token(app: &Router, name: &str) -> String {
    login(app, name).await["token"].as_str().unwrap().to_string()
}
