use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use log::{info, warn};
use rsvp_shared::auth::{mint_session_token, SessionContext};
use rsvp_shared::directory::{DirectoryClient, LoginCredentials};
use rsvp_shared::models::{Identity, RecordState, Role, RsvpChoice};

use crate::error::{AppError, Result};
use crate::models::{LoginRequest, LoginResponse};
use crate::routes::AppState;
use crate::state::{derive_page_state, PageState};

/// POST /auth/login
///
/// The identity resolver. Admin names never authenticate with
/// client-supplied credentials: the configured per-admin secret is
/// substituted, and everyone else falls back to the public placeholder.
/// Failures are opaque; the caller cannot tell a bad name from a transport
/// fault.
pub async fn login<D>(
    State(state): State<Arc<AppState<D>>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>>
where
    D: DirectoryClient,
{
    if payload.name.trim().is_empty() {
        return Err(AppError::bad_request("Name must not be empty.".to_string()));
    }

    let config = &state.config;
    let password = match config.admin_password(&payload.name) {
        Some(secret) => secret.to_string(),
        None => payload
            .password
            .clone()
            .filter(|password| !password.is_empty())
            .unwrap_or_else(|| config.public_rsvp_password.clone()),
    };

    let login = state
        .directory
        .login_user(&LoginCredentials {
            name: payload.name.clone(),
            password,
        })
        .await
        .map_err(|err| {
            warn!("Login failed for {:?}: {err}", payload.name);
            AppError::Auth
        })?;

    // Role is resolved once here and carried on the session from then on.
    let role = if config.is_admin(&login.name) {
        Role::Admin
    } else {
        Role::Invitee
    };
    let identity = Identity {
        invitee_id: login.invitee_id.clone(),
        name: login.name.clone(),
        role,
        access_token: login.token.clone(),
    };
    let token = mint_session_token(&config.session_secret, &identity)
        .map_err(|err| AppError::internal_server_error(format!("Failed to mint session token: {err}")))?;

    // A recognized prior RSVP starts the page directly in Answered.
    let rsvp: RecordState<RsvpChoice> = login
        .rsvp
        .as_deref()
        .and_then(RsvpChoice::parse)
        .into();
    let guests = match &rsvp {
        RecordState::Present(RsvpChoice::Yes) => state
            .directory
            .get_guests(&login.token)
            .await
            .unwrap_or_else(|err| {
                warn!("Guest fetch failed during login: {err}");
                RecordState::Absent
            }),
        _ => RecordState::Absent,
    };

    info!("Authenticated invitee {} as {:?}", login.invitee_id, role);

    Ok(Json(LoginResponse {
        token,
        invitee_id: identity.invitee_id,
        name: identity.name,
        role,
        state: derive_page_state(&rsvp, &guests),
    }))
}

/// POST /auth/logout
///
/// Sessions are stateless signed tokens, so signing out means the client
/// discards its token. This endpoint gives the UI an explicit transition
/// back to the unauthenticated view.
pub async fn logout(Extension(ctx): Extension<SessionContext>) -> Json<serde_json::Value> {
    info!("Invitee {} signed out", ctx.invitee_id);
    Json(serde_json::json!({
        "message": "Signed out.",
        "state": PageState::Unauthenticated,
    }))
}
