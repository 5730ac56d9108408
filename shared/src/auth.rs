use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AppConfig;
use crate::models::{Identity, Role};

/// Fixed session lifetime. A token older than this validates as absent on
/// the next access without requiring an explicit sign-out.
pub const SESSION_MAX_AGE_SECS: i64 = 24 * 60 * 60;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Invitee id.
    sub: String,
    name: String,
    role: Role,
    /// Directory Service access token, carried so every authenticated
    /// operation reads it from the session rather than ambient state.
    dir: String,
    exp: i64,
}

/// Validated session, injected as an axum `Extension` by [`auth_middleware`].
/// Handlers behind the middleware can rely on it being present; routes not
/// wrapped by the middleware can never reach them.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub invitee_id: String,
    pub name: String,
    pub role: Role,
    pub access_token: String,
}

impl SessionContext {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("missing or malformed authorization header")]
    MissingToken,
    #[error("invalid session token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

/// Signs a session token for a freshly authenticated identity.
pub fn mint_session_token(secret: &str, identity: &Identity) -> Result<String, SessionError> {
    mint_session_token_at(secret, identity, Utc::now().timestamp())
}

/// `issued_at` is exposed so expiry behavior can be exercised in tests.
pub fn mint_session_token_at(
    secret: &str,
    identity: &Identity,
    issued_at: i64,
) -> Result<String, SessionError> {
    let claims = Claims {
        sub: identity.invitee_id.clone(),
        name: identity.name.clone(),
        role: identity.role,
        dir: identity.access_token.clone(),
        exp: issued_at + SESSION_MAX_AGE_SECS,
    };
    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

pub fn verify_session_token(secret: &str, token: &str) -> Result<SessionContext, SessionError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(SessionContext {
        invitee_id: data.claims.sub,
        name: data.claims.name,
        role: data.claims.role,
        access_token: data.claims.dir,
    })
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Axum middleware gating every authenticated route. An expired or missing
/// session renders as unauthenticated; the response body never says which.
pub async fn auth_middleware(
    State(config): State<Arc<AppConfig>>,
    mut req: Request,
    next: Next,
) -> Response {
    let verified = bearer_token(req.headers())
        .ok_or(SessionError::MissingToken)
        .and_then(|token| verify_session_token(&config.session_secret, token));

    match verified {
        Ok(ctx) => {
            req.extensions_mut().insert(ctx);
            next.run(req).await
        }
        Err(err) => {
            warn!("Rejected request to {}: {}", req.uri(), err);
            (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({ "message": "Authentication required." })),
            )
                .into_response()
        }
    }
}
