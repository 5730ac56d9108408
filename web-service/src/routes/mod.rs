use axum::{
    extract::Request,
    middleware,
    routing::{get, post},
    Router,
};
use log::{info, warn};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use rsvp_shared::auth::auth_middleware;
use rsvp_shared::config::AppConfig;
use rsvp_shared::directory::{DirectoryClient, DirectoryError, HttpDirectoryClient};

use crate::handlers::{
    auth_handlers::{login, logout},
    dashboard_handlers::get_dashboard,
    guest_handlers::{create_new_guests, submit_guests},
    rsvp_handlers::{get_invitation, submit_rsvp},
};

/// Everything a handler needs, injected through axum state: the Directory
/// client and the loaded configuration. No ambient globals.
pub struct AppState<D> {
    pub directory: Arc<D>,
    pub config: Arc<AppConfig>,
}

/// Creates a router backed by the real Directory Service client.
pub fn create_router(config: Arc<AppConfig>) -> Result<Router, DirectoryError> {
    info!(
        "Creating router with Directory client for {}",
        config.directory_api_url
    );
    let directory = Arc::new(HttpDirectoryClient::new(config.directory_api_url.clone())?);
    Ok(create_router_with_client(directory, config))
}

/// Creates a router with a given Directory client implementation.
pub fn create_router_with_client<D>(directory: Arc<D>, config: Arc<AppConfig>) -> Router
where
    D: DirectoryClient + 'static,
{
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Logging middleware to trace all requests
    async fn logging_middleware(
        req: Request,
        next: middleware::Next,
    ) -> impl axum::response::IntoResponse {
        info!(
            "Router received request: method={}, uri={}",
            req.method(),
            req.uri()
        );
        next.run(req).await
    }

    let state = Arc::new(AppState { directory, config: config.clone() });

    // Everything past login requires a valid session token.
    let protected_routes = Router::new()
        .route("/auth/logout", post(logout))
        .route("/invitation", get(get_invitation))
        .route("/rsvp", post(submit_rsvp))
        .route("/guests", post(submit_guests))
        .route("/newguests", post(create_new_guests))
        .route("/dashboard", get(get_dashboard))
        .layer(middleware::from_fn_with_state(config, auth_middleware))
        .with_state(state.clone());

    let public_routes = Router::new()
        .route("/auth/login", post(login))
        .with_state(state);

    public_routes
        .merge(protected_routes)
        .layer(cors)
        .layer(middleware::from_fn(logging_middleware))
        .fallback(|req: Request| async move {
            warn!("No route matched for: {} {}", req.method(), req.uri());
            (
                axum::http::StatusCode::NOT_FOUND,
                "The requested resource was not found".to_string(),
            )
        })
}
