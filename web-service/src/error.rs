use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::warn;
use rsvp_shared::directory::DirectoryError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Error taxonomy for the service. Authentication failures stay opaque to
/// the caller; a write failure leaves the pre-submission state untouched; a
/// read failure on a render path degrades instead of reaching here. Nothing
/// is allowed to crash a page.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("authentication failed")]
    Auth,
    #[error("directory write failed: {0}")]
    Write(DirectoryError),
    #[error("directory read failed: {0}")]
    Read(DirectoryError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn bad_request(message: String) -> Self {
        AppError::BadRequest(message)
    }

    pub fn forbidden(message: String) -> Self {
        AppError::Forbidden(message)
    }

    pub fn internal_server_error(message: String) -> Self {
        AppError::Internal(message)
    }

    pub fn write(err: DirectoryError) -> Self {
        AppError::Write(err)
    }

    pub fn read(err: DirectoryError) -> Self {
        AppError::Read(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Upstream detail goes to the log; the client gets the transient
        // toast text only.
        let (status, message) = match &self {
            AppError::Auth => (StatusCode::UNAUTHORIZED, "Incorrect login info."),
            AppError::Write(err) => {
                warn!("Directory write failed: {err}");
                (StatusCode::BAD_GATEWAY, "Not submitted.")
            }
            AppError::Read(err) => {
                warn!("Directory read failed: {err}");
                (StatusCode::BAD_GATEWAY, "Could not load your invitation.")
            }
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message.as_str()),
            AppError::Forbidden(message) => (StatusCode::FORBIDDEN, message.as_str()),
            AppError::Internal(message) => {
                warn!("Internal error: {message}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong.")
            }
        };
        (
            status,
            Json(serde_json::json!({ "message": message })),
        )
            .into_response()
    }
}
