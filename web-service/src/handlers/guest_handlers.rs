use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use log::{error, info};
use rsvp_shared::auth::SessionContext;
use rsvp_shared::directory::DirectoryClient;
use rsvp_shared::models::{MessageResponse, RecordState};

use crate::error::{AppError, Result};
use crate::handlers::page_state_with_fallback;
use crate::models::{GuestsSubmitRequest, SubmitResponse};
use crate::routes::AppState;
use crate::state::{plan_guests_write, WriteKind};

/// POST /guests
///
/// The guest sub-machine: create only when the prior fetch said
/// record-absent. An existing record holding an empty string updates, and
/// submitting an empty list is itself meaningful for the counts. This path
/// never blocks on the RSVP sub-state.
pub async fn submit_guests<D>(
    State(state): State<Arc<AppState<D>>>,
    Extension(ctx): Extension<SessionContext>,
    Json(payload): Json<GuestsSubmitRequest>,
) -> Result<Json<SubmitResponse>>
where
    D: DirectoryClient,
{
    let current = state
        .directory
        .get_guests(&ctx.access_token)
        .await
        .map_err(AppError::read)?;

    match plan_guests_write(&current) {
        WriteKind::Create => state
            .directory
            .create_guests(&ctx.access_token, &payload.guests)
            .await
            .map_err(AppError::write)?,
        WriteKind::Update => state
            .directory
            .update_guests(&ctx.access_token, &payload.guests)
            .await
            .map_err(AppError::write)?,
    }
    info!("Recorded guests for {}", ctx.invitee_id);

    // The guest record is now durable; the RSVP side has no written value
    // to fall back on here, so a failed RSVP read still degrades.
    Ok(Json(SubmitResponse {
        message: "Successfully submitted!".to_string(),
        state: page_state_with_fallback(
            &state,
            &ctx,
            RecordState::Absent,
            RecordState::Present(payload.guests),
        )
        .await,
    }))
}

/// POST /newguests
///
/// First-time login flow: the payload is forwarded to the Directory
/// verbatim, with no validation at this boundary.
pub async fn create_new_guests<D>(
    State(state): State<Arc<AppState<D>>>,
    Extension(ctx): Extension<SessionContext>,
    Json(payload): Json<serde_json::Value>,
) -> (StatusCode, Json<MessageResponse>)
where
    D: DirectoryClient,
{
    match state
        .directory
        .create_new_guests(&ctx.access_token, &payload)
        .await
    {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: "Success".to_string(),
            }),
        ),
        Err(err) => {
            error!("Failed to create new guests for {}: {err}", ctx.invitee_id);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse {
                    message: "Error creating new guests.".to_string(),
                }),
            )
        }
    }
}
