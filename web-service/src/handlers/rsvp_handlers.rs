use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use log::info;
use rsvp_shared::auth::SessionContext;
use rsvp_shared::directory::DirectoryClient;
use rsvp_shared::models::RecordState;

use crate::error::{AppError, Result};
use crate::handlers::{page_state_with_fallback, refreshed_page_state};
use crate::models::{InvitationView, RsvpSubmitRequest, SubmitResponse};
use crate::routes::AppState;
use crate::state::{plan_guests_write, plan_rsvp_write, WriteKind, WritePlan};

/// GET /invitation
pub async fn get_invitation<D>(
    State(state): State<Arc<AppState<D>>>,
    Extension(ctx): Extension<SessionContext>,
) -> Result<Json<InvitationView>>
where
    D: DirectoryClient,
{
    Ok(Json(InvitationView {
        state: refreshed_page_state(&state, &ctx).await,
        image_url: state.config.invitation_image_url.clone(),
        dashboard_visible: ctx.is_admin(),
    }))
}

/// POST /rsvp
///
/// The state machine picks create or update from the fetched record state,
/// never from anything remembered about this session. Optional guests ride
/// along for the first-time flow; the RSVP write completes first because
/// the guest record is keyed by the invitee id it makes durable. Every
/// write is a single attempt with no retry.
pub async fn submit_rsvp<D>(
    State(state): State<Arc<AppState<D>>>,
    Extension(ctx): Extension<SessionContext>,
    Json(payload): Json<RsvpSubmitRequest>,
) -> Result<Json<SubmitResponse>>
where
    D: DirectoryClient,
{
    let current = state
        .directory
        .get_rsvp(&ctx.access_token)
        .await
        .map_err(AppError::read)?;

    let plan = plan_rsvp_write(&current, payload.rsvp)
        .map_err(|err| AppError::bad_request(err.to_string()))?;

    let message = match plan {
        WritePlan::Skip => {
            info!(
                "Suppressed no-op RSVP resubmission of {} for {}",
                payload.rsvp, ctx.invitee_id
            );
            "No change."
        }
        WritePlan::Write(WriteKind::Create) => {
            state
                .directory
                .create_rsvp(&ctx.access_token, payload.rsvp)
                .await
                .map_err(AppError::write)?;
            info!("Created RSVP {} for {}", payload.rsvp, ctx.invitee_id);
            "Successfully submitted!"
        }
        WritePlan::Write(WriteKind::Update) => {
            state
                .directory
                .update_rsvp(&ctx.access_token, payload.rsvp)
                .await
                .map_err(AppError::write)?;
            info!("Updated RSVP to {} for {}", payload.rsvp, ctx.invitee_id);
            "Successfully submitted!"
        }
    };

    let mut recorded_guests = RecordState::Absent;
    if let Some(guests) = &payload.guests {
        let current_guests = state
            .directory
            .get_guests(&ctx.access_token)
            .await
            .map_err(AppError::read)?;
        match plan_guests_write(&current_guests) {
            WriteKind::Create => state
                .directory
                .create_guests(&ctx.access_token, guests)
                .await
                .map_err(AppError::write)?,
            WriteKind::Update => state
                .directory
                .update_guests(&ctx.access_token, guests)
                .await
                .map_err(AppError::write)?,
        }
        info!("Recorded guests for {}", ctx.invitee_id);
        recorded_guests = RecordState::Present(guests.clone());
    }

    // The stored RSVP now matches the submission on every non-error path,
    // including the suppressed no-op.
    Ok(Json(SubmitResponse {
        message: message.to_string(),
        state: page_state_with_fallback(
            &state,
            &ctx,
            RecordState::Present(payload.rsvp),
            recorded_guests,
        )
        .await,
    }))
}
