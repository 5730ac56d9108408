use log::warn;
use rsvp_shared::auth::SessionContext;
use rsvp_shared::directory::DirectoryClient;
use rsvp_shared::models::{RecordState, RsvpChoice};

use crate::routes::AppState;
use crate::state::{derive_page_state, PageState};

pub mod auth_handlers;
pub mod dashboard_handlers;
pub mod guest_handlers;
pub mod rsvp_handlers;

/// Rebuilds the page state from a fresh Directory read. Used on render
/// paths, so the answered state always comes from the record. Read
/// failures degrade to absent instead of blocking the page.
pub(crate) async fn refreshed_page_state<D>(state: &AppState<D>, ctx: &SessionContext) -> PageState
where
    D: DirectoryClient,
{
    page_state_with_fallback(state, ctx, RecordState::Absent, RecordState::Absent).await
}

/// Rebuilds the page state from fresh Directory reads, substituting the
/// caller's last-known record state for any read that fails. Post-write
/// paths pass the records they just made durable, so a failed refresh
/// never renders a response that contradicts a write that succeeded.
pub(crate) async fn page_state_with_fallback<D>(
    state: &AppState<D>,
    ctx: &SessionContext,
    fallback_rsvp: RecordState<RsvpChoice>,
    fallback_guests: RecordState<String>,
) -> PageState
where
    D: DirectoryClient,
{
    let rsvp = state
        .directory
        .get_rsvp(&ctx.access_token)
        .await
        .unwrap_or_else(|err| {
            warn!("RSVP fetch failed for {}: {err}", ctx.invitee_id);
            fallback_rsvp
        });
    let guests = state
        .directory
        .get_guests(&ctx.access_token)
        .await
        .unwrap_or_else(|err| {
            warn!("Guest fetch failed for {}: {err}", ctx.invitee_id);
            fallback_guests
        });
    derive_page_state(&rsvp, &guests)
}
