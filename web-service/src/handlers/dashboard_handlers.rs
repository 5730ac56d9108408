use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use log::warn;
use rsvp_shared::auth::SessionContext;
use rsvp_shared::directory::DirectoryClient;

use crate::error::{AppError, Result};
use crate::models::DashboardResponse;
use crate::routes::AppState;

/// GET /dashboard
///
/// Admin-only read projection of the invitee x RSVP x guests join. A failed
/// fetch degrades to an empty list; the view never blocks on the Directory.
pub async fn get_dashboard<D>(
    State(state): State<Arc<AppState<D>>>,
    Extension(ctx): Extension<SessionContext>,
) -> Result<Json<DashboardResponse>>
where
    D: DirectoryClient,
{
    if !ctx.is_admin() {
        return Err(AppError::forbidden(
            "The dashboard is restricted to organizers.".to_string(),
        ));
    }

    let dashboard = match state.directory.list_dashboard(&ctx.access_token).await {
        Ok(rows) => rows,
        Err(err) => {
            warn!("Dashboard fetch failed, rendering empty: {err}");
            Vec::new()
        }
    };

    Ok(Json(DashboardResponse { dashboard }))
}
