use rsvp_shared::models::{DashboardRow, Role, RsvpChoice};
use serde::{Deserialize, Serialize};

use crate::state::PageState;

// Request DTOs

#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    pub name: String,
    /// Ignored for names on the admin allow-list; defaulted to the public
    /// placeholder when empty or missing.
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct RsvpSubmitRequest {
    pub rsvp: RsvpChoice,
    /// Guests riding along in the first-time flow. The RSVP write completes
    /// before these are touched.
    #[serde(default)]
    pub guests: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct GuestsSubmitRequest {
    pub guests: String,
}

// Response DTOs

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub invitee_id: String,
    pub name: String,
    pub role: Role,
    pub state: PageState,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct InvitationView {
    pub state: PageState,
    pub image_url: String,
    pub dashboard_visible: bool,
}

#[derive(Serialize, Debug)]
pub struct SubmitResponse {
    pub message: String,
    pub state: PageState,
}

#[derive(Serialize, Debug)]
pub struct DashboardResponse {
    pub dashboard: Vec<DashboardRow>,
}
