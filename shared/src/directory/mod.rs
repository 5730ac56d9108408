//! Client contract for the Directory Service, the external system of record
//! for invitees, RSVPs and guest lists. This crate never stores any of those
//! records itself; it only calls the Directory and interprets its responses.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{DashboardRow, RecordState, RsvpChoice};

pub mod http;

pub use http::HttpDirectoryClient;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("directory request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("directory returned status {0}")]
    Status(u16),
    #[error("failed to decode directory response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginCredentials {
    pub name: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryLoginResponse {
    pub invitee_id: String,
    pub name: String,
    /// Opaque access token scoping every subsequent call to this invitee.
    pub token: String,
    /// Stored RSVP value, if the invitee already answered. Left as a raw
    /// string; only recognized values count as an existing record.
    #[serde(default)]
    pub rsvp: Option<String>,
}

/// Operations the front end consumes. Success is any status below 300;
/// create/update calls are single attempts with no retry. Cross-session
/// consistency is the Directory's job (last-write-wins per invitee id).
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    async fn login_user(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<DirectoryLoginResponse, DirectoryError>;

    /// Fetches the RSVP record for the invitee the token is scoped to.
    /// A missing record or an unrecognized stored value is `Absent`.
    async fn get_rsvp(&self, token: &str) -> Result<RecordState<RsvpChoice>, DirectoryError>;

    async fn create_rsvp(&self, token: &str, rsvp: RsvpChoice) -> Result<(), DirectoryError>;

    async fn update_rsvp(&self, token: &str, rsvp: RsvpChoice) -> Result<(), DirectoryError>;

    /// Fetches the guest record. An empty string is a present record, not
    /// an absent one.
    async fn get_guests(&self, token: &str) -> Result<RecordState<String>, DirectoryError>;

    async fn create_guests(&self, token: &str, guests: &str) -> Result<(), DirectoryError>;

    async fn update_guests(&self, token: &str, guests: &str) -> Result<(), DirectoryError>;

    /// Invitee-provided guest creation for the first-time login flow. The
    /// payload is forwarded verbatim; validation is the Directory's job.
    async fn create_new_guests(
        &self,
        token: &str,
        payload: &serde_json::Value,
    ) -> Result<(), DirectoryError>;

    /// Full invitee x RSVP x guests join for the admin dashboard. Ordering
    /// is whatever the Directory returns.
    async fn list_dashboard(&self, token: &str) -> Result<Vec<DashboardRow>, DirectoryError>;
}
