use std::fmt;

use serde::{Deserialize, Serialize};

/// Role carried on an authenticated identity, resolved once at login by
/// matching the display name against the configured administrator list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Invitee,
    Admin,
}

/// An invitee's attendance decision. `Virtual` can only appear on records
/// an organizer edited out-of-band; the forms never offer it.
///
/// There is no `Unset` variant on purpose: the pre-creation state is the
/// absence of a record, not a stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RsvpChoice {
    Yes,
    No,
    Virtual,
}

impl RsvpChoice {
    /// Parses the Directory's stored value. Anything other than the three
    /// recognized strings is treated as if no record existed.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Yes" => Some(RsvpChoice::Yes),
            "No" => Some(RsvpChoice::No),
            "Virtual" => Some(RsvpChoice::Virtual),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RsvpChoice::Yes => "Yes",
            RsvpChoice::No => "No",
            RsvpChoice::Virtual => "Virtual",
        }
    }

    /// Whether an invitee can pick this value themselves.
    pub fn selectable(&self) -> bool {
        !matches!(self, RsvpChoice::Virtual)
    }
}

impl fmt::Display for RsvpChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presence of a remote record, established by a fresh Directory fetch and
/// threaded through the state machine. Every create-vs-update decision is
/// driven by this and nothing else; an empty value is still `Present`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordState<T> {
    Absent,
    Present(T),
}

impl<T> RecordState<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, RecordState::Present(_))
    }

    pub fn as_present(&self) -> Option<&T> {
        match self {
            RecordState::Absent => None,
            RecordState::Present(value) => Some(value),
        }
    }
}

impl<T> From<Option<T>> for RecordState<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            None => RecordState::Absent,
            Some(value) => RecordState::Present(value),
        }
    }
}

/// Authenticated invitee identity. `invitee_id` is the stable foreign key
/// for the RSVP and guest records and is never mutated by a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub invitee_id: String,
    pub name: String,
    pub role: Role,
    pub access_token: String,
}

/// One row of the admin dashboard: the invitee x RSVP x guests join as the
/// Directory returns it. Read-only, never written back. The `rsvp` column
/// stays a plain string so unrecognized stored values still render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardRow {
    pub id: String,
    pub name: String,
    pub rsvp: String,
    pub guests: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
