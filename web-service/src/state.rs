//! The RSVP state machine. Pure functions over fetched record state: the
//! handlers fetch, these decide, the Directory client executes.

use rsvp_shared::models::{RecordState, RsvpChoice};
use serde::Serialize;
use thiserror::Error;

/// Where the invitee sits in the flow, derived from fetched record state on
/// every page load and never cached across requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum PageState {
    Unauthenticated,
    AwaitingRsvp,
    #[serde(rename_all = "camelCase")]
    Answered {
        rsvp: RsvpChoice,
        /// Guest sub-state; only carried while the answer is Yes.
        #[serde(skip_serializing_if = "Option::is_none")]
        guests: Option<GuestPhase>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GuestPhase {
    AwaitingGuests,
    GuestsRecorded,
}

/// Which Directory operation a submission maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    Create,
    Update,
}

/// Outcome of planning an RSVP submission. `Skip` means the submitted value
/// matches the stored one and no Directory call is made at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePlan {
    Skip,
    Write(WriteKind),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PlanError {
    #[error("Virtual attendance can only be set by an organizer.")]
    VirtualNotSelectable,
}

pub fn derive_page_state(
    rsvp: &RecordState<RsvpChoice>,
    guests: &RecordState<String>,
) -> PageState {
    match rsvp {
        RecordState::Absent => PageState::AwaitingRsvp,
        RecordState::Present(choice) => PageState::Answered {
            rsvp: *choice,
            guests: match choice {
                RsvpChoice::Yes => Some(match guests {
                    RecordState::Absent => GuestPhase::AwaitingGuests,
                    RecordState::Present(_) => GuestPhase::GuestsRecorded,
                }),
                RsvpChoice::No | RsvpChoice::Virtual => None,
            },
        },
    }
}

/// Decides create vs. update for an RSVP submission. The fetched record
/// state is the only input: a fresh login for a returning invitee must
/// still update, never re-create.
pub fn plan_rsvp_write(
    current: &RecordState<RsvpChoice>,
    requested: RsvpChoice,
) -> Result<WritePlan, PlanError> {
    if !requested.selectable() {
        return Err(PlanError::VirtualNotSelectable);
    }
    Ok(match current {
        RecordState::Absent => WritePlan::Write(WriteKind::Create),
        RecordState::Present(existing) if *existing == requested => WritePlan::Skip,
        RecordState::Present(_) => WritePlan::Write(WriteKind::Update),
    })
}

/// Guest writes never skip: recording an empty list is itself meaningful
/// for the counts, and an existing record holding an empty string updates
/// rather than creates.
pub fn plan_guests_write(current: &RecordState<String>) -> WriteKind {
    match current {
        RecordState::Absent => WriteKind::Create,
        RecordState::Present(_) => WriteKind::Update,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_record_awaits_rsvp() {
        assert_eq!(
            derive_page_state(&RecordState::Absent, &RecordState::Absent),
            PageState::AwaitingRsvp
        );
    }

    #[test]
    fn guest_phase_only_carried_for_yes() {
        for choice in [RsvpChoice::No, RsvpChoice::Virtual] {
            assert_eq!(
                derive_page_state(&RecordState::Present(choice), &RecordState::Absent),
                PageState::Answered {
                    rsvp: choice,
                    guests: None
                }
            );
        }
    }

    #[test]
    fn yes_without_guest_record_awaits_guests() {
        assert_eq!(
            derive_page_state(
                &RecordState::Present(RsvpChoice::Yes),
                &RecordState::Absent
            ),
            PageState::Answered {
                rsvp: RsvpChoice::Yes,
                guests: Some(GuestPhase::AwaitingGuests)
            }
        );
    }

    #[test]
    fn empty_guest_record_counts_as_recorded() {
        assert_eq!(
            derive_page_state(
                &RecordState::Present(RsvpChoice::Yes),
                &RecordState::Present(String::new())
            ),
            PageState::Answered {
                rsvp: RsvpChoice::Yes,
                guests: Some(GuestPhase::GuestsRecorded)
            }
        );
    }

    #[test]
    fn first_submission_is_create() {
        for requested in [RsvpChoice::Yes, RsvpChoice::No] {
            assert_eq!(
                plan_rsvp_write(&RecordState::Absent, requested),
                Ok(WritePlan::Write(WriteKind::Create))
            );
        }
    }

    #[test]
    fn existing_record_changes_are_updates() {
        assert_eq!(
            plan_rsvp_write(&RecordState::Present(RsvpChoice::No), RsvpChoice::Yes),
            Ok(WritePlan::Write(WriteKind::Update))
        );
        // Moving off an admin-set Virtual is still just an update.
        assert_eq!(
            plan_rsvp_write(&RecordState::Present(RsvpChoice::Virtual), RsvpChoice::No),
            Ok(WritePlan::Write(WriteKind::Update))
        );
    }

    #[test]
    fn identical_value_is_suppressed() {
        for choice in [RsvpChoice::Yes, RsvpChoice::No] {
            assert_eq!(
                plan_rsvp_write(&RecordState::Present(choice), choice),
                Ok(WritePlan::Skip)
            );
        }
    }

    #[test]
    fn virtual_is_never_selectable() {
        assert_eq!(
            plan_rsvp_write(&RecordState::Absent, RsvpChoice::Virtual),
            Err(PlanError::VirtualNotSelectable)
        );
        assert_eq!(
            plan_rsvp_write(&RecordState::Present(RsvpChoice::Yes), RsvpChoice::Virtual),
            Err(PlanError::VirtualNotSelectable)
        );
    }

    #[test]
    fn guests_create_only_when_record_absent() {
        assert_eq!(plan_guests_write(&RecordState::Absent), WriteKind::Create);
        assert_eq!(
            plan_guests_write(&RecordState::Present(String::new())),
            WriteKind::Update
        );
        assert_eq!(
            plan_guests_write(&RecordState::Present("John Doe".to_string())),
            WriteKind::Update
        );
    }

    #[test]
    fn page_state_serializes_with_phase_tag() {
        let state = PageState::Answered {
            rsvp: RsvpChoice::Yes,
            guests: Some(GuestPhase::AwaitingGuests),
        };
        let json = serde_json::to_value(state).unwrap();
        assert_eq!(json["phase"], "answered");
        assert_eq!(json["rsvp"], "Yes");
        assert_eq!(json["guests"], "awaitingGuests");

        let json = serde_json::to_value(PageState::AwaitingRsvp).unwrap();
        assert_eq!(json["phase"], "awaitingRsvp");
    }
}
