use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::directory::{
    DirectoryClient, DirectoryError, DirectoryLoginResponse, LoginCredentials,
};
use crate::models::{DashboardRow, RecordState, RsvpChoice};

/// Per-operation call counts, for asserting the exactly-one-create /
/// exactly-one-update properties of the state machine.
#[derive(Debug, Default, Clone)]
pub struct CallCounts {
    pub login: usize,
    pub get_rsvp: usize,
    pub create_rsvp: usize,
    pub update_rsvp: usize,
    pub get_guests: usize,
    pub create_guests: usize,
    pub update_guests: usize,
    pub create_new_guests: usize,
    pub list_dashboard: usize,
}

#[derive(Debug, Clone)]
struct MockInvitee {
    id: String,
    password: String,
}

#[derive(Debug, Default)]
struct Inner {
    /// Invitee accounts, keyed by display name.
    invitees: HashMap<String, MockInvitee>,
    /// Issued access tokens, mapped back to invitee ids.
    tokens: HashMap<String, String>,
    /// Stored RSVP values, keyed by invitee id. Kept as raw strings so
    /// unrecognized values can be seeded.
    rsvps: HashMap<String, String>,
    /// Stored guest lists, keyed by invitee id.
    guests: HashMap<String, String>,
    dashboard: Vec<DashboardRow>,
    last_login: Option<LoginCredentials>,
    last_new_guests: Option<Value>,
    fail_logins: bool,
    fail_reads: bool,
    /// Remaining record reads to allow before every further read fails.
    fail_reads_after: Option<usize>,
    fail_writes: bool,
    fail_dashboard: bool,
    counts: CallCounts,
}

/// In-memory stand-in for the Directory Service. Mirrors its contract:
/// access tokens scope every call to one invitee, and create/update both
/// resolve to a plain upsert of the keyed record (last write wins).
#[derive(Debug, Default)]
pub struct MockDirectoryClient {
    inner: Mutex<Inner>,
}

impl MockDirectoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an invitee and returns its id.
    pub fn add_invitee(&self, name: &str, password: &str) -> String {
        let id = Uuid::new_v4().to_string();
        self.lock().invitees.insert(
            name.to_string(),
            MockInvitee {
                id: id.clone(),
                password: password.to_string(),
            },
        );
        id
    }

    pub fn set_rsvp(&self, invitee_id: &str, rsvp: &str) {
        self.lock()
            .rsvps
            .insert(invitee_id.to_string(), rsvp.to_string());
    }

    pub fn set_guests(&self, invitee_id: &str, guests: &str) {
        self.lock()
            .guests
            .insert(invitee_id.to_string(), guests.to_string());
    }

    pub fn set_dashboard(&self, rows: Vec<DashboardRow>) {
        self.lock().dashboard = rows;
    }

    pub fn fail_logins(&self, fail: bool) {
        self.lock().fail_logins = fail;
    }

    pub fn fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    /// Lets the next `count` record reads succeed and fails every read
    /// after that. Exercises refresh paths that run after a write.
    pub fn fail_reads_after(&self, count: usize) {
        self.lock().fail_reads_after = Some(count);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    pub fn fail_dashboard(&self, fail: bool) {
        self.lock().fail_dashboard = fail;
    }

    pub fn counts(&self) -> CallCounts {
        self.lock().counts.clone()
    }

    /// Credentials the Directory actually received on the last login call.
    pub fn last_login(&self) -> Option<LoginCredentials> {
        self.lock().last_login.clone()
    }

    pub fn last_new_guests(&self) -> Option<Value> {
        self.lock().last_new_guests.clone()
    }

    pub fn stored_rsvp(&self, invitee_id: &str) -> Option<String> {
        self.lock().rsvps.get(invitee_id).cloned()
    }

    pub fn stored_guests(&self, invitee_id: &str) -> Option<String> {
        self.lock().guests.get(invitee_id).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("mock directory mutex poisoned")
    }

    fn resolve(inner: &Inner, token: &str) -> Result<String, DirectoryError> {
        inner
            .tokens
            .get(token)
            .cloned()
            .ok_or(DirectoryError::Status(401))
    }

    fn check_read(inner: &mut Inner) -> Result<(), DirectoryError> {
        if inner.fail_reads {
            return Err(DirectoryError::Status(500));
        }
        if let Some(remaining) = inner.fail_reads_after.as_mut() {
            if *remaining == 0 {
                return Err(DirectoryError::Status(500));
            }
            *remaining -= 1;
        }
        Ok(())
    }
}

#[async_trait]
impl DirectoryClient for MockDirectoryClient {
    async fn login_user(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<DirectoryLoginResponse, DirectoryError> {
        let mut inner = self.lock();
        inner.counts.login += 1;
        inner.last_login = Some(credentials.clone());
        if inner.fail_logins {
            return Err(DirectoryError::Status(500));
        }
        let invitee = inner
            .invitees
            .get(&credentials.name)
            .cloned()
            .ok_or(DirectoryError::Status(404))?;
        if invitee.password != credentials.password {
            return Err(DirectoryError::Status(401));
        }
        let token = format!("token-{}", invitee.id);
        inner.tokens.insert(token.clone(), invitee.id.clone());
        let rsvp = inner.rsvps.get(&invitee.id).cloned();
        Ok(DirectoryLoginResponse {
            invitee_id: invitee.id,
            name: credentials.name.clone(),
            token,
            rsvp,
        })
    }

    async fn get_rsvp(&self, token: &str) -> Result<RecordState<RsvpChoice>, DirectoryError> {
        let mut inner = self.lock();
        inner.counts.get_rsvp += 1;
        Self::check_read(&mut inner)?;
        let id = Self::resolve(&inner, token)?;
        Ok(inner
            .rsvps
            .get(&id)
            .and_then(|value| RsvpChoice::parse(value))
            .into())
    }

    async fn create_rsvp(&self, token: &str, rsvp: RsvpChoice) -> Result<(), DirectoryError> {
        let mut inner = self.lock();
        inner.counts.create_rsvp += 1;
        if inner.fail_writes {
            return Err(DirectoryError::Status(500));
        }
        let id = Self::resolve(&inner, token)?;
        inner.rsvps.insert(id, rsvp.as_str().to_string());
        Ok(())
    }

    async fn update_rsvp(&self, token: &str, rsvp: RsvpChoice) -> Result<(), DirectoryError> {
        let mut inner = self.lock();
        inner.counts.update_rsvp += 1;
        if inner.fail_writes {
            return Err(DirectoryError::Status(500));
        }
        let id = Self::resolve(&inner, token)?;
        inner.rsvps.insert(id, rsvp.as_str().to_string());
        Ok(())
    }

    async fn get_guests(&self, token: &str) -> Result<RecordState<String>, DirectoryError> {
        let mut inner = self.lock();
        inner.counts.get_guests += 1;
        Self::check_read(&mut inner)?;
        let id = Self::resolve(&inner, token)?;
        Ok(inner.guests.get(&id).cloned().into())
    }

    async fn create_guests(&self, token: &str, guests: &str) -> Result<(), DirectoryError> {
        let mut inner = self.lock();
        inner.counts.create_guests += 1;
        if inner.fail_writes {
            return Err(DirectoryError::Status(500));
        }
        let id = Self::resolve(&inner, token)?;
        inner.guests.insert(id, guests.to_string());
        Ok(())
    }

    async fn update_guests(&self, token: &str, guests: &str) -> Result<(), DirectoryError> {
        let mut inner = self.lock();
        inner.counts.update_guests += 1;
        if inner.fail_writes {
            return Err(DirectoryError::Status(500));
        }
        let id = Self::resolve(&inner, token)?;
        inner.guests.insert(id, guests.to_string());
        Ok(())
    }

    async fn create_new_guests(
        &self,
        token: &str,
        payload: &Value,
    ) -> Result<(), DirectoryError> {
        let mut inner = self.lock();
        inner.counts.create_new_guests += 1;
        inner.last_new_guests = Some(payload.clone());
        if inner.fail_writes {
            return Err(DirectoryError::Status(500));
        }
        Self::resolve(&inner, token)?;
        Ok(())
    }

    async fn list_dashboard(&self, token: &str) -> Result<Vec<DashboardRow>, DirectoryError> {
        let mut inner = self.lock();
        inner.counts.list_dashboard += 1;
        if inner.fail_dashboard {
            return Err(DirectoryError::Status(500));
        }
        Self::resolve(&inner, token)?;
        Ok(inner.dashboard.clone())
    }
}
