use std::env;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
}

/// One entry on the administrator allow-list. A missing override password
/// means the admin authenticates with the public placeholder like everyone
/// else, but still gets the admin role.
#[derive(Debug, Clone)]
pub struct AdminAccount {
    pub name: String,
    pub password: Option<String>,
}

/// Service configuration, loaded once at startup and injected through router
/// state. The session max-age is a fixed 24 hours and deliberately not
/// configurable.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the Directory Service, e.g. `https://directory.example.com`.
    pub directory_api_url: String,
    /// Shared secret for signing session tokens.
    pub session_secret: String,
    /// Placeholder password submitted for every non-admin invitee.
    pub public_rsvp_password: String,
    /// Public asset URL for the invitation image.
    pub invitation_image_url: String,
    pub bind_addr: String,
    pub admins: Vec<AdminAccount>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(AppConfig {
            directory_api_url: require("DIRECTORY_API_URL")?,
            session_secret: require("SESSION_SECRET")?,
            public_rsvp_password: env::var("PUBLIC_RSVP_PASSWORD")
                .map_err(|_| ConfigError::MissingVar("PUBLIC_RSVP_PASSWORD"))?,
            invitation_image_url: env::var("INVITATION_IMAGE_URL").unwrap_or_default(),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            admins: read_admins(),
        })
    }

    pub fn is_admin(&self, name: &str) -> bool {
        self.admins.iter().any(|admin| admin.name == name)
    }

    /// Per-admin override secret. When this returns `Some`, client-supplied
    /// credentials are never used for that name.
    pub fn admin_password(&self, name: &str) -> Option<&str> {
        self.admins
            .iter()
            .find(|admin| admin.name == name)
            .and_then(|admin| admin.password.as_deref())
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

/// Reads `ADMIN1`, `ADMIN2`, ... until the first gap, with an optional
/// `ADMIN{n}_PASSWORD` override per entry.
fn read_admins() -> Vec<AdminAccount> {
    (1..)
        .map_while(|n| {
            env::var(format!("ADMIN{n}")).ok().map(|name| AdminAccount {
                name,
                password: env::var(format!("ADMIN{n}_PASSWORD")).ok(),
            })
        })
        .collect()
}
