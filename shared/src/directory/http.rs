use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;

use super::{DirectoryClient, DirectoryError, DirectoryLoginResponse, LoginCredentials};
use crate::models::{DashboardRow, RecordState, RsvpChoice};

/// The Directory configures no timeout of its own, so a hang on its side
/// must be mapped into the generic failure path here.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct RsvpBody {
    rsvp: String,
}

#[derive(Debug, Deserialize)]
struct GuestsBody {
    guests: String,
}

/// reqwest-backed [`DirectoryClient`].
pub struct HttpDirectoryClient {
    base_url: String,
    client: Client,
}

impl HttpDirectoryClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, DirectoryError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(HttpDirectoryClient { base_url, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Standard range semantics: anything below 300 is success.
    fn check(response: Response) -> Result<Response, DirectoryError> {
        let status = response.status().as_u16();
        if status < 300 {
            Ok(response)
        } else {
            Err(DirectoryError::Status(status))
        }
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: Response,
    ) -> Result<T, DirectoryError> {
        response
            .json()
            .await
            .map_err(|err| DirectoryError::Decode(err.to_string()))
    }
}

#[async_trait]
impl DirectoryClient for HttpDirectoryClient {
    async fn login_user(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<DirectoryLoginResponse, DirectoryError> {
        debug!("Directory login for {:?}", credentials.name);
        let response = self
            .client
            .post(self.url("/auth/invitees/login"))
            .json(credentials)
            .send()
            .await?;
        Self::decode(Self::check(response)?).await
    }

    async fn get_rsvp(&self, token: &str) -> Result<RecordState<RsvpChoice>, DirectoryError> {
        let response = self
            .client
            .get(self.url("/rsvps"))
            .bearer_auth(token)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(RecordState::Absent);
        }
        let body: RsvpBody = Self::decode(Self::check(response)?).await?;
        Ok(RsvpChoice::parse(&body.rsvp).into())
    }

    async fn create_rsvp(&self, token: &str, rsvp: RsvpChoice) -> Result<(), DirectoryError> {
        let response = self
            .client
            .post(self.url("/rsvps"))
            .bearer_auth(token)
            .json(&serde_json::json!({ "rsvp": rsvp }))
            .send()
            .await?;
        Self::check(response)?;
        Ok(())
    }

    async fn update_rsvp(&self, token: &str, rsvp: RsvpChoice) -> Result<(), DirectoryError> {
        let response = self
            .client
            .put(self.url("/rsvps"))
            .bearer_auth(token)
            .json(&serde_json::json!({ "rsvp": rsvp }))
            .send()
            .await?;
        Self::check(response)?;
        Ok(())
    }

    async fn get_guests(&self, token: &str) -> Result<RecordState<String>, DirectoryError> {
        let response = self
            .client
            .get(self.url("/guests"))
            .bearer_auth(token)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(RecordState::Absent);
        }
        let body: GuestsBody = Self::decode(Self::check(response)?).await?;
        Ok(RecordState::Present(body.guests))
    }

    async fn create_guests(&self, token: &str, guests: &str) -> Result<(), DirectoryError> {
        let response = self
            .client
            .post(self.url("/guests"))
            .bearer_auth(token)
            .json(&serde_json::json!({ "guests": guests }))
            .send()
            .await?;
        Self::check(response)?;
        Ok(())
    }

    async fn update_guests(&self, token: &str, guests: &str) -> Result<(), DirectoryError> {
        let response = self
            .client
            .put(self.url("/guests"))
            .bearer_auth(token)
            .json(&serde_json::json!({ "guests": guests }))
            .send()
            .await?;
        Self::check(response)?;
        Ok(())
    }

    async fn create_new_guests(
        &self,
        token: &str,
        payload: &serde_json::Value,
    ) -> Result<(), DirectoryError> {
        let response = self
            .client
            .post(self.url("/newguests"))
            .bearer_auth(token)
            .json(payload)
            .send()
            .await?;
        Self::check(response)?;
        Ok(())
    }

    async fn list_dashboard(&self, token: &str) -> Result<Vec<DashboardRow>, DirectoryError> {
        let response = self
            .client
            .get(self.url("/dashboard"))
            .bearer_auth(token)
            .send()
            .await?;
        Self::decode(Self::check(response)?).await
    }
}
