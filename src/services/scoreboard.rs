//! CTFd scoreboard client.
//!
//! Every CTFd response is wrapped as `{ success, data }`; a non-2xx status
//! or `success: false` surfaces as `AppError::Remote`. No retries happen
//! at this layer, callers decide what a failure means.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::config::CtfdConfig;
use crate::error::{AppError, Result};
use crate::models::{Submission, Team, User};

/// Read access to the remote scoreboard.
#[async_trait]
pub trait Scoreboard: Send + Sync {
    /// All correct submissions, in arrival order.
    async fn correct_submissions(&self) -> Result<Vec<Submission>>;

    /// Fetch a user by id.
    async fn user(&self, id: u64) -> Result<User>;

    /// Fetch a team by id.
    async fn team(&self, id: u64) -> Result<Team>;
}

/// CTFd API response envelope.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    #[serde(default)]
    success: bool,
    data: Option<T>,
}

/// HTTP client for a CTFd instance.
pub struct CtfdClient {
    client: Client,
    base_url: Url,
    token: String,
}

impl CtfdClient {
    /// Create a client for the configured CTFd instance.
    pub fn new(config: &CtfdConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: Url::parse(&config.base_url)?,
            token: config.token.clone(),
        })
    }

    /// Perform an authorized GET and unwrap the `{ success, data }` envelope.
    async fn get_data<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = self.base_url.join(path)?;
        let response = self
            .client
            .get(url.clone())
            .header("Authorization", format!("Token {}", self.token))
            .header("Content-Type", "application/json")
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        log::debug!("CTFd: GET {} -> {}", url, status);

        unwrap_envelope(status, &body)
    }
}

/// Check the HTTP status and unwrap the `{ success, data }` envelope.
///
/// Non-2xx, `success: false`, and missing `data` all surface as
/// `AppError::Remote` carrying the status the response came with.
fn unwrap_envelope<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T> {
    if !status.is_success() {
        return Err(AppError::remote(status.as_u16(), body));
    }

    let envelope: ApiEnvelope<T> = serde_json::from_str(body)?;
    if !envelope.success {
        return Err(AppError::remote(
            status.as_u16(),
            format!("scoreboard reported success=false: {}", body),
        ));
    }

    envelope
        .data
        .ok_or_else(|| AppError::remote(status.as_u16(), "scoreboard response carried no data"))
}

#[async_trait]
impl Scoreboard for CtfdClient {
    async fn correct_submissions(&self) -> Result<Vec<Submission>> {
        self.get_data("submissions", &[("type", "correct")]).await
    }

    async fn user(&self, id: u64) -> Result<User> {
        self.get_data(&format!("users/{}", id), &[]).await
    }

    async fn team(&self, id: u64) -> Result<Team> {
        self.get_data(&format!("teams/{}", id), &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_decodes_submission_list() {
        let body = r#"{
            "success": true,
            "data": [
                {
                    "id": 12,
                    "challenge_id": 3,
                    "challenge": { "name": "warmup", "value": 50 },
                    "user_id": 7,
                    "team_id": 2
                }
            ]
        }"#;
        let envelope: ApiEnvelope<Vec<Submission>> = serde_json::from_str(body).unwrap();
        assert!(envelope.success);
        let data = envelope.data.unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].challenge.name, "warmup");
        assert_eq!(data[0].challenge.value, 50);
    }

    #[test]
    fn envelope_decodes_unranked_team() {
        let body = r#"{
            "success": true,
            "data": { "id": 2, "name": "hexors", "place": null, "score": 0 }
        }"#;
        let envelope: ApiEnvelope<Team> = serde_json::from_str(body).unwrap();
        let team = envelope.data.unwrap();
        assert!(team.place.is_none());
    }

    #[test]
    fn success_false_is_rejected() {
        let body = r#"{ "success": false, "data": null }"#;
        let result: Result<Team> = unwrap_envelope(StatusCode::OK, body);
        match result {
            Err(AppError::Remote { status, message }) => {
                assert_eq!(status, 200);
                assert!(message.contains("success=false"));
            }
            other => panic!("expected Remote error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn missing_data_is_rejected() {
        let body = r#"{ "success": true }"#;
        let result: Result<Team> = unwrap_envelope(StatusCode::OK, body);
        assert!(matches!(
            result,
            Err(AppError::Remote { status: 200, .. })
        ));
    }

    #[test]
    fn non_2xx_status_is_rejected_with_its_status() {
        let body = "gateway timeout";
        let result: Result<Team> = unwrap_envelope(StatusCode::GATEWAY_TIMEOUT, body);
        match result {
            Err(AppError::Remote { status, message }) => {
                assert_eq!(status, 504);
                assert_eq!(message, "gateway timeout");
            }
            other => panic!("expected Remote error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn successful_envelope_unwraps_data() {
        let body = r#"{ "success": true, "data": { "id": 2, "name": "hexors", "place": "9th", "score": 800 } }"#;
        let team: Team = unwrap_envelope(StatusCode::OK, body).unwrap();
        assert_eq!(team.place.as_deref(), Some("9th"));
    }
}
