use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use avia_shared::Ticket;

use crate::error::{check_status, ClientError};

/// Creation payload for the tickets service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketCreateRequest {
    pub ticket_uid: Uuid,
    pub username: String,
    pub flight_number: String,
    pub price: i32,
}

/// Access to the tickets service.
#[async_trait]
pub trait TicketsApi: Send + Sync {
    async fn healthcheck(&self) -> Result<(), ClientError>;

    async fn tickets_for_user(&self, username: &str) -> Result<Vec<Ticket>, ClientError>;

    /// Returns `Ok(None)` when no ticket has this uid.
    async fn get_ticket(&self, ticket_uid: Uuid) -> Result<Option<Ticket>, ClientError>;

    async fn create_ticket(&self, request: &TicketCreateRequest) -> Result<(), ClientError>;

    /// Returns `Ok(false)` when the ticket was already gone.
    async fn delete_ticket(&self, ticket_uid: Uuid) -> Result<bool, ClientError>;
}

pub struct TicketsClient {
    base_url: String,
    http: reqwest::Client,
}

impl TicketsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, crate::DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: std::time::Duration) -> Self {
        Self {
            base_url: base_url.into(),
            http: crate::http_client(timeout),
        }
    }
}

#[async_trait]
impl TicketsApi for TicketsClient {
    async fn healthcheck(&self) -> Result<(), ClientError> {
        let response = self
            .http
            .get(format!("{}/manage/health", self.base_url))
            .send()
            .await?;
        check_status(response)?;
        Ok(())
    }

    async fn tickets_for_user(&self, username: &str) -> Result<Vec<Ticket>, ClientError> {
        let response = self
            .http
            .get(format!("{}/tickets/user/{}", self.base_url, username))
            .send()
            .await?;
        let response = check_status(response)?;
        Ok(response.json().await?)
    }

    async fn get_ticket(&self, ticket_uid: Uuid) -> Result<Option<Ticket>, ClientError> {
        let response = self
            .http
            .get(format!("{}/tickets/{}", self.base_url, ticket_uid))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(response)?;
        Ok(Some(response.json().await?))
    }

    async fn create_ticket(&self, request: &TicketCreateRequest) -> Result<(), ClientError> {
        let response = self
            .http
            .post(format!("{}/tickets", self.base_url))
            .json(request)
            .send()
            .await?;
        check_status(response)?;
        Ok(())
    }

    async fn delete_ticket(&self, ticket_uid: Uuid) -> Result<bool, ClientError> {
        let response = self
            .http
            .delete(format!("{}/tickets/{}", self.base_url, ticket_uid))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            tracing::warn!("delete of ticket {} found nothing to remove", ticket_uid);
            return Ok(false);
        }
        check_status(response)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn create_ticket_posts_camel_case_body() {
        let server = MockServer::start().await;
        let uid = Uuid::new_v4();
        Mock::given(method("POST"))
            .and(path("/tickets"))
            .and(body_partial_json(serde_json::json!({
                "ticketUid": uid,
                "username": "alice",
                "flightNumber": "AFL031",
                "price": 1500
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let client = TicketsClient::new(server.uri());
        client
            .create_ticket(&TicketCreateRequest {
                ticket_uid: uid,
                username: "alice".into(),
                flight_number: "AFL031".into(),
                price: 1500,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn delete_of_missing_ticket_reports_false() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = TicketsClient::new(server.uri());
        assert!(!client.delete_ticket(Uuid::new_v4()).await.unwrap());
    }
}
