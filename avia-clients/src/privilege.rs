use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use avia_shared::{OperationType, Privilege, PrivilegeHistory};

use crate::error::{check_status, ClientError};

/// Balance-affecting transaction appended to an account's history.
/// The privilege service applies the diff (rejecting over-debits)
/// and records the row in one step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTransaction {
    pub privilege_id: i32,
    pub ticket_uid: Uuid,
    pub datetime: DateTime<Utc>,
    pub balance_diff: i32,
    pub operation_type: OperationType,
}

/// Access to the privilege (loyalty balance) service.
#[async_trait]
pub trait PrivilegeApi: Send + Sync {
    async fn healthcheck(&self) -> Result<(), ClientError>;

    /// Returns `Ok(None)` when the user has no privilege account.
    async fn get_account(&self, username: &str) -> Result<Option<Privilege>, ClientError>;

    /// History ordered by datetime descending, per the service contract.
    async fn get_history(&self, username: &str) -> Result<Vec<PrivilegeHistory>, ClientError>;

    async fn get_history_entry(
        &self,
        username: &str,
        ticket_uid: Uuid,
    ) -> Result<Option<PrivilegeHistory>, ClientError>;

    /// Applies the balance change and appends the history row.
    /// Insufficient balance on a debit surfaces as [`ClientError::Conflict`].
    async fn add_transaction(
        &self,
        username: &str,
        transaction: &AddTransaction,
    ) -> Result<(), ClientError>;

    /// Reverses the balance effect of the entry keyed by `ticket_uid`
    /// (clamped at zero) and deletes the row. `Ok(false)` when no such
    /// entry exists.
    async fn rollback_transaction(
        &self,
        username: &str,
        ticket_uid: Uuid,
    ) -> Result<bool, ClientError>;
}

pub struct PrivilegeClient {
    base_url: String,
    http: reqwest::Client,
}

impl PrivilegeClient {
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
impl PrivilegeApi for PrivilegeClient {
    async fn healthcheck(&self) -> Result<(), ClientError> {
        let response = self
            .http
            .get(format!("{}/manage/health", self.base_url))
            .send()
            .await?;
        check_status(response)?;
        Ok(())
    }

    async fn get_account(&self, username: &str) -> Result<Option<Privilege>, ClientError> {
        let response = self
            .http
            .get(format!("{}/privilege/{}", self.base_url, username))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(response)?;
        Ok(Some(response.json().await?))
    }

    async fn get_history(&self, username: &str) -> Result<Vec<PrivilegeHistory>, ClientError> {
        let response = self
            .http
            .get(format!("{}/privilege/{}/history", self.base_url, username))
            .send()
            .await?;
        let response = check_status(response)?;
        Ok(response.json().await?)
    }

    async fn get_history_entry(
        &self,
        username: &str,
        ticket_uid: Uuid,
    ) -> Result<Option<PrivilegeHistory>, ClientError> {
        let response = self
            .http
            .get(format!(
                "{}/privilege/{}/history/{}",
                self.base_url, username, ticket_uid
            ))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(response)?;
        Ok(Some(response.json().await?))
    }

    async fn add_transaction(
        &self,
        username: &str,
        transaction: &AddTransaction,
    ) -> Result<(), ClientError> {
        let response = self
            .http
            .post(format!("{}/privilege/{}/history", self.base_url, username))
            .json(transaction)
            .send()
            .await?;
        if response.status() == StatusCode::CONFLICT {
            tracing::warn!("privilege service rejected transaction for {}", username);
            return Err(ClientError::Conflict(format!(
                "insufficient balance for {}",
                username
            )));
        }
        check_status(response)?;
        Ok(())
    }

    async fn rollback_transaction(
        &self,
        username: &str,
        ticket_uid: Uuid,
    ) -> Result<bool, ClientError> {
        let response = self
            .http
            .delete(format!(
                "{}/privilege/{}/history/{}",
                self.base_url, username, ticket_uid
            ))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            tracing::warn!(
                "no history entry for ticket {} to roll back for {}",
                ticket_uid,
                username
            );
            return Ok(false);
        }
        check_status(response)?;
        Ok(true)
    }
}
