use reqwest::StatusCode;

/// Errors surfaced by the backing-service clients.
///
/// A 404 from a backing service is not an error: the clients map it to
/// `Ok(None)` / `Ok(false)` result values. Everything here aborts the
/// encompassing workflow.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The service was unreachable or the call timed out.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service rejected the request as conflicting
    /// (e.g. insufficient balance on a debit).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The service answered with a status the contract does not allow.
    #[error("unexpected status {0} from backing service")]
    UnexpectedStatus(StatusCode),
}

/// Maps any non-2xx status to `UnexpectedStatus`, passing 2xx through.
pub(crate) fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ClientError::UnexpectedStatus(status))
    }
}
