pub mod error;
pub mod flights;
pub mod privilege;
pub mod tickets;

pub use error::ClientError;
pub use flights::{FlightsApi, FlightsClient};
pub use privilege::{AddTransaction, PrivilegeApi, PrivilegeClient};
pub use tickets::{TicketCreateRequest, TicketsApi, TicketsClient};

/// Default timeout applied to every backing-service call.
pub const DEFAULT_REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// Builds the reqwest client shared by the service façades.
pub(crate) fn http_client(timeout: std::time::Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("reqwest client with static configuration")
}
