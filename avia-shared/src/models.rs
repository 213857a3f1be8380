use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a ticket
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Paid,
    Canceled,
}

/// Loyalty tier of a privilege account
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrivilegeStatus {
    Bronze,
    Silver,
    Gold,
}

/// Direction of a balance-affecting transaction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationType {
    FillInBalance,
    DebitTheAccount,
}

/// Ticket record as stored by the tickets service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i32,
    pub ticket_uid: Uuid,
    pub username: String,
    pub flight_number: String,
    pub price: i32,
    pub status: TicketStatus,
}

/// Loyalty account as stored by the privilege service.
/// Balance is never negative; the service rejects over-debits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Privilege {
    pub id: i32,
    pub username: String,
    pub status: PrivilegeStatus,
    pub balance: i32,
}

/// One balance-affecting event, keyed by (privilege_id, ticket_uid)
/// so a purchase can be reversed on cancellation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivilegeHistory {
    pub id: i32,
    pub privilege_id: i32,
    pub ticket_uid: Uuid,
    pub datetime: DateTime<Utc>,
    pub balance_diff: i32,
    pub operation_type: OperationType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_enums_use_wire_names() {
        assert_eq!(serde_json::to_string(&TicketStatus::Paid).unwrap(), "\"PAID\"");
        assert_eq!(
            serde_json::to_string(&OperationType::FillInBalance).unwrap(),
            "\"FILL_IN_BALANCE\""
        );
        assert_eq!(
            serde_json::to_string(&PrivilegeStatus::Gold).unwrap(),
            "\"GOLD\""
        );
    }

    #[test]
    fn ticket_round_trips_snake_case() {
        let json = r#"{
            "id": 7,
            "ticket_uid": "5bb4ae02-9a08-4b50-8f97-1f3b67e6b849",
            "username": "alice",
            "flight_number": "AFL031",
            "price": 1500,
            "status": "PAID"
        }"#;
        let ticket: Ticket = serde_json::from_str(json).unwrap();
        assert_eq!(ticket.flight_number, "AFL031");
        assert_eq!(ticket.status, TicketStatus::Paid);
    }
}
