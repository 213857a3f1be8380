//! Wire DTOs for the gateway's public API. Field names follow the
//! camelCase contract the backing services and gateway expose.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{OperationType, PrivilegeStatus, TicketStatus};

/// Flight as returned by the flights catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightResponse {
    pub flight_number: String,
    pub from_airport: String,
    pub to_airport: String,
    pub date: DateTime<Utc>,
    pub price: i32,
}

/// Paginated listing wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub page: i32,
    pub page_size: i32,
    pub total_elements: i64,
    pub items: Vec<T>,
}

/// Ticket enriched with its flight's route and date
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponse {
    pub ticket_uid: Uuid,
    pub flight_number: String,
    pub from_airport: String,
    pub to_airport: String,
    pub date: DateTime<Utc>,
    pub price: i32,
    pub status: TicketStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivilegeShortInfo {
    pub balance: i32,
    pub status: PrivilegeStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceHistory {
    pub date: DateTime<Utc>,
    pub ticket_uid: Uuid,
    pub balance_diff: i32,
    pub operation_type: OperationType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivilegeInfoResponse {
    pub balance: i32,
    pub status: PrivilegeStatus,
    pub history: Vec<BalanceHistory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfoResponse {
    pub tickets: Vec<TicketResponse>,
    pub privilege: PrivilegeShortInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketPurchaseRequest {
    pub flight_number: String,
    /// Client-supplied price; the catalog price is authoritative
    pub price: i32,
    pub paid_from_balance: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketPurchaseResponse {
    pub ticket_uid: Uuid,
    pub flight_number: String,
    pub from_airport: String,
    pub to_airport: String,
    pub date: DateTime<Utc>,
    pub price: i32,
    pub paid_by_money: i32,
    pub paid_by_bonuses: i32,
    pub status: TicketStatus,
    pub privilege: PrivilegeShortInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDescription {
    pub field: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    pub message: String,
    pub errors: Vec<ErrorDescription>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purchase_request_uses_camel_case() {
        let req: TicketPurchaseRequest = serde_json::from_str(
            r#"{"flightNumber":"AFL031","price":1500,"paidFromBalance":true}"#,
        )
        .unwrap();
        assert_eq!(req.flight_number, "AFL031");
        assert!(req.paid_from_balance);
    }

    #[test]
    fn page_serializes_camel_case() {
        let page = Page::<FlightResponse> {
            page: 1,
            page_size: 10,
            total_elements: 0,
            items: vec![],
        };
        let json = serde_json::to_value(&page).unwrap();
        assert!(json.get("pageSize").is_some());
        assert!(json.get("totalElements").is_some());
    }
}
