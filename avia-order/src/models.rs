use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use avia_shared::{FlightResponse, Privilege, TicketStatus};

/// Everything a completed purchase produced: the new ticket's identity,
/// the flight it is for, how the price was split between cash and
/// loyalty balance, and the account snapshot after the split applied.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseOutcome {
    pub ticket_uid: Uuid,
    pub flight: FlightResponse,
    pub price: i32,
    pub paid_by_money: i32,
    pub paid_by_bonuses: i32,
    pub status: TicketStatus,
    pub privilege: Privilege,
    pub purchased_at: DateTime<Utc>,
}
