//! Purchase and cancellation workflows across the tickets and privilege
//! services.
//!
//! There is no shared transaction between the two services, so both
//! workflows apply a fixed ordering that fails toward financial safety:
//! the balance-affecting call always runs before the ticket call. A
//! purchase that dies between the two leaves an orphaned balance
//! transaction (recoverable by reconciliation), never a paid ticket
//! nobody paid for; a cancellation that dies between the two leaves the
//! balance already corrected.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use avia_clients::{
    AddTransaction, ClientError, FlightsApi, PrivilegeApi, TicketCreateRequest, TicketsApi,
};
use avia_shared::{OperationType, TicketStatus};

use crate::models::PurchaseOutcome;

/// Share of a cash purchase credited back to the loyalty balance.
const CASHBACK_DIVISOR: i32 = 10;

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("flight {0} is not in the catalog")]
    UnknownFlight(String),

    #[error("no privilege account for user {0}")]
    UnknownUser(String),

    #[error("ticket {0} does not exist")]
    TicketNotFound(Uuid),

    #[error("ticket {0} belongs to another user")]
    NotOwner(Uuid),

    #[error("ticket {0} is not in a cancelable state")]
    NotCancelable(Uuid),

    #[error("privilege balance is insufficient")]
    InsufficientBalance,

    #[error("backing service call failed: {0}")]
    Upstream(#[from] ClientError),
}

/// Coordinates one purchase or cancellation as a strictly sequential
/// chain of remote calls. One instance lives for the gateway process;
/// the clients are injected singletons.
pub struct PurchaseOrchestrator {
    flights: Arc<dyn FlightsApi>,
    tickets: Arc<dyn TicketsApi>,
    privilege: Arc<dyn PrivilegeApi>,
}

impl PurchaseOrchestrator {
    pub fn new(
        flights: Arc<dyn FlightsApi>,
        tickets: Arc<dyn TicketsApi>,
        privilege: Arc<dyn PrivilegeApi>,
    ) -> Self {
        Self {
            flights,
            tickets,
            privilege,
        }
    }

    /// Buys a ticket for `username` on `flight_number`.
    ///
    /// The catalog price is authoritative. With `paid_from_balance` the
    /// loyalty balance covers as much of it as it can and the remainder
    /// is paid in cash; otherwise the whole price is cash and a tenth of
    /// it is credited back to the balance.
    pub async fn purchase(
        &self,
        username: &str,
        flight_number: &str,
        paid_from_balance: bool,
    ) -> Result<PurchaseOutcome, OrderError> {
        let flight = self
            .flights
            .get_flight(flight_number)
            .await?
            .ok_or_else(|| OrderError::UnknownFlight(flight_number.to_string()))?;

        let account = self
            .privilege
            .get_account(username)
            .await?
            .ok_or_else(|| OrderError::UnknownUser(username.to_string()))?;

        let ticket_uid = Uuid::new_v4();
        let now = Utc::now();
        let price = flight.price;

        let (paid_by_money, paid_by_bonuses) = if paid_from_balance {
            let bonuses = account.balance.min(price);
            (price - bonuses, bonuses)
        } else {
            (price, 0)
        };

        // Balance first, ticket second.
        if paid_from_balance {
            if paid_by_bonuses > 0 {
                self.apply_transaction(
                    username,
                    &AddTransaction {
                        privilege_id: account.id,
                        ticket_uid,
                        datetime: now,
                        balance_diff: paid_by_bonuses,
                        operation_type: OperationType::DebitTheAccount,
                    },
                )
                .await?;
            }
        } else {
            // Every cash purchase earns cashback, even when it rounds to 0.
            self.apply_transaction(
                username,
                &AddTransaction {
                    privilege_id: account.id,
                    ticket_uid,
                    datetime: now,
                    balance_diff: paid_by_money / CASHBACK_DIVISOR,
                    operation_type: OperationType::FillInBalance,
                },
            )
            .await?;
        }

        // The balance changed above; hand the caller a current snapshot.
        let account = self
            .privilege
            .get_account(username)
            .await?
            .ok_or_else(|| OrderError::UnknownUser(username.to_string()))?;

        self.tickets
            .create_ticket(&TicketCreateRequest {
                ticket_uid,
                username: username.to_string(),
                flight_number: flight.flight_number.clone(),
                price: paid_by_money,
            })
            .await?;

        tracing::info!(
            "user {} bought ticket {} for flight {} ({} cash / {} bonuses)",
            username,
            ticket_uid,
            flight.flight_number,
            paid_by_money,
            paid_by_bonuses
        );

        Ok(PurchaseOutcome {
            ticket_uid,
            flight,
            price,
            paid_by_money,
            paid_by_bonuses,
            status: TicketStatus::Paid,
            privilege: account,
            purchased_at: now,
        })
    }

    /// Cancels a paid ticket owned by `username`, reversing its balance
    /// effect (if any) before deleting the ticket record.
    pub async fn cancel(&self, username: &str, ticket_uid: Uuid) -> Result<(), OrderError> {
        let ticket = self
            .tickets
            .get_ticket(ticket_uid)
            .await?
            .ok_or(OrderError::TicketNotFound(ticket_uid))?;

        if ticket.username != username {
            return Err(OrderError::NotOwner(ticket_uid));
        }
        if ticket.status != TicketStatus::Paid {
            return Err(OrderError::NotCancelable(ticket_uid));
        }

        if self
            .privilege
            .get_history_entry(username, ticket_uid)
            .await?
            .is_some()
        {
            // A concurrent cancel may have reversed it already; the
            // privilege service's delete is the arbiter.
            self.privilege
                .rollback_transaction(username, ticket_uid)
                .await?;
        }

        if !self.tickets.delete_ticket(ticket_uid).await? {
            // Lost a double-cancel race after the ownership check; the
            // ticket is gone either way.
            tracing::warn!("ticket {} vanished before deletion", ticket_uid);
        }

        tracing::info!("user {} canceled ticket {}", username, ticket_uid);
        Ok(())
    }

    async fn apply_transaction(
        &self,
        username: &str,
        transaction: &AddTransaction,
    ) -> Result<(), OrderError> {
        match self.privilege.add_transaction(username, transaction).await {
            Ok(()) => Ok(()),
            Err(ClientError::Conflict(_)) => Err(OrderError::InsufficientBalance),
            Err(e) => Err(OrderError::Upstream(e)),
        }
    }
}
