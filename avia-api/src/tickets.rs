use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;

use avia_auth::VerifiedIdentity;
use avia_shared::{
    PrivilegeShortInfo, Ticket, TicketPurchaseRequest, TicketPurchaseResponse, TicketResponse,
};

use crate::{error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tickets", get(list_tickets).post(buy_ticket))
        .route("/tickets/{ticket_uid}", get(get_ticket).delete(cancel_ticket))
}

/// Joins a stored ticket with its flight's route and date. Returns
/// `None` when the catalog no longer knows the flight, which is a data
/// inconsistency between the backing services, not a user error.
async fn enrich_ticket(
    state: &AppState,
    ticket: &Ticket,
) -> Result<Option<TicketResponse>, AppError> {
    let Some(flight) = state.flights.get_flight(&ticket.flight_number).await? else {
        tracing::warn!(
            "ticket {} references flight {} which is missing from the catalog",
            ticket.ticket_uid,
            ticket.flight_number
        );
        return Ok(None);
    };
    Ok(Some(TicketResponse {
        ticket_uid: ticket.ticket_uid,
        flight_number: ticket.flight_number.clone(),
        from_airport: flight.from_airport,
        to_airport: flight.to_airport,
        date: flight.date,
        price: ticket.price,
        status: ticket.status,
    }))
}

/// All of a user's tickets, enriched. Shared with the `/me` handler.
pub(crate) async fn user_tickets(
    state: &AppState,
    username: &str,
) -> Result<Vec<TicketResponse>, AppError> {
    let tickets = state.tickets.tickets_for_user(username).await?;
    let mut responses = Vec::with_capacity(tickets.len());
    for ticket in &tickets {
        if let Some(response) = enrich_ticket(state, ticket).await? {
            responses.push(response);
        }
    }
    Ok(responses)
}

async fn list_tickets(
    State(state): State<AppState>,
    Extension(identity): Extension<VerifiedIdentity>,
) -> Result<Json<Vec<TicketResponse>>, AppError> {
    let username = identity.username();
    if state.privilege.get_account(username).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "user {} does not exist",
            username
        )));
    }
    let tickets = user_tickets(&state, username).await?;
    Ok(Json(tickets))
}

async fn get_ticket(
    State(state): State<AppState>,
    Extension(identity): Extension<VerifiedIdentity>,
    Path(ticket_uid): Path<Uuid>,
) -> Result<Json<TicketResponse>, AppError> {
    let ticket = state
        .tickets
        .get_ticket(ticket_uid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("ticket {} not found", ticket_uid)))?;

    if ticket.username != identity.username() {
        return Err(AppError::Forbidden(format!(
            "ticket {} belongs to another user",
            ticket_uid
        )));
    }

    let response = enrich_ticket(&state, &ticket).await?.ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!(
            "flight {} referenced by ticket {} is missing from the catalog",
            ticket.flight_number,
            ticket.ticket_uid
        ))
    })?;
    Ok(Json(response))
}

async fn buy_ticket(
    State(state): State<AppState>,
    Extension(identity): Extension<VerifiedIdentity>,
    Json(request): Json<TicketPurchaseRequest>,
) -> Result<Json<TicketPurchaseResponse>, AppError> {
    let outcome = state
        .orchestrator
        .purchase(
            identity.username(),
            &request.flight_number,
            request.paid_from_balance,
        )
        .await?;

    Ok(Json(TicketPurchaseResponse {
        ticket_uid: outcome.ticket_uid,
        flight_number: outcome.flight.flight_number,
        from_airport: outcome.flight.from_airport,
        to_airport: outcome.flight.to_airport,
        date: outcome.purchased_at,
        price: outcome.price,
        paid_by_money: outcome.paid_by_money,
        paid_by_bonuses: outcome.paid_by_bonuses,
        status: outcome.status,
        privilege: PrivilegeShortInfo {
            balance: outcome.privilege.balance,
            status: outcome.privilege.status,
        },
    }))
}

async fn cancel_ticket(
    State(state): State<AppState>,
    Extension(identity): Extension<VerifiedIdentity>,
    Path(ticket_uid): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .orchestrator
        .cancel(identity.username(), ticket_uid)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
