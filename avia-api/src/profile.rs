use axum::{extract::State, routing::get, Extension, Json, Router};

use avia_auth::VerifiedIdentity;
use avia_shared::{BalanceHistory, PrivilegeInfoResponse, PrivilegeShortInfo, UserInfoResponse};

use crate::{error::AppError, state::AppState, tickets::user_tickets};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/privilege", get(privilege))
}

async fn me(
    State(state): State<AppState>,
    Extension(identity): Extension<VerifiedIdentity>,
) -> Result<Json<UserInfoResponse>, AppError> {
    let username = identity.username();
    let account = state
        .privilege
        .get_account(username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {} does not exist", username)))?;

    let tickets = user_tickets(&state, username).await?;

    Ok(Json(UserInfoResponse {
        tickets,
        privilege: PrivilegeShortInfo {
            balance: account.balance,
            status: account.status,
        },
    }))
}

async fn privilege(
    State(state): State<AppState>,
    Extension(identity): Extension<VerifiedIdentity>,
) -> Result<Json<PrivilegeInfoResponse>, AppError> {
    let username = identity.username();
    let account = state
        .privilege
        .get_account(username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {} does not exist", username)))?;

    let history = state
        .privilege
        .get_history(username)
        .await?
        .into_iter()
        .map(|entry| BalanceHistory {
            date: entry.datetime,
            ticket_uid: entry.ticket_uid,
            balance_diff: entry.balance_diff,
            operation_type: entry.operation_type,
        })
        .collect();

    Ok(Json(PrivilegeInfoResponse {
        balance: account.balance,
        status: account.status,
        history,
    }))
}
