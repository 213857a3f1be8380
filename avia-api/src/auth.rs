use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use avia_auth::TokenResponse;

use crate::{error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/authorize", post(authorize))
        .route("/callback", get(callback))
}

#[derive(Debug, Deserialize)]
struct AuthorizeRequest {
    username: String,
    password: String,
}

async fn authorize(
    State(state): State<AppState>,
    Json(request): Json<AuthorizeRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let tokens = state
        .idp
        .authenticate(&request.username, &request.password)
        .await?;
    tracing::info!("issued tokens for user {}", request.username);
    Ok(Json(tokens))
}

#[derive(Debug, Deserialize)]
struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// OAuth redirect landing. The gateway does not drive the
/// authorization-code flow itself; this endpoint only echoes what the
/// provider sent so interactive clients can complete the exchange.
async fn callback(Query(query): Query<CallbackQuery>) -> Result<Json<Value>, AppError> {
    if let Some(error) = query.error {
        return Err(AppError::Validation {
            message: format!("authorization failed: {}", error),
            errors: vec![],
        });
    }
    Ok(Json(json!({
        "message": "authorization callback received",
        "code": query.code,
        "state": query.state,
    })))
}
