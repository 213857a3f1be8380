use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;

use avia_auth::VerifiedIdentity;
use avia_shared::{FlightResponse, Page};

use crate::{error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/flights", get(list_flights))
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    page: Option<i32>,
    size: Option<i32>,
}

async fn list_flights(
    State(state): State<AppState>,
    Extension(identity): Extension<VerifiedIdentity>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<FlightResponse>>, AppError> {
    tracing::debug!("user {} requested the flight list", identity.username());
    let page = state.flights.list_flights(query.page, query.size).await?;
    Ok(Json(page))
}
