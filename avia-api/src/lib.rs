use axum::{http::Method, http::StatusCode, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod config;
pub mod error;
pub mod flights;
pub mod middleware;
pub mod profile;
pub mod state;
pub mod tickets;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    // CORS Middleware
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    // Everything behind the bearer gate; token issuance and the OAuth
    // callback stay open.
    let api = Router::new()
        .merge(flights::routes())
        .merge(tickets::routes())
        .merge(profile::routes())
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_bearer,
        ))
        .merge(auth::routes());

    Router::new()
        .nest("/api/v1", api)
        .route("/manage/health", get(health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}
