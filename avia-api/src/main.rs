use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use avia_api::{app, AppState};
use avia_auth::{
    IdentityProviderClient, JwksCache, TokenVerifier, VerifierConfig,
};
use avia_clients::{FlightsApi, FlightsClient, PrivilegeApi, PrivilegeClient, TicketsApi, TicketsClient};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "avia_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = avia_api::config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Avia gateway on port {}", config.server.port);

    let request_timeout = Duration::from_secs(config.services.request_timeout_seconds);
    let flights: Arc<dyn FlightsApi> = Arc::new(FlightsClient::with_timeout(
        config.services.flights_url.clone(),
        request_timeout,
    ));
    let tickets: Arc<dyn TicketsApi> = Arc::new(TicketsClient::with_timeout(
        config.services.tickets_url.clone(),
        request_timeout,
    ));
    let privilege: Arc<dyn PrivilegeApi> = Arc::new(PrivilegeClient::with_timeout(
        config.services.privilege_url.clone(),
        request_timeout,
    ));

    let jwks_uri = Url::parse(&config.auth.jwks_endpoint)
        .expect("auth.jwks_endpoint must be a valid URL");
    let jwks = Arc::new(JwksCache::new(
        jwks_uri,
        Duration::from_secs(config.auth.jwks_ttl_seconds),
    ));
    // Prime the key cache so the first authenticated request does not
    // pay for the fetch. A failure here is not fatal: the cache retries
    // lazily on demand.
    if let Err(e) = jwks.warm().await {
        tracing::warn!("JWKS warm-up failed, keys will be fetched lazily: {}", e);
    }

    let verifier = Arc::new(TokenVerifier::new(
        jwks,
        VerifierConfig {
            validate_audience: config.auth.validate_audience,
            audience: config.auth.audience.clone(),
            validate_issuer: config.auth.validate_issuer,
            issuer: config.auth.issuer.clone(),
        },
    ));

    let idp = Arc::new(IdentityProviderClient::new(
        config.auth.token_endpoint.clone(),
        config.auth.client_id.clone(),
        config.auth.client_secret.clone(),
    ));

    let state = AppState::new(flights, tickets, privilege, verifier, idp);
    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind server address");
    axum::serve(listener, app).await.expect("Server error");
}
