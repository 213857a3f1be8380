use std::sync::Arc;

use avia_auth::{IdentityProviderClient, TokenVerifier};
use avia_clients::{FlightsApi, PrivilegeApi, TicketsApi};
use avia_order::PurchaseOrchestrator;

/// Shared handles for every request. All members are process-wide
/// singletons behind `Arc`, so cloning the state is cheap.
#[derive(Clone)]
pub struct AppState {
    pub flights: Arc<dyn FlightsApi>,
    pub tickets: Arc<dyn TicketsApi>,
    pub privilege: Arc<dyn PrivilegeApi>,
    pub orchestrator: Arc<PurchaseOrchestrator>,
    pub verifier: Arc<TokenVerifier>,
    pub idp: Arc<IdentityProviderClient>,
}

impl AppState {
    pub fn new(
        flights: Arc<dyn FlightsApi>,
        tickets: Arc<dyn TicketsApi>,
        privilege: Arc<dyn PrivilegeApi>,
        verifier: Arc<TokenVerifier>,
        idp: Arc<IdentityProviderClient>,
    ) -> Self {
        let orchestrator = Arc::new(PurchaseOrchestrator::new(
            flights.clone(),
            tickets.clone(),
            privilege.clone(),
        ));
        Self {
            flights,
            tickets,
            privilege,
            orchestrator,
            verifier,
            idp,
        }
    }
}
