pub mod models;
pub mod orchestrator;

pub use models::PurchaseOutcome;
pub use orchestrator::{OrderError, PurchaseOrchestrator};
