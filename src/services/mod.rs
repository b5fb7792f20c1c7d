//! Services module - Coordinatore per i servizi del bot
//!
//! Questo modulo organizza i servizi in sotto-moduli separati: la
//! pipeline di download (quota, consegna, registro), i testi dei
//! messaggi e l'handler HTTP del webhook.

pub mod delivery;
pub mod ledger;
pub mod quota;
pub mod texts;
pub mod webhook;

// Re-exports per facilitare l'import
pub use delivery::{deliver, DeliveryOutcome};
pub use quota::QuotaDecision;
pub use webhook::receive_update;

use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

/// Root endpoint - health check
pub async fn root(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, "Bot server is running!")
}
