//! Server library - espone i moduli principali per i test

pub mod core;
pub mod dtos;
pub mod entities;
pub mod monitoring;
pub mod repositories;
pub mod resolver;
pub mod services;
pub mod telegram;

// Re-export dei tipi principali per facilitare l'import
pub use crate::core::{AppError, AppState, Config};
pub use crate::services::root;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Crea il router principale dell'applicazione
pub fn create_router(state: Arc<AppState>) -> Router {
    use crate::services::receive_update;

    Router::new()
        .route("/", get(root))
        .route("/webhook", post(receive_update))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
