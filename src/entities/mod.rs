//! Entities module - Entità del dominio applicativo
//!
//! Questo modulo contiene tutte le entità (models) che rappresentano i dati persistiti nel database.
//! Ogni entity corrisponde a una tabella nel database.

pub mod download;
pub mod enums;
pub mod user;

// Re-exports per facilitare l'import
pub use download::{Download, NewDownload};
pub use enums::MediaKind;
pub use user::{User, UserProfile};
