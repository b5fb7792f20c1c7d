//! DTOs module - Data Transfer Objects
//!
//! Questo modulo contiene i DTOs del confine esterno: il payload webhook
//! di Telegram in ingresso e le statistiche derivate che i servizi
//! costruiscono per i pannelli utente/admin.

pub mod stats;
pub mod update;

// Re-exports per facilitare l'import
pub use stats::{AdminOverview, DailyCount, DownloadReport, HourCount, KindCount, UserStats};
pub use update::{ChatRefDTO, MessageDTO, SenderDTO, UpdateDTO};
