//! Stats DTOs - Statistiche derivate per i pannelli utente e admin

use crate::entities::MediaKind;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Statistiche personali mostrate da "📊 My stats".
///
/// I due conteggi vengono dalla tabella downloads, non dai contatori
/// dell'utente: il contatore serve al gate di quota, la tabella è la
/// fonte accurata per i numeri mostrati.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserStats {
    pub total_downloads: i64,
    pub downloads_today: i64,
    pub remaining_today: i64,
    pub join_date: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub is_banned: bool,
}

/// Quadro generale mostrato da /panel
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AdminOverview {
    pub total_users: i64,
    pub active_today: i64,
    pub active_week: i64,
    pub new_users_today: i64,
    pub total_downloads: i64,
    pub downloads_today: i64,
    pub downloads_week: i64,
    pub memory_mb: f64,
    pub server_time: DateTime<Utc>,
}

/// Report dettagliato dei download ("📈 Download report")
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DownloadReport {
    /// Conteggi per giorno degli ultimi 7 giorni, dal più recente
    pub daily: Vec<DailyCount>,
    /// Distribuzione per tipo di file su tutto lo storico
    pub by_kind: Vec<KindCount>,
    /// Ore di punta degli ultimi 7 giorni (max 5, per conteggio decrescente)
    pub peak_hours: Vec<HourCount>,
}

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct DailyCount {
    pub day: NaiveDate,
    pub count: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct KindCount {
    pub file_type: MediaKind,
    pub count: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct HourCount {
    // HOUR() arriva come BIGINT dal protocollo binario MySQL
    pub hour: i64,
    pub count: i64,
}
