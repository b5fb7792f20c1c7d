//! User entity - Entità utente del bot con contatori di quota

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Utente Telegram registrato alla prima interazione con il bot.
///
/// `id` è il sender id Telegram (chiave primaria, non autoincrementale).
/// I contatori `downloads_today`/`total_downloads` sono gestiti dal ledger
/// tramite claim condizionale; `downloads_today` ha senso solo relativo
/// alla data di `last_activity` (vedi `is_stale`).
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub downloads_today: i32,
    pub total_downloads: i64,
    pub is_banned: bool,
    pub join_date: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl User {
    /// True se il contatore giornaliero appartiene a un giorno precedente
    /// a `today` e va quindi azzerato prima di valutare la quota.
    pub fn is_stale(&self, today: NaiveDate) -> bool {
        self.last_activity.date_naive() < today
    }

    /// Nome mostrato nei messaggi: first name, altrimenti username, altrimenti id
    pub fn display_name(&self) -> String {
        if let Some(first) = self.first_name.as_deref().filter(|s| !s.is_empty()) {
            first.to_string()
        } else if let Some(username) = self.username.as_deref().filter(|s| !s.is_empty()) {
            format!("@{}", username)
        } else {
            self.id.to_string()
        }
    }
}

/// Dati anagrafici estratti dal messaggio in arrivo, usati per l'upsert.
/// Non contiene contatori: quelli li tocca solo il ledger.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}
