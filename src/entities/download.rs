//! Download entity - Fatto immutabile di una consegna completata

use super::enums::MediaKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Riga della tabella `downloads`. Scritta una sola volta dal ledger
/// dopo una consegna confermata, mai aggiornata né cancellata.
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Download {
    pub id: i64,
    pub user_id: i64,
    pub url: String,
    pub file_type: MediaKind,
    // best-effort: la consegna avviene per URL, quindi la dimensione
    // reale non viene mai osservata e resta 0
    pub file_size: i64,
    pub download_date: DateTime<Utc>,
}

/// Dati per l'inserimento di un nuovo record (id e timestamp assegnati dallo store)
#[derive(Debug, Clone)]
pub struct NewDownload {
    pub user_id: i64,
    pub url: String,
    pub file_type: MediaKind,
    pub file_size: i64,
}
