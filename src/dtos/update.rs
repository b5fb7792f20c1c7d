//! Update DTOs - Payload webhook in arrivo da Telegram
//!
//! Il core legge solo sender id, testo e nome visualizzato: tutti i campi
//! sono opzionali perché Telegram invia update di molti tipi (edit, join,
//! callback...) e quelli senza messaggio/testo vanno semplicemente ignorati
//! rispondendo 200.

use crate::entities::UserProfile;
use serde::{Deserialize, Serialize};

/// Update Telegram così come arriva sul webhook
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UpdateDTO {
    #[serde(default)]
    pub update_id: Option<i64>,
    #[serde(default)]
    pub message: Option<MessageDTO>,
}

/// Messaggio contenuto in un update
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MessageDTO {
    #[serde(default)]
    pub message_id: Option<i64>,
    #[serde(default)]
    pub from: Option<SenderDTO>,
    #[serde(default)]
    pub chat: Option<ChatRefDTO>,
    #[serde(default)]
    pub text: Option<String>,
}

/// Mittente del messaggio
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SenderDTO {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Riferimento alla chat di destinazione delle risposte
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChatRefDTO {
    pub id: i64,
}

impl From<&SenderDTO> for UserProfile {
    fn from(sender: &SenderDTO) -> Self {
        // Telegram manda stringhe vuote al posto di campi assenti in
        // alcune librerie client; normalizziamo a None
        let clean = |value: &Option<String>| {
            value
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            id: sender.id,
            username: clean(&sender.username),
            first_name: clean(&sender.first_name),
            last_name: clean(&sender.last_name),
        }
    }
}
