//! Telegram module - Trasporto verso la Bot API
//!
//! Quattro operazioni in uscita (testo, video, foto, documento), ognuna
//! una singola chiamata HTTP con timeout. L'esito distingue il rifiuto
//! esplicito della piattaforma dal trasporto fallito: il motore di
//! consegna decide il fallback solo sul primo.

use async_trait::async_trait;

// Dichiarazione dei sotto-moduli
pub mod api;
pub mod keyboard;

// Re-esportazione per facilitare l'import
pub use api::TelegramApi;
pub use keyboard::{admin_keyboard, main_keyboard, KeyboardButton, ReplyKeyboard};

/// Esito di una singola chiamata alla Bot API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// La piattaforma ha accettato la richiesta (`ok: true`)
    Accepted,
    /// La piattaforma ha risposto `ok: false`, es. file troppo grande
    /// o formato non supportato; porta la descrizione dell'errore
    Rejected(String),
    /// La piattaforma non ha risposto: timeout, connessione rifiutata,
    /// corpo illeggibile
    Unreachable(String),
}

impl SendOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SendOutcome::Accepted)
    }
}

/// Le quattro operazioni della Bot API usate dal bot.
///
/// I servizi ricevono un trait object così i test possono sostituire il
/// trasporto reale con uno programmabile.
#[async_trait]
pub trait BotApi: Send + Sync {
    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&ReplyKeyboard>,
    ) -> SendOutcome;

    async fn send_video(&self, chat_id: i64, video_url: &str, caption: &str) -> SendOutcome;

    async fn send_photo(&self, chat_id: i64, photo_url: &str, caption: &str) -> SendOutcome;

    async fn send_document(&self, chat_id: i64, document_url: &str, caption: &str) -> SendOutcome;
}
