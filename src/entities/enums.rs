//! Enumerazioni - Tipi enumerati utilizzati nelle entità

use serde::{Deserialize, Serialize};
use std::fmt;

// ********************* ENUMERAZIONI UTILI **********************//

/// Tipo di media consegnato all'utente. Il resolver produce solo
/// `Video` o `Photo`; `Document` compare quando la consegna ripiega
/// sul canale documento generico.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "file_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Photo,
    Document,
}

impl MediaKind {
    /// Forma stringa usata nella colonna `file_type` e nei testi utente
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Photo => "photo",
            MediaKind::Document => "document",
        }
    }

    /// Emoji associata al tipo, per i messaggi della chat
    pub fn emoji(&self) -> &'static str {
        match self {
            MediaKind::Video => "🎬",
            MediaKind::Photo => "📷",
            MediaKind::Document => "📄",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
