//! Normalizzazione dei link ai post Instagram
//!
//! Estrae lo shortcode dal testo del messaggio; nessun accesso di rete.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref POST_PATTERN: Regex =
        Regex::new(r"instagram\.com/(?:p|reel|tv)/([A-Za-z0-9_-]+)").unwrap();
}

/// Link a un post, validato e pronto per la cascata di risoluzione.
///
/// `url` è il testo originale ripulito dagli spazi (finisce nel registro
/// dei download così com'è stato ricevuto), `shortcode` il token che
/// identifica il post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostLink {
    pub url: String,
    pub shortcode: String,
}

/// Riconosce un link a un post (`/p/`, `/reel/`, `/tv/`) dentro il testo.
///
/// Ritorna `None` per qualsiasi testo senza un link valido: il chiamante
/// decide se trattarlo come comando o come input non riconosciuto.
pub fn parse_post_link(text: &str) -> Option<PostLink> {
    let trimmed = text.trim();
    let captures = POST_PATTERN.captures(trimmed)?;
    Some(PostLink {
        url: trimmed.to_string(),
        shortcode: captures[1].to_string(),
    })
}
