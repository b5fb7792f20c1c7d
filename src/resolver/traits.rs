//! Interfacce della cascata di risoluzione

use std::fmt;

use async_trait::async_trait;

use super::shortcode::PostLink;
use crate::entities::MediaKind;

/// Asset risolto e pronto per la consegna.
///
/// Prodotto da una strategia, consumato subito dal motore di consegna;
/// non viene mai persistito. `source` identifica la strategia che lo ha
/// prodotto, solo a fini diagnostici.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaDescriptor {
    pub kind: MediaKind,
    pub url: String,
    pub thumbnail: Option<String>,
    pub source: &'static str,
}

/// Esito negativo di una singola strategia.
///
/// Per l'orchestratore ogni variante vale come "tentativo fallito" e fa
/// passare alla strategia successiva; la distinzione serve solo ai log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// L'upstream ha risposto ma non c'è nessun media riconoscibile
    NotFound,
    /// Timeout, connessione rifiutata o status non 2xx
    Network(String),
    /// Il corpo della risposta non corrisponde a nessuna forma nota
    Parse(&'static str),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::NotFound => write!(f, "no media found"),
            ResolveError::Network(details) => write!(f, "network error: {details}"),
            ResolveError::Parse(details) => write!(f, "unrecognized payload: {details}"),
        }
    }
}

impl From<reqwest::Error> for ResolveError {
    fn from(err: reqwest::Error) -> Self {
        ResolveError::Network(err.to_string())
    }
}

/// Una strategia di risoluzione: trasforma un link validato in un
/// `MediaDescriptor`, oppure fallisce senza effetti collaterali.
///
/// Le implementazioni eseguono al più una richiesta di rete per
/// chiamata e non vengono mai ritentate all'interno della stessa
/// risoluzione.
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Nome stabile della strategia, usato nei log e nei descrittori.
    fn name(&self) -> &'static str;

    async fn resolve(&self, link: &PostLink) -> Result<MediaDescriptor, ResolveError>;
}
