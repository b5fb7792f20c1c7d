//! Application State - Stato globale dell'applicazione
//!
//! Contiene gli store, il resolver, il client Telegram e la configurazione
//! condivisi tra tutte le route. Gli store e il client sono dietro trait
//! object, così i test di integrazione montano versioni in memoria senza
//! toccare MySQL né la rete.

use std::sync::Arc;
use std::time::Duration;

use sqlx::MySqlPool;

use crate::core::config::Config;
use crate::repositories::{DownloadStore, MySqlDownloadStore, MySqlUserStore, UserStore};
use crate::resolver::MediaResolver;
use crate::telegram::{BotApi, TelegramApi};

/// Stato globale dell'applicazione condiviso tra tutte le route e middleware
pub struct AppState {
    /// Store per la gestione degli utenti
    pub users: Arc<dyn UserStore>,

    /// Store per il registro dei download
    pub downloads: Arc<dyn DownloadStore>,

    /// Cascata delle strategie di risoluzione dei media
    pub resolver: MediaResolver,

    /// Client verso la Bot API di Telegram
    pub telegram: Arc<dyn BotApi>,

    /// Configurazione caricata all'avvio
    pub config: Config,
}

impl AppState {
    /// Crea una nuova istanza di AppState con gli store MySQL e i client
    /// HTTP di produzione.
    ///
    /// # Arguments
    /// * `pool` - Pool di connessioni MySQL condiviso
    /// * `http` - Client HTTP riusato da resolver e Bot API
    /// * `config` - Configurazione caricata dalle variabili d'ambiente
    ///
    /// # Returns
    /// Nuova istanza di AppState con tutti i componenti inizializzati
    pub fn new(pool: MySqlPool, http: reqwest::Client, config: Config) -> Self {
        let resolver = MediaResolver::standard(
            http.clone(),
            Duration::from_secs(config.resolve_timeout_secs),
        );
        let telegram = TelegramApi::new(
            http,
            config.bot_token.clone(),
            Duration::from_secs(config.send_timeout_secs),
        );

        Self {
            users: Arc::new(MySqlUserStore::new(pool.clone())),
            downloads: Arc::new(MySqlDownloadStore::new(pool)),
            resolver,
            telegram: Arc::new(telegram),
            config,
        }
    }

    /// Assembla lo stato da componenti già costruiti. Usato dai test di
    /// integrazione per montare store in memoria e un bot programmabile.
    pub fn with_parts(
        users: Arc<dyn UserStore>,
        downloads: Arc<dyn DownloadStore>,
        resolver: MediaResolver,
        telegram: Arc<dyn BotApi>,
        config: Config,
    ) -> Self {
        Self {
            users,
            downloads,
            resolver,
            telegram,
            config,
        }
    }
}
