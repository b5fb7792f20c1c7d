//! Helper condivisi dai test di integrazione
//!
//! Montano un AppState completo senza MySQL né rete: store in memoria,
//! strategie di risoluzione programmabili e un trasporto Telegram che
//! registra le chiamate invece di eseguirle.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_test::TestServer;
use axum_test::http::HeaderName;
use serde_json::{Value, json};

use igrelay::core::{AppState, Config};
use igrelay::entities::MediaKind;
use igrelay::repositories::{InMemoryDownloadStore, InMemoryUserStore};
use igrelay::resolver::{MediaDescriptor, MediaResolver, MediaSource, PostLink, ResolveError};
use igrelay::telegram::{BotApi, ReplyKeyboard, SendOutcome};

/// Id dell'amministratore configurato nello stato di test
pub const ADMIN_ID: i64 = 999;

/// Secret del webhook configurato nello stato di test
pub const WEBHOOK_SECRET: &str = "segreto-di-test";

/// Configurazione di test, senza leggere variabili d'ambiente
pub fn test_config() -> Config {
    Config {
        bot_token: "123456:TEST".to_string(),
        admin_id: ADMIN_ID,
        database_url: "mysql://unused".to_string(),
        webhook_secret: Some(WEBHOOK_SECRET.to_string()),
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        max_connections: 1,
        max_downloads_per_day: 50,
        resolve_timeout_secs: 5,
        send_timeout_secs: 5,
        connect_timeout_secs: 5,
        app_env: "test".to_string(),
    }
}

/// Crea un AppState per i test
///
/// # Arguments
/// * `users` - Store utenti in memoria
/// * `downloads` - Store del registro in memoria
/// * `sources` - Strategie di risoluzione programmate
/// * `bot` - Trasporto Telegram che registra le chiamate
///
/// # Returns
/// Arc<AppState> configurato con il secret e l'admin di test
pub fn create_test_state(
    users: Arc<InMemoryUserStore>,
    downloads: Arc<InMemoryDownloadStore>,
    sources: Vec<Arc<dyn MediaSource>>,
    bot: Arc<RecordingBot>,
) -> Arc<AppState> {
    Arc::new(AppState::with_parts(
        users,
        downloads,
        MediaResolver::new(sources),
        bot,
        test_config(),
    ))
}

/// Crea un TestServer per i test
///
/// # Arguments
/// * `state` - AppState da utilizzare per il server
///
/// # Returns
/// TestServer configurato e pronto per eseguire richieste
pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = igrelay::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// Costruisce il payload webhook di un messaggio di testo
/// (chat id uguale al sender id, come nelle chat private)
pub fn text_update(user_id: i64, text: &str) -> Value {
    json!({
        "update_id": 1,
        "message": {
            "message_id": 1,
            "from": {"id": user_id, "first_name": "Tester", "username": "tester"},
            "chat": {"id": user_id},
            "text": text
        }
    })
}

/// Invia un update al webhook con il secret corretto
pub async fn post_update(server: &TestServer, update: &Value) -> axum_test::TestResponse {
    server
        .post("/webhook")
        .add_header(
            HeaderName::from_static("x-telegram-bot-api-secret-token"),
            WEBHOOK_SECRET,
        )
        .json(update)
        .await
}

/// Scorciatoia: messaggio di testo da `user_id`, con secret corretto
pub async fn send_message(
    server: &TestServer,
    user_id: i64,
    text: &str,
) -> axum_test::TestResponse {
    post_update(server, &text_update(user_id, text)).await
}

// ============================================================
// Strategia di risoluzione programmata
// ============================================================

/// Strategia con esito predeterminato, che conta le chiamate ricevute.
pub struct ScriptedSource {
    name: &'static str,
    outcome: Result<MediaDescriptor, ResolveError>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    /// Strategia che risolve sempre un video all'URL dato
    pub fn video(url: &str) -> Arc<ScriptedSource> {
        Arc::new(ScriptedSource {
            name: "scripted-video",
            outcome: Ok(MediaDescriptor {
                kind: MediaKind::Video,
                url: url.to_string(),
                thumbnail: None,
                source: "scripted-video",
            }),
            calls: AtomicUsize::new(0),
        })
    }

    /// Strategia che risolve sempre una foto all'URL dato
    pub fn photo(url: &str) -> Arc<ScriptedSource> {
        Arc::new(ScriptedSource {
            name: "scripted-photo",
            outcome: Ok(MediaDescriptor {
                kind: MediaKind::Photo,
                url: url.to_string(),
                thumbnail: None,
                source: "scripted-photo",
            }),
            calls: AtomicUsize::new(0),
        })
    }

    /// Strategia che fallisce sempre senza trovare nulla
    pub fn miss() -> Arc<ScriptedSource> {
        Arc::new(ScriptedSource {
            name: "scripted-miss",
            outcome: Err(ResolveError::NotFound),
            calls: AtomicUsize::new(0),
        })
    }

    /// Numero di volte in cui la strategia è stata interrogata
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaSource for ScriptedSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn resolve(&self, _link: &PostLink) -> Result<MediaDescriptor, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

// ============================================================
// Trasporto Telegram che registra le chiamate
// ============================================================

/// Una chiamata registrata dal trasporto di test
#[derive(Debug, Clone)]
pub struct SentCall {
    pub method: &'static str,
    pub chat_id: i64,
    /// Testo del messaggio, oppure URL del media
    pub body: String,
    /// Caption del media, `None` per i messaggi di testo
    pub caption: Option<String>,
    pub with_keyboard: bool,
}

/// Trasporto con esiti programmabili per metodo. I messaggi di testo
/// vengono sempre accettati: il webhook non ne controlla l'esito.
pub struct RecordingBot {
    calls: Mutex<Vec<SentCall>>,
    video_outcome: SendOutcome,
    photo_outcome: SendOutcome,
    document_outcome: SendOutcome,
}

impl RecordingBot {
    /// Trasporto che accetta tutte le chiamate
    pub fn accepting() -> Arc<RecordingBot> {
        Arc::new(RecordingBot {
            calls: Mutex::new(Vec::new()),
            video_outcome: SendOutcome::Accepted,
            photo_outcome: SendOutcome::Accepted,
            document_outcome: SendOutcome::Accepted,
        })
    }

    /// Trasporto che rifiuta i video (es. file troppo grande) ma accetta
    /// foto e documenti
    pub fn rejecting_video(description: &str) -> Arc<RecordingBot> {
        Arc::new(RecordingBot {
            calls: Mutex::new(Vec::new()),
            video_outcome: SendOutcome::Rejected(description.to_string()),
            photo_outcome: SendOutcome::Accepted,
            document_outcome: SendOutcome::Accepted,
        })
    }

    /// Trasporto che rifiuta ogni invio di media, documenti compresi
    pub fn rejecting_media(description: &str) -> Arc<RecordingBot> {
        Arc::new(RecordingBot {
            calls: Mutex::new(Vec::new()),
            video_outcome: SendOutcome::Rejected(description.to_string()),
            photo_outcome: SendOutcome::Rejected(description.to_string()),
            document_outcome: SendOutcome::Rejected(description.to_string()),
        })
    }

    /// Trasporto irraggiungibile per i media (timeout di rete)
    pub fn unreachable_media() -> Arc<RecordingBot> {
        Arc::new(RecordingBot {
            calls: Mutex::new(Vec::new()),
            video_outcome: SendOutcome::Unreachable("connection timed out".to_string()),
            photo_outcome: SendOutcome::Unreachable("connection timed out".to_string()),
            document_outcome: SendOutcome::Unreachable("connection timed out".to_string()),
        })
    }

    fn record(
        &self,
        method: &'static str,
        chat_id: i64,
        body: &str,
        caption: Option<&str>,
        with_keyboard: bool,
    ) {
        self.calls
            .lock()
            .expect("calls lock poisoned")
            .push(SentCall {
                method,
                chat_id,
                body: body.to_string(),
                caption: caption.map(str::to_string),
                with_keyboard,
            });
    }

    /// Tutte le chiamate registrate, in ordine di invio
    pub fn calls(&self) -> Vec<SentCall> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }

    /// Solo i testi dei messaggi inviati con sendMessage
    pub fn texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == "sendMessage")
            .map(|c| c.body)
            .collect()
    }

    /// Solo le chiamate di invio media (video, foto, documenti)
    pub fn media_calls(&self) -> Vec<SentCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.method != "sendMessage")
            .collect()
    }

    /// Ultimo testo inviato, se presente
    pub fn last_text(&self) -> Option<String> {
        self.texts().pop()
    }
}

#[async_trait]
impl BotApi for RecordingBot {
    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&ReplyKeyboard>,
    ) -> SendOutcome {
        self.record("sendMessage", chat_id, text, None, keyboard.is_some());
        SendOutcome::Accepted
    }

    async fn send_video(&self, chat_id: i64, video_url: &str, caption: &str) -> SendOutcome {
        self.record("sendVideo", chat_id, video_url, Some(caption), false);
        self.video_outcome.clone()
    }

    async fn send_photo(&self, chat_id: i64, photo_url: &str, caption: &str) -> SendOutcome {
        self.record("sendPhoto", chat_id, photo_url, Some(caption), false);
        self.photo_outcome.clone()
    }

    async fn send_document(&self, chat_id: i64, document_url: &str, caption: &str) -> SendOutcome {
        self.record("sendDocument", chat_id, document_url, Some(caption), false);
        self.document_outcome.clone()
    }
}
