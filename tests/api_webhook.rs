//! Integration tests per il webhook di Telegram
//!
//! Test per:
//! - POST /webhook - secret, ack degli update non gestibili
//! - pipeline di download: quota → risoluzione → consegna → registro
//! - fallback a documento sul rifiuto esplicito della piattaforma
//!
//! Tutto gira in memoria: store DashMap, strategie programmate e un
//! trasporto Telegram che registra le chiamate invece di eseguirle.

mod common;

#[cfg(test)]
mod webhook_tests {
    use super::common::*;
    use axum_test::http::HeaderName;
    use chrono::Utc;
    use igrelay::entities::{MediaKind, User};
    use igrelay::repositories::{DownloadStore, InMemoryDownloadStore, InMemoryUserStore, UserStore};
    use serde_json::json;
    use std::sync::Arc;

    const LINK: &str = "https://www.instagram.com/p/DHxyzAB12Cd/";

    fn seeded_user(id: i64, downloads_today: i32, is_banned: bool) -> User {
        let now = Utc::now();
        User {
            id,
            username: Some("tester".to_string()),
            first_name: Some("Tester".to_string()),
            last_name: None,
            downloads_today,
            total_downloads: downloads_today as i64,
            is_banned,
            join_date: now,
            last_activity: now,
        }
    }

    // ============================================================
    // Secret del webhook e update non gestibili
    // ============================================================

    #[tokio::test]
    async fn test_webhook_rejects_wrong_secret() {
        let bot = RecordingBot::accepting();
        let state = create_test_state(
            Arc::new(InMemoryUserStore::new()),
            Arc::new(InMemoryDownloadStore::new()),
            vec![ScriptedSource::video("https://cdn.example/a.mp4")],
            bot.clone(),
        );
        let server = create_test_server(state);

        let response = server
            .post("/webhook")
            .add_header(
                HeaderName::from_static("x-telegram-bot-api-secret-token"),
                "secret-sbagliato",
            )
            .json(&text_update(1, "/start"))
            .await;

        response.assert_status_unauthorized();
        assert!(bot.calls().is_empty(), "nessun messaggio deve partire");
    }

    #[tokio::test]
    async fn test_webhook_rejects_missing_secret() {
        let bot = RecordingBot::accepting();
        let state = create_test_state(
            Arc::new(InMemoryUserStore::new()),
            Arc::new(InMemoryDownloadStore::new()),
            vec![ScriptedSource::miss()],
            bot.clone(),
        );
        let server = create_test_server(state);

        let response = server.post("/webhook").json(&text_update(1, "/start")).await;

        response.assert_status_unauthorized();
        assert!(bot.calls().is_empty());
    }

    #[tokio::test]
    async fn test_update_without_message_is_acked() {
        let bot = RecordingBot::accepting();
        let users = Arc::new(InMemoryUserStore::new());
        let state = create_test_state(
            users.clone(),
            Arc::new(InMemoryDownloadStore::new()),
            vec![ScriptedSource::miss()],
            bot.clone(),
        );
        let server = create_test_server(state);

        let response = post_update(&server, &json!({ "update_id": 5 })).await;

        response.assert_status_ok();
        assert!(bot.calls().is_empty());
        assert_eq!(users.count_all().await.unwrap(), 0, "nessun upsert");
    }

    #[tokio::test]
    async fn test_root_is_up() {
        let state = create_test_state(
            Arc::new(InMemoryUserStore::new()),
            Arc::new(InMemoryDownloadStore::new()),
            vec![ScriptedSource::miss()],
            RecordingBot::accepting(),
        );
        let server = create_test_server(state);

        let response = server.get("/").await;
        response.assert_status_ok();
    }

    // ============================================================
    // Pipeline di download: percorso felice
    // ============================================================

    #[tokio::test]
    async fn test_video_delivered_and_recorded() {
        let source = ScriptedSource::video("https://cdn.example/clip.mp4");
        let bot = RecordingBot::accepting();
        let users = Arc::new(InMemoryUserStore::new());
        let downloads = Arc::new(InMemoryDownloadStore::new());
        let state = create_test_state(
            users.clone(),
            downloads.clone(),
            vec![source.clone()],
            bot.clone(),
        );
        let server = create_test_server(state);

        let response = send_message(&server, 42, LINK).await;
        response.assert_status_ok();

        // Sequenza: attesa → video → riepilogo
        let methods: Vec<&str> = bot.calls().iter().map(|c| c.method).collect();
        assert_eq!(methods, vec!["sendMessage", "sendVideo", "sendMessage"]);
        assert_eq!(bot.calls()[1].body, "https://cdn.example/clip.mp4");
        assert!(bot.last_text().unwrap().contains("delivered successfully"));

        // Una riga di registro con l'URL originale del messaggio
        let rows = downloads.recent_for_user(42, 10).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].file_type, MediaKind::Video);
        assert_eq!(rows[0].url, LINK);
        assert_eq!(rows[0].file_size, 0);

        // Contatori aggiornati dal claim
        let user = users.read(42).await.unwrap().unwrap();
        assert_eq!(user.downloads_today, 1);
        assert_eq!(user.total_downloads, 1);
    }

    #[tokio::test]
    async fn test_second_strategy_serves_after_first_miss() {
        let first = ScriptedSource::miss();
        let second = ScriptedSource::photo("https://cdn.example/pic.jpg");
        let third = ScriptedSource::miss();
        let bot = RecordingBot::accepting();
        let downloads = Arc::new(InMemoryDownloadStore::new());
        let state = create_test_state(
            Arc::new(InMemoryUserStore::new()),
            downloads.clone(),
            vec![first.clone(), second.clone(), third.clone()],
            bot.clone(),
        );
        let server = create_test_server(state);

        send_message(&server, 42, LINK).await.assert_status_ok();

        // La terza strategia non viene mai interrogata
        assert_eq!(first.calls(), 1);
        assert_eq!(second.calls(), 1);
        assert_eq!(third.calls(), 0);

        let media = bot.media_calls();
        assert_eq!(media.len(), 1);
        assert_eq!(media[0].method, "sendPhoto");

        let rows = downloads.recent_for_user(42, 10).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].file_type, MediaKind::Photo);
    }

    // ============================================================
    // Pipeline di download: fallimenti senza scritture
    // ============================================================

    #[tokio::test]
    async fn test_exhausted_cascade_reports_failure_without_writes() {
        let first = ScriptedSource::miss();
        let second = ScriptedSource::miss();
        let bot = RecordingBot::accepting();
        let users = Arc::new(InMemoryUserStore::new());
        let downloads = Arc::new(InMemoryDownloadStore::new());
        let state = create_test_state(
            users.clone(),
            downloads.clone(),
            vec![first.clone(), second.clone()],
            bot.clone(),
        );
        let server = create_test_server(state);

        send_message(&server, 42, LINK).await.assert_status_ok();

        assert_eq!(first.calls(), 1);
        assert_eq!(second.calls(), 1);
        assert!(bot.media_calls().is_empty());
        assert!(bot.last_text().unwrap().contains("Download failed"));

        // Nessuna riga e nessuno slot consumato
        assert_eq!(downloads.count_all().await.unwrap(), 0);
        let user = users.read(42).await.unwrap().unwrap();
        assert_eq!(user.downloads_today, 0);
        assert_eq!(user.total_downloads, 0);
    }

    #[tokio::test]
    async fn test_quota_exhausted_blocks_before_any_network_call() {
        let source = ScriptedSource::video("https://cdn.example/clip.mp4");
        let bot = RecordingBot::accepting();
        let users = Arc::new(InMemoryUserStore::new());
        users.seed(seeded_user(42, 50, false));
        let downloads = Arc::new(InMemoryDownloadStore::new());
        let state = create_test_state(
            users.clone(),
            downloads.clone(),
            vec![source.clone()],
            bot.clone(),
        );
        let server = create_test_server(state);

        send_message(&server, 42, LINK).await.assert_status_ok();

        // Negato prima della cascata: niente rete, niente attesa
        assert_eq!(source.calls(), 0);
        assert!(bot.media_calls().is_empty());
        let texts = bot.texts();
        assert_eq!(texts.len(), 1);
        assert!(texts[0].contains("Daily download limit"));
        assert_eq!(downloads.count_all().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_banned_user_is_refused() {
        let source = ScriptedSource::video("https://cdn.example/clip.mp4");
        let bot = RecordingBot::accepting();
        let users = Arc::new(InMemoryUserStore::new());
        users.seed(seeded_user(42, 0, true));
        let state = create_test_state(
            users.clone(),
            Arc::new(InMemoryDownloadStore::new()),
            vec![source.clone()],
            bot.clone(),
        );
        let server = create_test_server(state);

        send_message(&server, 42, LINK).await.assert_status_ok();

        assert_eq!(source.calls(), 0);
        assert!(bot.last_text().unwrap().contains("blocked"));
    }

    #[tokio::test]
    async fn test_plain_text_gets_guidance_without_side_effects() {
        let source = ScriptedSource::video("https://cdn.example/clip.mp4");
        let bot = RecordingBot::accepting();
        let downloads = Arc::new(InMemoryDownloadStore::new());
        let state = create_test_state(
            Arc::new(InMemoryUserStore::new()),
            downloads.clone(),
            vec![source.clone()],
            bot.clone(),
        );
        let server = create_test_server(state);

        send_message(&server, 42, "hello bot").await.assert_status_ok();

        assert_eq!(source.calls(), 0);
        assert_eq!(downloads.count_all().await.unwrap(), 0);
        let calls = bot.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].body.contains("did not get that"));
        assert!(calls[0].with_keyboard, "la tastiera guida l'utente");
    }

    // ============================================================
    // Fallback a documento
    // ============================================================

    #[tokio::test]
    async fn test_rejected_video_falls_back_to_document() {
        let source = ScriptedSource::video("https://cdn.example/huge.mp4");
        let bot = RecordingBot::rejecting_video("Request Entity Too Large");
        let users = Arc::new(InMemoryUserStore::new());
        let downloads = Arc::new(InMemoryDownloadStore::new());
        let state = create_test_state(
            users.clone(),
            downloads.clone(),
            vec![source.clone()],
            bot.clone(),
        );
        let server = create_test_server(state);

        send_message(&server, 42, LINK).await.assert_status_ok();

        // Un solo retry, stesso URL, stessa caption calcolata per il video
        let media = bot.media_calls();
        let methods: Vec<&str> = media.iter().map(|c| c.method).collect();
        assert_eq!(methods, vec!["sendVideo", "sendDocument"]);
        assert_eq!(media[0].body, media[1].body);
        assert_eq!(media[0].caption, media[1].caption);
        assert!(media[1].caption.as_deref().unwrap().contains("Instagram video"));

        // La riga di registro porta il tipo effettivamente consegnato
        let rows = downloads.recent_for_user(42, 10).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].file_type, MediaKind::Document);
        assert!(bot.last_text().unwrap().contains("delivered successfully"));
    }

    #[tokio::test]
    async fn test_rejected_document_fallback_fails_delivery() {
        let source = ScriptedSource::video("https://cdn.example/huge.mp4");
        let bot = RecordingBot::rejecting_media("Request Entity Too Large");
        let users = Arc::new(InMemoryUserStore::new());
        let downloads = Arc::new(InMemoryDownloadStore::new());
        let state = create_test_state(
            users.clone(),
            downloads.clone(),
            vec![source.clone()],
            bot.clone(),
        );
        let server = create_test_server(state);

        send_message(&server, 42, LINK).await.assert_status_ok();

        // Video rifiutato, documento rifiutato: si chiude lì
        let methods: Vec<&str> = bot.media_calls().iter().map(|c| c.method).collect();
        assert_eq!(methods, vec!["sendVideo", "sendDocument"]);
        assert!(bot.last_text().unwrap().contains("Could not send the file"));

        // Consegna fallita: nessuna riga, nessuno slot
        assert_eq!(downloads.count_all().await.unwrap(), 0);
        let user = users.read(42).await.unwrap().unwrap();
        assert_eq!(user.downloads_today, 0);
    }

    #[tokio::test]
    async fn test_unreachable_platform_skips_the_fallback() {
        let source = ScriptedSource::video("https://cdn.example/clip.mp4");
        let bot = RecordingBot::unreachable_media();
        let downloads = Arc::new(InMemoryDownloadStore::new());
        let state = create_test_state(
            Arc::new(InMemoryUserStore::new()),
            downloads.clone(),
            vec![source.clone()],
            bot.clone(),
        );
        let server = create_test_server(state);

        send_message(&server, 42, LINK).await.assert_status_ok();

        // Trasporto giù: niente secondo tentativo col documento
        let methods: Vec<&str> = bot.media_calls().iter().map(|c| c.method).collect();
        assert_eq!(methods, vec!["sendVideo"]);
        assert!(bot.last_text().unwrap().contains("Could not send the file"));
        assert_eq!(downloads.count_all().await.unwrap(), 0);
    }
}
