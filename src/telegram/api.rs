//! Client reqwest per la Bot API di Telegram
//!
//! Il corpo della risposta viene interpretato anche su status non 2xx:
//! Telegram segnala i rifiuti con `ok: false` e status 400, e per il
//! fallback di consegna serve distinguere quel caso dal trasporto morto.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::keyboard::ReplyKeyboard;
use super::{BotApi, SendOutcome};

const API_BASE: &str = "https://api.telegram.org";

pub struct TelegramApi {
    http: reqwest::Client,
    token: String,
    timeout: Duration,
}

impl TelegramApi {
    pub fn new(http: reqwest::Client, token: String, timeout: Duration) -> TelegramApi {
        Self {
            http,
            token,
            timeout,
        }
    }

    /// Una POST JSON verso `method`; mai più di una per chiamata.
    /// L'URL contiene il token e non va mai loggato.
    async fn call(&self, method: &str, payload: Value) -> SendOutcome {
        let url = format!("{API_BASE}/bot{}/{}", self.token, method);

        let response = match self
            .http
            .post(&url)
            .json(&payload)
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!(method, error = %err, "telegram transport error");
                return SendOutcome::Unreachable(err.to_string());
            }
        };

        let status = response.status();
        let reply = match response.json::<ApiReply>().await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(method, %status, error = %err, "unreadable telegram reply");
                return SendOutcome::Unreachable(format!("status {status}: {err}"));
            }
        };

        let outcome = classify_reply(reply);
        debug!(method, %status, accepted = outcome.is_accepted(), "telegram call done");
        outcome
    }
}

#[async_trait]
impl BotApi for TelegramApi {
    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&ReplyKeyboard>,
    ) -> SendOutcome {
        let mut payload = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "HTML",
        });
        if let (Some(keyboard), Some(object)) = (keyboard, payload.as_object_mut()) {
            object.insert("reply_markup".to_string(), json!(keyboard));
        }

        self.call("sendMessage", payload).await
    }

    async fn send_video(&self, chat_id: i64, video_url: &str, caption: &str) -> SendOutcome {
        self.call(
            "sendVideo",
            json!({
                "chat_id": chat_id,
                "video": video_url,
                "caption": caption,
                "parse_mode": "HTML",
                "supports_streaming": true,
            }),
        )
        .await
    }

    async fn send_photo(&self, chat_id: i64, photo_url: &str, caption: &str) -> SendOutcome {
        self.call(
            "sendPhoto",
            json!({
                "chat_id": chat_id,
                "photo": photo_url,
                "caption": caption,
                "parse_mode": "HTML",
            }),
        )
        .await
    }

    async fn send_document(&self, chat_id: i64, document_url: &str, caption: &str) -> SendOutcome {
        self.call(
            "sendDocument",
            json!({
                "chat_id": chat_id,
                "document": document_url,
                "caption": caption,
                "parse_mode": "HTML",
            }),
        )
        .await
    }
}

#[derive(Deserialize)]
struct ApiReply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

fn classify_reply(reply: ApiReply) -> SendOutcome {
    if reply.ok {
        SendOutcome::Accepted
    } else {
        SendOutcome::Rejected(
            reply
                .description
                .unwrap_or_else(|| "no description".to_string()),
        )
    }
}
