//! Webhook service - Ricezione degli update di Telegram
//!
//! Un evento in entrata, una esecuzione completa della pipeline: upsert
//! dell'utente, dispatch del comando e, per i link, la sequenza
//! quota → risoluzione → consegna → registro. Nessun errore interno
//! diventa fatale: ogni ramo termina con un messaggio all'utente e 200.

use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use super::delivery::{self, DeliveryOutcome};
use super::ledger;
use super::quota::{self, QuotaDecision};
use super::texts;
use crate::core::{AppError, AppState};
use crate::dtos::UpdateDTO;
use crate::entities::{User, UserProfile};
use crate::resolver::{parse_post_link, PostLink};
use crate::telegram::keyboard::{
    self, BTN_ABOUT, BTN_ADMIN_REPORT, BTN_ADMIN_STATS, BTN_ADMIN_USERS, BTN_BACK, BTN_HELP,
    BTN_MY_STATS, BTN_RECENT, BTN_SUPPORT,
};

/// Header con cui Telegram ripresenta il secret registrato con setWebhook.
const SECRET_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";

/// Limite della Bot API per invii via URL, mostrato nei messaggi di aiuto.
const MAX_FILE_MB: u32 = 50;

#[instrument(skip(state, headers, update), fields(update_id = update.update_id))]
pub async fn receive_update(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(update): Json<UpdateDTO>,
) -> Result<StatusCode, AppError> {
    // 1. Verificare il secret del webhook, se configurato
    if let Some(expected) = &state.config.webhook_secret {
        let provided = headers
            .get(SECRET_HEADER)
            .and_then(|value| value.to_str().ok());
        if provided != Some(expected.as_str()) {
            warn!("webhook secret mismatch");
            return Err(AppError::unauthorized("Invalid webhook secret"));
        }
    }

    // 2. Update senza messaggio o senza mittente: ack senza lavoro
    let Some(message) = update.message else {
        debug!("update without message, ignoring");
        return Ok(StatusCode::OK);
    };
    let (Some(sender), Some(chat)) = (message.from, message.chat) else {
        debug!("message without sender or chat, ignoring");
        return Ok(StatusCode::OK);
    };

    let chat_id = chat.id;
    let text = message.text.unwrap_or_default();
    let now = Utc::now();

    // 3. Upsert dell'utente su ogni messaggio ricevuto
    let profile = UserProfile::from(&sender);
    let user = match state.users.upsert(&profile, now).await {
        Ok(user) => user,
        Err(err) => {
            error!(error = %err, "user upsert failed");
            state
                .telegram
                .send_text(chat_id, &texts::storage_error(), None)
                .await;
            return Ok(StatusCode::OK);
        }
    };

    info!(user_id = user.id, "processing message");
    dispatch(&state, chat_id, user, &text, now).await;
    Ok(StatusCode::OK)
}

/// Tabella dei comandi: confronto sul testo esatto del messaggio.
/// I bottoni amministratore senza privilegi cadono nel ramo di default,
/// esattamente come qualsiasi altro testo non riconosciuto.
async fn dispatch(state: &AppState, chat_id: i64, user: User, text: &str, now: DateTime<Utc>) {
    let is_admin = user.id == state.config.admin_id;
    let bot = state.telegram.as_ref();

    match text.trim() {
        "/start" | BTN_BACK => {
            let welcome = texts::welcome(&user.display_name(), state.config.max_downloads_per_day);
            bot.send_text(chat_id, &welcome, Some(&keyboard::main_keyboard()))
                .await;
        }
        "/help" | BTN_HELP => {
            let help = texts::help(state.config.max_downloads_per_day, MAX_FILE_MB);
            bot.send_text(chat_id, &help, None).await;
        }
        "/stats" | BTN_MY_STATS => handle_user_stats(state, chat_id, user.id, now).await,
        "/recent" | BTN_RECENT => handle_recent_downloads(state, chat_id, user.id).await,
        BTN_SUPPORT => {
            bot.send_text(chat_id, &texts::support(), None).await;
        }
        BTN_ABOUT => {
            let about = texts::about(env!("CARGO_PKG_VERSION"), now);
            bot.send_text(chat_id, &about, None).await;
        }
        "/panel" if is_admin => handle_admin_panel(state, chat_id, now).await,
        BTN_ADMIN_STATS if is_admin => handle_admin_detailed(state, chat_id, now).await,
        BTN_ADMIN_USERS if is_admin => handle_admin_users(state, chat_id).await,
        BTN_ADMIN_REPORT if is_admin => handle_admin_report(state, chat_id, now).await,
        other => match parse_post_link(other) {
            Some(link) => handle_download(state, chat_id, user, link, now).await,
            None => {
                bot.send_text(
                    chat_id,
                    &texts::invalid_input(),
                    Some(&keyboard::main_keyboard()),
                )
                .await;
            }
        },
    }
}

/// Pipeline di download. L'ordine è invariante: quota prima della
/// risoluzione (per non spendere rete su richieste già negate), registro
/// solo dopo la consegna confermata.
#[instrument(skip(state, user, link), fields(user_id = user.id, shortcode = %link.shortcode))]
async fn handle_download(
    state: &AppState,
    chat_id: i64,
    mut user: User,
    link: PostLink,
    now: DateTime<Utc>,
) {
    let bot = state.telegram.as_ref();
    let max_per_day = state.config.max_downloads_per_day;

    // 1. Autorizzazione prima di qualsiasi chiamata di rete
    let decision =
        match quota::authorize(state.users.as_ref(), &mut user, now.date_naive(), max_per_day)
            .await
        {
            Ok(decision) => decision,
            Err(err) => {
                error!(error = %err, "quota check failed");
                bot.send_text(chat_id, &texts::storage_error(), None).await;
                return;
            }
        };

    match decision {
        QuotaDecision::DeniedBanned => {
            info!("download denied, user banned");
            bot.send_text(chat_id, &texts::banned(), None).await;
            return;
        }
        QuotaDecision::DeniedQuotaExceeded => {
            info!("download denied, quota exceeded");
            bot.send_text(chat_id, &texts::quota_exceeded(max_per_day), None)
                .await;
            return;
        }
        QuotaDecision::Authorized => {}
    }

    // 2. Messaggio di attesa, poi la cascata di risoluzione
    bot.send_text(chat_id, &texts::processing(), None).await;

    let Some(media) = state.resolver.resolve(&link).await else {
        bot.send_text(chat_id, &texts::resolution_failed(), None)
            .await;
        return;
    };

    // 3. Consegna, con l'eventuale fallback a documento
    let DeliveryOutcome::Delivered(kind) = delivery::deliver(bot, chat_id, &media).await else {
        bot.send_text(chat_id, &texts::delivery_failed(MAX_FILE_MB), None)
            .await;
        return;
    };

    // 4. Claim dello slot e riga di registro, solo a consegna avvenuta
    match ledger::record_download(
        state.users.as_ref(),
        state.downloads.as_ref(),
        user.id,
        &link.url,
        kind,
        max_per_day,
        now,
    )
    .await
    {
        Ok(true) => send_success_summary(state, chat_id, user.id, now).await,
        Ok(false) => {
            // Consegnato ma slot conteso da un evento concorrente:
            // nessuna riga, l'utente vede il messaggio di quota
            warn!("delivered but slot claim missed");
            bot.send_text(chat_id, &texts::quota_exceeded(max_per_day), None)
                .await;
        }
        Err(err) => {
            error!(error = %err, "ledger write failed");
            bot.send_text(chat_id, &texts::storage_error(), None).await;
        }
    }
}

async fn send_success_summary(state: &AppState, chat_id: i64, user_id: i64, now: DateTime<Utc>) {
    let bot = state.telegram.as_ref();
    let max_per_day = state.config.max_downloads_per_day;

    match ledger::user_stats(
        state.users.as_ref(),
        state.downloads.as_ref(),
        user_id,
        max_per_day,
        now,
    )
    .await
    {
        Ok(Some((_, stats))) => {
            bot.send_text(chat_id, &texts::success_summary(&stats), None)
                .await;
        }
        Ok(None) => {
            bot.send_text(chat_id, &texts::success_short(), None).await;
        }
        Err(err) => {
            warn!(error = %err, "stats read failed after delivery");
            bot.send_text(chat_id, &texts::success_short(), None).await;
        }
    }
}

async fn handle_user_stats(state: &AppState, chat_id: i64, user_id: i64, now: DateTime<Utc>) {
    let bot = state.telegram.as_ref();

    match ledger::user_stats(
        state.users.as_ref(),
        state.downloads.as_ref(),
        user_id,
        state.config.max_downloads_per_day,
        now,
    )
    .await
    {
        Ok(Some((user, stats))) => {
            bot.send_text(chat_id, &texts::user_stats(&user, &stats), None)
                .await;
        }
        Ok(None) => {
            bot.send_text(chat_id, &texts::storage_error(), None).await;
        }
        Err(err) => {
            error!(error = %err, "user stats failed");
            bot.send_text(chat_id, &texts::storage_error(), None).await;
        }
    }
}

async fn handle_recent_downloads(state: &AppState, chat_id: i64, user_id: i64) {
    let bot = state.telegram.as_ref();

    match ledger::recent_downloads(state.downloads.as_ref(), user_id).await {
        Ok(downloads) if downloads.is_empty() => {
            bot.send_text(chat_id, &texts::recent_empty(), None).await;
        }
        Ok(downloads) => {
            bot.send_text(chat_id, &texts::recent_downloads(&downloads), None)
                .await;
        }
        Err(err) => {
            error!(error = %err, "recent downloads failed");
            bot.send_text(chat_id, &texts::storage_error(), None).await;
        }
    }
}

async fn handle_admin_panel(state: &AppState, chat_id: i64, now: DateTime<Utc>) {
    let bot = state.telegram.as_ref();

    match ledger::admin_overview(state.users.as_ref(), state.downloads.as_ref(), now).await {
        Ok(overview) => {
            bot.send_text(
                chat_id,
                &texts::admin_overview(&overview),
                Some(&keyboard::admin_keyboard()),
            )
            .await;
        }
        Err(err) => {
            error!(error = %err, "admin overview failed");
            bot.send_text(chat_id, &texts::storage_error(), None).await;
        }
    }
}

async fn handle_admin_detailed(state: &AppState, chat_id: i64, now: DateTime<Utc>) {
    let bot = state.telegram.as_ref();

    match ledger::admin_overview(state.users.as_ref(), state.downloads.as_ref(), now).await {
        Ok(overview) => {
            let text = texts::admin_detailed(&overview, env!("CARGO_PKG_VERSION"));
            bot.send_text(chat_id, &text, None).await;
        }
        Err(err) => {
            error!(error = %err, "admin detailed stats failed");
            bot.send_text(chat_id, &texts::storage_error(), None).await;
        }
    }
}

async fn handle_admin_users(state: &AppState, chat_id: i64) {
    let bot = state.telegram.as_ref();

    match ledger::top_users(state.users.as_ref()).await {
        Ok((users, banned_count)) => {
            bot.send_text(chat_id, &texts::top_users(&users, banned_count), None)
                .await;
        }
        Err(err) => {
            error!(error = %err, "top users failed");
            bot.send_text(chat_id, &texts::storage_error(), None).await;
        }
    }
}

async fn handle_admin_report(state: &AppState, chat_id: i64, now: DateTime<Utc>) {
    let bot = state.telegram.as_ref();

    match ledger::download_report(state.downloads.as_ref(), now).await {
        Ok(report) => {
            bot.send_text(chat_id, &texts::download_report(&report), None)
                .await;
        }
        Err(err) => {
            error!(error = %err, "download report failed");
            bot.send_text(chat_id, &texts::storage_error(), None).await;
        }
    }
}
