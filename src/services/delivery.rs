//! Delivery service - Invio dell'asset risolto sul canale giusto
//!
//! Canale primario scelto dal tipo del media; su rifiuto esplicito della
//! piattaforma un solo ritentativo come documento generico, rietichettando
//! l'esito. Piattaforma irraggiungibile: nessun fallback, l'esito è
//! fallimento (ritentare su trasporto morto sprecherebbe solo la chiamata).

use tracing::{info, instrument, warn};

use super::texts;
use crate::entities::MediaKind;
use crate::resolver::MediaDescriptor;
use crate::telegram::{BotApi, SendOutcome};

/// Esito finale di una consegna. `Delivered` porta il tipo effettivamente
/// registrato, che può essere `Document` se ha vinto il fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered(MediaKind),
    Failed,
}

#[instrument(skip(bot, media), fields(kind = %media.kind, source = media.source))]
pub async fn deliver(bot: &dyn BotApi, chat_id: i64, media: &MediaDescriptor) -> DeliveryOutcome {
    let caption = texts::delivery_caption(media.kind);

    let primary = match media.kind {
        MediaKind::Video => bot.send_video(chat_id, &media.url, &caption).await,
        MediaKind::Photo => bot.send_photo(chat_id, &media.url, &caption).await,
        MediaKind::Document => bot.send_document(chat_id, &media.url, &caption).await,
    };

    match primary {
        SendOutcome::Accepted => {
            info!("delivered on primary channel");
            DeliveryOutcome::Delivered(media.kind)
        }
        SendOutcome::Rejected(reason) if media.kind != MediaKind::Document => {
            warn!(reason, "primary channel rejected, retrying as document");
            match bot.send_document(chat_id, &media.url, &caption).await {
                SendOutcome::Accepted => {
                    info!("delivered via document fallback");
                    DeliveryOutcome::Delivered(MediaKind::Document)
                }
                SendOutcome::Rejected(reason) => {
                    warn!(reason, "document fallback rejected");
                    DeliveryOutcome::Failed
                }
                SendOutcome::Unreachable(error) => {
                    warn!(error, "platform unreachable during fallback");
                    DeliveryOutcome::Failed
                }
            }
        }
        SendOutcome::Rejected(reason) => {
            warn!(reason, "document channel rejected, nothing left to try");
            DeliveryOutcome::Failed
        }
        SendOutcome::Unreachable(error) => {
            warn!(error, "platform unreachable, skipping fallback");
            DeliveryOutcome::Failed
        }
    }
}
