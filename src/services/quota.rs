//! Quota service - Autorizzazione al consumo di uno slot giornaliero
//!
//! La decisione viene presa PRIMA di qualsiasi risoluzione di rete, per
//! non spendere chiamate upstream su richieste che non possono essere
//! servite. La valutazione è pura; `authorize` persiste l'azzeramento
//! del contatore quando l'utente risulta fermo a un giorno precedente.

use chrono::NaiveDate;
use tracing::{debug, instrument};

use crate::entities::User;
use crate::repositories::UserStore;

/// Esito della verifica di quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaDecision {
    Authorized,
    DeniedBanned,
    DeniedQuotaExceeded,
}

/// Regola di autorizzazione: ban prima di tutto, poi `downloads_today`
/// strettamente sotto il massimo. Il contatore di un utente fermo a un
/// giorno precedente vale 0.
pub fn evaluate(user: &User, today: NaiveDate, max_per_day: i32) -> QuotaDecision {
    if user.is_banned {
        return QuotaDecision::DeniedBanned;
    }

    let effective_count = if user.is_stale(today) {
        0
    } else {
        user.downloads_today
    };

    if effective_count < max_per_day {
        QuotaDecision::Authorized
    } else {
        QuotaDecision::DeniedQuotaExceeded
    }
}

/// Valuta la quota e persiste l'azzeramento del contatore se l'utente
/// è rimasto a un giorno precedente, così le letture successive partono
/// già azzerate.
#[instrument(skip(store, user), fields(user_id = user.id))]
pub async fn authorize(
    store: &dyn UserStore,
    user: &mut User,
    today: NaiveDate,
    max_per_day: i32,
) -> Result<QuotaDecision, sqlx::Error> {
    if user.is_stale(today) {
        debug!("stale daily counter, resetting");
        store.reset_daily_count(user.id).await?;
        user.downloads_today = 0;
    }

    Ok(evaluate(user, today, max_per_day))
}
