//! Ledger service - Contabilità dei download e statistiche derivate
//!
//! La registrazione avviene SOLO a consegna confermata: prima il claim
//! condizionale dello slot (che chiude la corsa tra eventi concorrenti
//! sullo stesso utente), poi la riga nel registro. Un claim mancato non
//! lascia nessuna riga.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use tracing::{info, instrument, warn};

use crate::dtos::{AdminOverview, DownloadReport, UserStats};
use crate::entities::{MediaKind, NewDownload, User};
use crate::monitoring;
use crate::repositories::{DownloadStore, UserStore};

const TOP_USERS_LIMIT: i64 = 15;
const RECENT_LIMIT: i64 = 10;
const PEAK_HOURS_LIMIT: i64 = 5;
const REPORT_WINDOW_DAYS: i64 = 7;

/// Consuma uno slot e appende la riga nel registro.
///
/// `Ok(false)` significa che il claim non è passato (slot esauriti nel
/// frattempo, oppure ban): in quel caso non viene scritto nulla.
#[instrument(skip_all, fields(user_id = user_id, kind = %kind))]
pub async fn record_download(
    users: &dyn UserStore,
    downloads: &dyn DownloadStore,
    user_id: i64,
    url: &str,
    kind: MediaKind,
    max_per_day: i32,
    now: DateTime<Utc>,
) -> Result<bool, sqlx::Error> {
    if !users.claim_download_slot(user_id, max_per_day, now).await? {
        warn!("download slot claim did not apply");
        return Ok(false);
    }

    downloads
        .insert(
            &NewDownload {
                user_id,
                url: url.to_string(),
                file_type: kind,
                file_size: 0,
            },
            now,
        )
        .await?;

    info!("download recorded");
    Ok(true)
}

/// Statistiche personali, contate dal registro e non dai contatori
/// dell'utente: il registro è il fatto, i contatori servono alla quota.
pub async fn user_stats(
    users: &dyn UserStore,
    downloads: &dyn DownloadStore,
    user_id: i64,
    max_per_day: i32,
    now: DateTime<Utc>,
) -> Result<Option<(User, UserStats)>, sqlx::Error> {
    let Some(user) = users.read(user_id).await? else {
        return Ok(None);
    };

    let downloads_today = downloads
        .count_for_user_on(user_id, now.date_naive())
        .await?;
    let total_downloads = downloads.count_for_user(user_id).await?;

    let stats = UserStats {
        total_downloads,
        downloads_today,
        remaining_today: (i64::from(max_per_day) - downloads_today).max(0),
        join_date: user.join_date,
        last_activity: user.last_activity,
        is_banned: user.is_banned,
    };

    Ok(Some((user, stats)))
}

pub async fn recent_downloads(
    downloads: &dyn DownloadStore,
    user_id: i64,
) -> Result<Vec<crate::entities::Download>, sqlx::Error> {
    downloads.recent_for_user(user_id, RECENT_LIMIT).await
}

/// Quadro complessivo per il pannello amministratore. Le finestre "oggi"
/// partono dalla mezzanotte UTC, quelle "settimana" sono 7 giorni mobili.
pub async fn admin_overview(
    users: &dyn UserStore,
    downloads: &dyn DownloadStore,
    now: DateTime<Utc>,
) -> Result<AdminOverview, sqlx::Error> {
    let start_of_today = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    let week_ago = now - Duration::days(REPORT_WINDOW_DAYS);

    Ok(AdminOverview {
        total_users: users.count_all().await?,
        active_today: users.count_active_since(start_of_today).await?,
        active_week: users.count_active_since(week_ago).await?,
        new_users_today: users.count_joined_since(start_of_today).await?,
        total_downloads: downloads.count_all().await?,
        downloads_today: downloads.count_since(start_of_today).await?,
        downloads_week: downloads.count_since(week_ago).await?,
        memory_mb: monitoring::process_memory_mb(),
        server_time: now,
    })
}

pub async fn download_report(
    downloads: &dyn DownloadStore,
    now: DateTime<Utc>,
) -> Result<DownloadReport, sqlx::Error> {
    let week_ago = now - Duration::days(REPORT_WINDOW_DAYS);

    Ok(DownloadReport {
        daily: downloads.daily_counts_since(week_ago).await?,
        by_kind: downloads.kind_counts().await?,
        peak_hours: downloads.peak_hours_since(week_ago, PEAK_HOURS_LIMIT).await?,
    })
}

pub async fn top_users(users: &dyn UserStore) -> Result<(Vec<User>, i64), sqlx::Error> {
    let top = users.top_by_downloads(TOP_USERS_LIMIT).await?;
    let banned = users.count_banned().await?;
    Ok((top, banned))
}
