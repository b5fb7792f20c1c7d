//! Store traits for users and download records
//!
//! Services depend on these interfaces rather than on concrete backends,
//! so the MySQL stores can be swapped for in-memory ones in tests.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::dtos::{DailyCount, HourCount, KindCount};
use crate::entities::{Download, NewDownload, User, UserProfile};

/// Persistence interface for Telegram users.
///
/// All clock-dependent operations receive the current instant from the
/// caller: the store never reads the system clock, so day boundaries are
/// decided in one place and tests stay deterministic.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts the user on first contact, refreshes the profile otherwise.
    ///
    /// On update the daily counter is reset in the same statement when the
    /// stored `last_activity` falls on a day before `now` (UTC), then
    /// `last_activity` is moved to `now`.
    ///
    /// # Arguments
    /// * `profile` - Identity fields taken from the incoming message
    /// * `now` - Instant of the event, used for both timestamps and the reset
    ///
    /// # Returns
    /// * `Ok(User)` - Row as persisted after the upsert
    /// * `Err(sqlx::Error)` - Error during the write or the re-read
    async fn upsert(&self, profile: &UserProfile, now: DateTime<Utc>) -> Result<User, sqlx::Error>;

    /// Reads a user by Telegram ID.
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - Unknown ID
    /// * `Err(sqlx::Error)` - Error during reading
    async fn read(&self, id: i64) -> Result<Option<User>, sqlx::Error>;

    /// Zeroes the daily counter of a user whose last activity is stale.
    ///
    /// # Returns
    /// * `Ok(())` - Counter reset (no-op for unknown IDs)
    /// * `Err(sqlx::Error)` - Error during the update
    async fn reset_daily_count(&self, id: i64) -> Result<(), sqlx::Error>;

    /// Atomically claims one download slot for the user.
    ///
    /// The increment of `downloads_today` and `total_downloads` is applied
    /// only if the user is not banned and still below `max_per_day`; the
    /// check and the increment happen in a single conditional update, so
    /// two concurrent claims can never both succeed on the last slot.
    ///
    /// # Returns
    /// * `Ok(true)` - Slot claimed, counters incremented
    /// * `Ok(false)` - User unknown, banned, or already at the limit
    /// * `Err(sqlx::Error)` - Error during the update
    async fn claim_download_slot(
        &self,
        id: i64,
        max_per_day: i32,
        now: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error>;

    /// Total number of registered users.
    async fn count_all(&self) -> Result<i64, sqlx::Error>;

    /// Number of users whose `last_activity` is at or after `since`.
    async fn count_active_since(&self, since: DateTime<Utc>) -> Result<i64, sqlx::Error>;

    /// Number of users whose `join_date` is at or after `since`.
    async fn count_joined_since(&self, since: DateTime<Utc>) -> Result<i64, sqlx::Error>;

    /// Number of banned users.
    async fn count_banned(&self) -> Result<i64, sqlx::Error>;

    /// Users ordered by lifetime download count, highest first.
    async fn top_by_downloads(&self, limit: i64) -> Result<Vec<User>, sqlx::Error>;
}

/// Persistence interface for the download ledger.
#[async_trait]
pub trait DownloadStore: Send + Sync {
    /// Appends one ledger entry.
    ///
    /// # Arguments
    /// * `data` - Entry fields without ID
    /// * `now` - Instant recorded as `download_date`
    ///
    /// # Returns
    /// * `Ok(Download)` - Entry with the ID assigned by the store
    /// * `Err(sqlx::Error)` - Error during insertion
    async fn insert(&self, data: &NewDownload, now: DateTime<Utc>) -> Result<Download, sqlx::Error>;

    /// Lifetime number of entries for one user.
    async fn count_for_user(&self, user_id: i64) -> Result<i64, sqlx::Error>;

    /// Number of entries for one user recorded on the given UTC day.
    async fn count_for_user_on(&self, user_id: i64, day: NaiveDate) -> Result<i64, sqlx::Error>;

    /// Most recent entries for one user, newest first.
    async fn recent_for_user(&self, user_id: i64, limit: i64) -> Result<Vec<Download>, sqlx::Error>;

    /// Lifetime number of entries across all users.
    async fn count_all(&self) -> Result<i64, sqlx::Error>;

    /// Number of entries recorded at or after `since`.
    async fn count_since(&self, since: DateTime<Utc>) -> Result<i64, sqlx::Error>;

    /// Per-day entry counts from `since` onward, most recent day first.
    async fn daily_counts_since(&self, since: DateTime<Utc>) -> Result<Vec<DailyCount>, sqlx::Error>;

    /// Entry counts grouped by media kind, largest group first.
    async fn kind_counts(&self) -> Result<Vec<KindCount>, sqlx::Error>;

    /// Busiest hours of the day from `since` onward, busiest first.
    async fn peak_hours_since(
        &self,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<HourCount>, sqlx::Error>;
}
