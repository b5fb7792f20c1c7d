//! Store in memoria su DashMap, con la stessa semantica degli store MySQL
//!
//! Usati dai test di integrazione per esercitare i servizi senza un
//! database reale. Le decisioni sul cambio giorno e sul claim atomico
//! replicano esattamente le statement condizionali degli store SQL.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Timelike, Utc};
use dashmap::DashMap;

use super::{DownloadStore, UserStore};
use crate::dtos::{DailyCount, HourCount, KindCount};
use crate::entities::{Download, MediaKind, NewDownload, User, UserProfile};

#[derive(Default)]
pub struct InMemoryUserStore {
    users: DashMap<i64, User>,
}

impl InMemoryUserStore {
    pub fn new() -> InMemoryUserStore {
        Self::default()
    }

    /// Inserisce una riga già costruita, per preparare scenari nei test.
    pub fn seed(&self, user: User) {
        self.users.insert(user.id, user);
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn upsert(&self, profile: &UserProfile, now: DateTime<Utc>) -> Result<User, sqlx::Error> {
        let today = now.date_naive();
        let mut entry = self.users.entry(profile.id).or_insert_with(|| User {
            id: profile.id,
            username: profile.username.clone(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            downloads_today: 0,
            total_downloads: 0,
            is_banned: false,
            join_date: now,
            last_activity: now,
        });

        if entry.last_activity.date_naive() < today {
            entry.downloads_today = 0;
        }
        entry.username = profile.username.clone();
        entry.first_name = profile.first_name.clone();
        entry.last_name = profile.last_name.clone();
        entry.last_activity = now;

        Ok(entry.clone())
    }

    async fn read(&self, id: i64) -> Result<Option<User>, sqlx::Error> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn reset_daily_count(&self, id: i64) -> Result<(), sqlx::Error> {
        if let Some(mut user) = self.users.get_mut(&id) {
            user.downloads_today = 0;
        }
        Ok(())
    }

    async fn claim_download_slot(
        &self,
        id: i64,
        max_per_day: i32,
        now: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error> {
        // get_mut tiene il lock dello shard: controllo e incremento
        // avvengono senza interleaving, come l'UPDATE condizionale
        match self.users.get_mut(&id) {
            Some(mut user) => {
                if user.is_banned || user.downloads_today >= max_per_day {
                    return Ok(false);
                }
                user.downloads_today += 1;
                user.total_downloads += 1;
                user.last_activity = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count_all(&self) -> Result<i64, sqlx::Error> {
        Ok(self.users.len() as i64)
    }

    async fn count_active_since(&self, since: DateTime<Utc>) -> Result<i64, sqlx::Error> {
        Ok(self
            .users
            .iter()
            .filter(|u| u.last_activity >= since)
            .count() as i64)
    }

    async fn count_joined_since(&self, since: DateTime<Utc>) -> Result<i64, sqlx::Error> {
        Ok(self.users.iter().filter(|u| u.join_date >= since).count() as i64)
    }

    async fn count_banned(&self) -> Result<i64, sqlx::Error> {
        Ok(self.users.iter().filter(|u| u.is_banned).count() as i64)
    }

    async fn top_by_downloads(&self, limit: i64) -> Result<Vec<User>, sqlx::Error> {
        let mut users: Vec<User> = self.users.iter().map(|u| u.clone()).collect();
        users.sort_by(|a, b| b.total_downloads.cmp(&a.total_downloads).then(a.id.cmp(&b.id)));
        users.truncate(limit as usize);
        Ok(users)
    }
}

#[derive(Default)]
pub struct InMemoryDownloadStore {
    downloads: DashMap<i64, Download>,
    next_id: AtomicI64,
}

impl InMemoryDownloadStore {
    pub fn new() -> InMemoryDownloadStore {
        Self::default()
    }
}

#[async_trait]
impl DownloadStore for InMemoryDownloadStore {
    async fn insert(&self, data: &NewDownload, now: DateTime<Utc>) -> Result<Download, sqlx::Error> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let download = Download {
            id,
            user_id: data.user_id,
            url: data.url.clone(),
            file_type: data.file_type,
            file_size: data.file_size,
            download_date: now,
        };
        self.downloads.insert(id, download.clone());
        Ok(download)
    }

    async fn count_for_user(&self, user_id: i64) -> Result<i64, sqlx::Error> {
        Ok(self
            .downloads
            .iter()
            .filter(|d| d.user_id == user_id)
            .count() as i64)
    }

    async fn count_for_user_on(&self, user_id: i64, day: NaiveDate) -> Result<i64, sqlx::Error> {
        Ok(self
            .downloads
            .iter()
            .filter(|d| d.user_id == user_id && d.download_date.date_naive() == day)
            .count() as i64)
    }

    async fn recent_for_user(&self, user_id: i64, limit: i64) -> Result<Vec<Download>, sqlx::Error> {
        let mut rows: Vec<Download> = self
            .downloads
            .iter()
            .filter(|d| d.user_id == user_id)
            .map(|d| d.clone())
            .collect();
        rows.sort_by(|a, b| b.download_date.cmp(&a.download_date).then(b.id.cmp(&a.id)));
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn count_all(&self) -> Result<i64, sqlx::Error> {
        Ok(self.downloads.len() as i64)
    }

    async fn count_since(&self, since: DateTime<Utc>) -> Result<i64, sqlx::Error> {
        Ok(self
            .downloads
            .iter()
            .filter(|d| d.download_date >= since)
            .count() as i64)
    }

    async fn daily_counts_since(&self, since: DateTime<Utc>) -> Result<Vec<DailyCount>, sqlx::Error> {
        let mut by_day: HashMap<NaiveDate, i64> = HashMap::new();
        for d in self.downloads.iter().filter(|d| d.download_date >= since) {
            *by_day.entry(d.download_date.date_naive()).or_insert(0) += 1;
        }
        let mut rows: Vec<DailyCount> = by_day
            .into_iter()
            .map(|(day, count)| DailyCount { day, count })
            .collect();
        rows.sort_by(|a, b| b.day.cmp(&a.day));
        Ok(rows)
    }

    async fn kind_counts(&self) -> Result<Vec<KindCount>, sqlx::Error> {
        let mut by_kind: HashMap<MediaKind, i64> = HashMap::new();
        for d in self.downloads.iter() {
            *by_kind.entry(d.file_type).or_insert(0) += 1;
        }
        let mut rows: Vec<KindCount> = by_kind
            .into_iter()
            .map(|(file_type, count)| KindCount { file_type, count })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count));
        Ok(rows)
    }

    async fn peak_hours_since(
        &self,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<HourCount>, sqlx::Error> {
        let mut by_hour: HashMap<i64, i64> = HashMap::new();
        for d in self.downloads.iter().filter(|d| d.download_date >= since) {
            *by_hour.entry(d.download_date.hour() as i64).or_insert(0) += 1;
        }
        let mut rows: Vec<HourCount> = by_hour
            .into_iter()
            .map(|(hour, count)| HourCount { hour, count })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count).then(a.hour.cmp(&b.hour)));
        rows.truncate(limit as usize);
        Ok(rows)
    }
}
