//! MySqlDownloadStore - Store MySQL per il registro dei download

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Error, MySqlPool};

use super::DownloadStore;
use crate::dtos::{DailyCount, HourCount, KindCount};
use crate::entities::{Download, NewDownload};

pub struct MySqlDownloadStore {
    connection_pool: MySqlPool,
}

impl MySqlDownloadStore {
    pub fn new(connection_pool: MySqlPool) -> MySqlDownloadStore {
        Self { connection_pool }
    }
}

#[async_trait]
impl DownloadStore for MySqlDownloadStore {
    async fn insert(&self, data: &NewDownload, now: DateTime<Utc>) -> Result<Download, Error> {
        let result = sqlx::query(
            "INSERT INTO downloads (user_id, url, file_type, file_size, download_date) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(data.user_id)
        .bind(&data.url)
        .bind(data.file_type)
        .bind(data.file_size)
        .bind(now)
        .execute(&self.connection_pool)
        .await?;

        Ok(Download {
            id: result.last_insert_id() as i64,
            user_id: data.user_id,
            url: data.url.clone(),
            file_type: data.file_type,
            file_size: data.file_size,
            download_date: now,
        })
    }

    async fn count_for_user(&self, user_id: i64) -> Result<i64, Error> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM downloads WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(&self.connection_pool)
                .await?;

        Ok(count)
    }

    async fn count_for_user_on(&self, user_id: i64, day: NaiveDate) -> Result<i64, Error> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM downloads WHERE user_id = ? AND DATE(download_date) = ?",
        )
        .bind(user_id)
        .bind(day)
        .fetch_one(&self.connection_pool)
        .await?;

        Ok(count)
    }

    async fn recent_for_user(&self, user_id: i64, limit: i64) -> Result<Vec<Download>, Error> {
        let downloads = sqlx::query_as::<_, Download>(
            "SELECT id, user_id, url, file_type, file_size, download_date \
             FROM downloads WHERE user_id = ? \
             ORDER BY download_date DESC, id DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(downloads)
    }

    async fn count_all(&self) -> Result<i64, Error> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM downloads")
            .fetch_one(&self.connection_pool)
            .await?;

        Ok(count)
    }

    async fn count_since(&self, since: DateTime<Utc>) -> Result<i64, Error> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM downloads WHERE download_date >= ?")
                .bind(since)
                .fetch_one(&self.connection_pool)
                .await?;

        Ok(count)
    }

    async fn daily_counts_since(&self, since: DateTime<Utc>) -> Result<Vec<DailyCount>, Error> {
        let rows = sqlx::query_as::<_, DailyCount>(
            "SELECT DATE(download_date) AS day, COUNT(*) AS count \
             FROM downloads WHERE download_date >= ? \
             GROUP BY DATE(download_date) \
             ORDER BY day DESC",
        )
        .bind(since)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(rows)
    }

    async fn kind_counts(&self) -> Result<Vec<KindCount>, Error> {
        let rows = sqlx::query_as::<_, KindCount>(
            "SELECT file_type, COUNT(*) AS count \
             FROM downloads \
             GROUP BY file_type \
             ORDER BY count DESC",
        )
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(rows)
    }

    async fn peak_hours_since(
        &self,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<HourCount>, Error> {
        let rows = sqlx::query_as::<_, HourCount>(
            "SELECT HOUR(download_date) AS hour, COUNT(*) AS count \
             FROM downloads WHERE download_date >= ? \
             GROUP BY HOUR(download_date) \
             ORDER BY count DESC, hour ASC LIMIT ?",
        )
        .bind(since)
        .bind(limit)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(rows)
    }
}
