//! MySqlUserStore - Store MySQL per gli utenti Telegram

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Error, MySqlPool};

use super::UserStore;
use crate::entities::{User, UserProfile};

pub struct MySqlUserStore {
    connection_pool: MySqlPool,
}

impl MySqlUserStore {
    pub fn new(connection_pool: MySqlPool) -> MySqlUserStore {
        Self { connection_pool }
    }
}

#[async_trait]
impl UserStore for MySqlUserStore {
    /// Upsert in una sola statement: alla prima apparizione inserisce la riga,
    /// altrimenti aggiorna il profilo. L'azzeramento del contatore giornaliero
    /// deve precedere l'assegnazione di `last_activity`, perché MySQL valuta
    /// gli assegnamenti da sinistra a destra sui valori già aggiornati.
    async fn upsert(&self, profile: &UserProfile, now: DateTime<Utc>) -> Result<User, Error> {
        let today = now.date_naive();

        sqlx::query(
            "INSERT INTO users (id, username, first_name, last_name, join_date, last_activity) \
             VALUES (?, ?, ?, ?, ?, ?) \
             ON DUPLICATE KEY UPDATE \
                 downloads_today = IF(DATE(last_activity) < ?, 0, downloads_today), \
                 username = ?, \
                 first_name = ?, \
                 last_name = ?, \
                 last_activity = ?",
        )
        .bind(profile.id)
        .bind(&profile.username)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(now)
        .bind(now)
        .bind(today)
        .bind(&profile.username)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(now)
        .execute(&self.connection_pool)
        .await?;

        // Rilettura per restituire la riga come persistita
        self.read(profile.id)
            .await?
            .ok_or_else(|| Error::RowNotFound)
    }

    async fn read(&self, id: i64) -> Result<Option<User>, Error> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, first_name, last_name, downloads_today, total_downloads, \
                    is_banned, join_date, last_activity \
             FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(user)
    }

    async fn reset_daily_count(&self, id: i64) -> Result<(), Error> {
        sqlx::query("UPDATE users SET downloads_today = 0 WHERE id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        Ok(())
    }

    /// L'update condizionale applica controllo e incremento nella stessa
    /// statement: su due claim concorrenti per l'ultimo slot solo uno vede
    /// `rows_affected() == 1`.
    async fn claim_download_slot(
        &self,
        id: i64,
        max_per_day: i32,
        now: DateTime<Utc>,
    ) -> Result<bool, Error> {
        let result = sqlx::query(
            "UPDATE users \
             SET downloads_today = downloads_today + 1, \
                 total_downloads = total_downloads + 1, \
                 last_activity = ? \
             WHERE id = ? AND is_banned = FALSE AND downloads_today < ?",
        )
        .bind(now)
        .bind(id)
        .bind(max_per_day)
        .execute(&self.connection_pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn count_all(&self) -> Result<i64, Error> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.connection_pool)
            .await?;

        Ok(count)
    }

    async fn count_active_since(&self, since: DateTime<Utc>) -> Result<i64, Error> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE last_activity >= ?")
                .bind(since)
                .fetch_one(&self.connection_pool)
                .await?;

        Ok(count)
    }

    async fn count_joined_since(&self, since: DateTime<Utc>) -> Result<i64, Error> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE join_date >= ?")
                .bind(since)
                .fetch_one(&self.connection_pool)
                .await?;

        Ok(count)
    }

    async fn count_banned(&self) -> Result<i64, Error> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE is_banned = TRUE")
                .fetch_one(&self.connection_pool)
                .await?;

        Ok(count)
    }

    async fn top_by_downloads(&self, limit: i64) -> Result<Vec<User>, Error> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, first_name, last_name, downloads_today, total_downloads, \
                    is_banned, join_date, last_activity \
             FROM users ORDER BY total_downloads DESC, id ASC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(users)
    }
}
