use chrono::NaiveDateTime;
use sqlx::SqlitePool;

use crate::domain::session_model::SessionToken;
use crate::error::{Result, RosterError};

// 小数秒も残す (0 のときは何も付かない)
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, session: &SessionToken) -> Result<()> {
        sqlx::query("INSERT INTO sessions (token, expires_at) VALUES (?1, ?2)")
            .bind(&session.token)
            .bind(session.expires_at.format(TIMESTAMP_FORMAT).to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn find(&self, token: &str) -> Result<Option<SessionToken>> {
        let expires_at: Option<String> =
            sqlx::query_scalar("SELECT expires_at FROM sessions WHERE token = ?1")
                .bind(token)
                .fetch_optional(&self.pool)
                .await?;

        expires_at
            .map(|raw| {
                NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT)
                    .map(|expires_at| SessionToken { token: token.to_string(), expires_at })
                    .map_err(|e| RosterError::Corrupt(format!("session expiry `{}`: {}", raw, e)))
            })
            .transpose()
    }

    pub async fn delete(&self, token: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE token = ?1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// 期限切れのセッションを消す
    pub async fn purge_expired(&self, now: NaiveDateTime) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?1")
            .bind(now.format(TIMESTAMP_FORMAT).to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// パスワード変更時など、全セッションを無効にする
    pub async fn delete_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
