use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use uuid::Uuid;

/// ログイン後の有効期間
pub const SESSION_TTL_HOURS: i64 = 12;

/// ログイン成功時に発行するトークン
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionToken {
    pub token: String,
    pub expires_at: NaiveDateTime,
}

impl SessionToken {
    pub fn issue(now: NaiveDateTime) -> Self {
        Self {
            token: Uuid::new_v4().simple().to_string(),
            expires_at: now + Duration::hours(SESSION_TTL_HOURS),
        }
    }

    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        now >= self.expires_at
    }
}
