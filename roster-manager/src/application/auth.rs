use chrono::NaiveDateTime;

use crate::domain::session_model::SessionToken;
use crate::error::{Result, RosterError};
use crate::AppServices;

/// パスワードを確認してトークンを発行する
pub async fn login(password: &str, now: NaiveDateTime, services: &AppServices) -> Result<SessionToken> {
    let settings = services.settings.load().await?;
    if !settings.admin_password.verify(password) {
        log::warn!("login rejected: password mismatch");
        return Err(RosterError::Auth("wrong password".to_string()));
    }

    services.sessions.purge_expired(now).await?;
    let session = SessionToken::issue(now);
    services.sessions.insert(&session).await?;
    log::info!("issued session valid until {}", session.expires_at);
    Ok(session)
}

/// 変更系コマンドの前に呼ぶ
pub async fn authorize(token: &str, now: NaiveDateTime, services: &AppServices) -> Result<()> {
    match services.sessions.find(token).await? {
        Some(session) if !session.is_expired(now) => Ok(()),
        Some(_) => {
            services.sessions.delete(token).await?;
            Err(RosterError::Auth("session expired".to_string()))
        }
        None => Err(RosterError::Auth("unknown session token".to_string())),
    }
}

pub async fn logout(token: &str, services: &AppServices) -> Result<()> {
    services.sessions.delete(token).await?;
    Ok(())
}
