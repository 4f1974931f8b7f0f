//! Error types for roster commands
//!
//! Every command returns `Result<_, RosterError>`. Only store failures are
//! worth retrying; a roster batch is idempotent, so callers resend it whole.

use roster_features::DomainError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    /// 入力不正 (バッチは適用されない)
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 外部の抽出サービスの出力が JSON として読めない
    #[error("Extraction output rejected: {0}")]
    Extraction(String),

    #[error("Stored data is corrupt: {0}")]
    Corrupt(String),
}

pub type Result<T> = std::result::Result<T, RosterError>;

impl From<DomainError> for RosterError {
    fn from(err: DomainError) -> Self {
        RosterError::Validation(err.to_string())
    }
}

impl RosterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RosterError::Validation(_) => ErrorKind::Validation,
            RosterError::Auth(_) => ErrorKind::Auth,
            RosterError::Store(_) | RosterError::Migration(_) | RosterError::Io(_) => ErrorKind::Store,
            RosterError::Corrupt(_) => ErrorKind::Store,
            RosterError::Extraction(_) => ErrorKind::Extraction,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, RosterError::Store(_) | RosterError::Io(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Validation,
    Auth,
    Store,
    Extraction,
}

/// Serializable error representation for the presentation layer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
    pub message: String,
    pub kind: ErrorKind,
    pub can_retry: bool,
}

impl From<&RosterError> for CommandError {
    fn from(err: &RosterError) -> Self {
        CommandError {
            message: err.to_string(),
            kind: err.kind(),
            can_retry: err.is_retryable(),
        }
    }
}
