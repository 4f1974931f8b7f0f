use thiserror::Error;

/// ドメイン値の検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("invalid time of day `{0}` (expected HH:MM)")]
    InvalidTime(String),

    #[error("shift `{0}` has the same start and end time")]
    EmptyWindow(String),

    #[error("shift name must not be empty")]
    EmptyShiftName,

    #[error("shift `{0}` is defined more than once")]
    DuplicateShift(String),

    #[error("invalid month {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },

    #[error("engineer name must not be empty (date {0})")]
    EmptyEngineerName(String),
}
