use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// 当番表の1行 (ある日のある担当者の勤務)
///
/// (date, engineer_name) の組は一意
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RosterEntry {
    pub date: NaiveDate,
    #[serde(alias = "engineerName")]
    pub engineer_name: String,
    #[serde(alias = "shiftType")]
    pub shift_type: String,
}

impl RosterEntry {
    pub fn new(date: NaiveDate, engineer_name: &str, shift_type: &str) -> Result<Self, DomainError> {
        let entry = Self {
            date,
            engineer_name: engineer_name.to_string(),
            shift_type: shift_type.to_string(),
        };
        entry.normalized()
    }

    /// 前後の空白を落とし、担当者名が空なら拒否する
    pub fn normalized(self) -> Result<Self, DomainError> {
        let engineer_name = self.engineer_name.trim().to_string();
        if engineer_name.is_empty() {
            return Err(DomainError::EmptyEngineerName(self.date.to_string()));
        }
        Ok(Self {
            date: self.date,
            engineer_name,
            shift_type: self.shift_type.trim().to_string(),
        })
    }

    pub fn key(&self) -> (NaiveDate, &str) {
        (self.date, self.engineer_name.as_str())
    }
}
