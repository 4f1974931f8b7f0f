use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// 年月 (month は 1 〜 12)
///
/// 生成時に月初と月末を計算して保持するので、以降の参照は失敗しない
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "YearMonthRepr", into = "YearMonthRepr")]
pub struct YearMonth {
    first: NaiveDate,
    last: NaiveDate,
}

#[derive(Serialize, Deserialize)]
struct YearMonthRepr {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, DomainError> {
        let invalid = || DomainError::InvalidMonth { year, month };

        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;

        // 月末 = 翌月の1日の前日
        // month が 12 の場合は翌年の1月
        let next_month_first = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(invalid)?;

        let last = next_month_first.pred_opt().ok_or_else(invalid)?;

        Ok(Self { first, last })
    }

    /// 指定日を含む月
    pub fn of(date: NaiveDate) -> Self {
        let first = date.with_day(1).unwrap_or(date);
        Self::new(first.year(), first.month()).unwrap_or(Self { first, last: date })
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        self.last
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first <= date && date <= self.last
    }

    /// 翌月 (カレンダーの「次へ」ボタン用)
    pub fn next(&self) -> Option<Self> {
        self.last.succ_opt().map(Self::of)
    }

    /// 前月
    pub fn prev(&self) -> Option<Self> {
        self.first.pred_opt().map(Self::of)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = DomainError;

    /// "YYYY-MM"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidMonth { year: 0, month: 0 };
        let (y, m) = s.split_once('-').ok_or_else(invalid)?;
        let year = y.trim().parse::<i32>().map_err(|_| invalid())?;
        let month = m.trim().parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

impl TryFrom<YearMonthRepr> for YearMonth {
    type Error = DomainError;

    fn try_from(repr: YearMonthRepr) -> Result<Self, Self::Error> {
        Self::new(repr.year, repr.month)
    }
}

impl From<YearMonth> for YearMonthRepr {
    fn from(ym: YearMonth) -> Self {
        Self { year: ym.year(), month: ym.month() }
    }
}
