use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DomainError;

// =====================
// 時刻 (HH:MM)
// =====================

/// 分単位の時刻
///
/// 2桁固定の "HH:MM" のみ受け付けるので、文字列の辞書順と大小関係が一致する
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// 秒以下を切り捨てて分単位にする
    pub fn from_time(time: NaiveTime) -> Self {
        Self(
            time.with_second(0)
                .and_then(|t| t.with_nanosecond(0))
                .unwrap_or(time),
        )
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let invalid = || DomainError::InvalidTime(s.to_string());
        let bytes = s.as_bytes();
        if bytes.len() != 5 || bytes[2] != b':' {
            return Err(invalid());
        }
        NaiveTime::parse_from_str(s, "%H:%M")
            .map(Self)
            .map_err(|_| invalid())
    }

    pub fn as_time(&self) -> NaiveTime {
        self.0
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0.hour(), self.0.minute())
    }
}

impl FromStr for ClockTime {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

// =====================
// シフト時間帯
// =====================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftWindow {
    pub name: String,
    pub start: ClockTime,
    pub end: ClockTime,
}

impl ShiftWindow {
    pub fn new(name: &str, start: ClockTime, end: ClockTime) -> Result<Self, DomainError> {
        let window = Self { name: name.trim().to_string(), start, end };
        window.validate()?;
        Ok(window)
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::EmptyShiftName);
        }
        // 長さ0 / 24時間の窓は定義できない
        if self.start == self.end {
            return Err(DomainError::EmptyWindow(self.name.clone()));
        }
        Ok(())
    }

    /// 開始 > 終了 のとき日付をまたぐ (例: 22:00-06:00)
    pub fn wraps_midnight(&self) -> bool {
        self.start > self.end
    }

    /// 開始時刻は含み、終了時刻は含まない
    ///
    /// ```text
    ///  start <= end : start <= t < end
    ///  start >  end : t >= start || t < end
    /// ```
    pub fn contains(&self, t: ClockTime) -> bool {
        if self.wraps_midnight() {
            t >= self.start || t < self.end
        } else {
            self.start <= t && t < self.end
        }
    }
}

// =====================
// シフト定義の一覧
// =====================

/// 名前 -> 時間帯 の対応表
///
/// 登録順を保持する。時間帯が重なっている場合は先に登録された方が優先される
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ShiftWindow>", into = "Vec<ShiftWindow>")]
pub struct ShiftCatalog {
    windows: Vec<ShiftWindow>,
}

impl ShiftCatalog {
    pub fn new(windows: Vec<ShiftWindow>) -> Result<Self, DomainError> {
        // serde 経由の名前は trim されていない
        let windows: Vec<ShiftWindow> = windows
            .into_iter()
            .map(|w| ShiftWindow { name: w.name.trim().to_string(), ..w })
            .collect();

        let mut seen = HashSet::new();
        for window in &windows {
            window.validate()?;
            if !seen.insert(window.name.as_str()) {
                return Err(DomainError::DuplicateShift(window.name.clone()));
            }
        }
        Ok(Self { windows })
    }

    /// 初期値: Morning 08:00-16:00 / Evening 16:00-00:00 / Night 00:00-08:00
    pub fn defaults() -> Self {
        let at = |h| ClockTime(NaiveTime::MIN + chrono::Duration::hours(h));
        Self {
            windows: vec![
                ShiftWindow { name: "Morning".into(), start: at(8), end: at(16) },
                ShiftWindow { name: "Evening".into(), start: at(16), end: at(0) },
                ShiftWindow { name: "Night".into(), start: at(0), end: at(8) },
            ],
        }
    }

    /// 時刻を含む最初の時間帯
    pub fn resolve(&self, t: ClockTime) -> Option<&ShiftWindow> {
        self.windows.iter().find(|w| w.contains(t))
    }

    pub fn resolve_name(&self, t: ClockTime) -> Option<&str> {
        self.resolve(t).map(|w| w.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&ShiftWindow> {
        self.windows.iter().find(|w| w.name == name)
    }

    pub fn windows(&self) -> &[ShiftWindow] {
        &self.windows
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

impl TryFrom<Vec<ShiftWindow>> for ShiftCatalog {
    type Error = DomainError;

    fn try_from(windows: Vec<ShiftWindow>) -> Result<Self, Self::Error> {
        Self::new(windows)
    }
}

impl From<ShiftCatalog> for Vec<ShiftWindow> {
    fn from(catalog: ShiftCatalog) -> Self {
        catalog.windows
    }
}
