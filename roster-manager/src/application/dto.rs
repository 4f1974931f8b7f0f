use chrono::NaiveDate;
use roster_features::{schedule_view::DaySchedule, ClockTime, RosterEntry, YearMonth};
use serde::Serialize;

/// 今勤務中の担当者 (画面上部のカード)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnDutyDto {
    pub date: NaiveDate,
    pub time: ClockTime,
    // None = どの時間帯にも入っていない (休みとは別)
    pub current_shift: Option<String>,
    pub engineers: Vec<RosterEntry>,
}

/// 月表示の予定一覧
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyScheduleDto {
    pub month: YearMonth,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub prev_month: Option<YearMonth>,
    pub next_month: Option<YearMonth>,
    pub days: Vec<DaySchedule>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDto {
    pub on_duty: OnDutyDto,
    pub schedule: MonthlyScheduleDto,
}

/// 一括登録の結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmResult {
    pub applied: usize,
}
