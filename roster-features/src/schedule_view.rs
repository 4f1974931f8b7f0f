use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::calendar::YearMonth;
use crate::roster_entry::RosterEntry;
use crate::shift_sequence::{is_off, sequence_position};

/// 月表示で見せる期間 (両端を含む)
///
/// 今月なら今日から月末まで、それ以外の月は1日から月末まで
pub fn visible_window(month: YearMonth, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let lower = if month.contains(today) {
        today
    } else {
        month.first_day()
    };
    (lower, month.last_day())
}

/// 日付ごとにまとめる (同じ日の中は入力順のまま)
pub fn group_by_date<I>(entries: I) -> BTreeMap<NaiveDate, Vec<RosterEntry>>
where
    I: IntoIterator<Item = RosterEntry>,
{
    let mut groups: BTreeMap<NaiveDate, Vec<RosterEntry>> = BTreeMap::new();
    for entry in entries {
        groups.entry(entry.date).or_default().push(entry);
    }
    groups
}

/// その日のこれからの勤務
///
/// 1. 休み ("off" を含む / 空) を除く
/// 2. 今日なら、現在のシフト以前 (並び位置が同じか前) を除く
/// 3. 並び位置の昇順 (一致しないものは最後、元の順を保つ)
pub fn upcoming_for_day(
    day_entries: &[RosterEntry],
    is_today: bool,
    current_shift: Option<&str>,
) -> Vec<RosterEntry> {
    let current_position = current_shift.filter(|_| is_today).map(sequence_position);

    let mut upcoming: Vec<RosterEntry> = day_entries
        .iter()
        .filter(|e| !is_off(&e.shift_type))
        .filter(|e| match current_position {
            Some(current) => sequence_position(&e.shift_type) > current,
            None => true,
        })
        .cloned()
        .collect();

    // sort_by_key は安定ソート
    upcoming.sort_by_key(|e| sequence_position(&e.shift_type));
    upcoming
}

/// 1日分の表示データ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub is_today: bool,
    pub entries: Vec<RosterEntry>,
}

/// 月表示の予定一覧を組み立てる
///
/// 今日の分が空になった場合はその日ごと表示しない。
/// 他の日は、当番表に行がある限り (全員休みでも) 残す
pub fn build_schedule(
    entries: &[RosterEntry],
    month: YearMonth,
    today: NaiveDate,
    current_shift: Option<&str>,
) -> Vec<DaySchedule> {
    let (lower, upper) = visible_window(month, today);

    let in_window = entries
        .iter()
        .filter(|e| lower <= e.date && e.date <= upper)
        .cloned();

    group_by_date(in_window)
        .into_iter()
        .filter_map(|(date, day_entries)| {
            let is_today = date == today;
            let upcoming = upcoming_for_day(&day_entries, is_today, current_shift);
            if is_today && upcoming.is_empty() {
                return None;
            }
            Some(DaySchedule { date, is_today, entries: upcoming })
        })
        .collect()
}

#[cfg(test)]
mod schedule_view_tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn entry(d: &str, name: &str, shift: &str) -> RosterEntry {
        RosterEntry::new(date(d), name, shift).unwrap()
    }

    #[test]
    fn test_visible_window_current_month_starts_today() {
        let feb = YearMonth::new(2026, 2).unwrap();
        assert_eq!(
            visible_window(feb, date("2026-02-10")),
            (date("2026-02-10"), date("2026-02-28"))
        );
    }

    #[test]
    fn test_visible_window_other_months() {
        let today = date("2026-02-10");
        let mar = YearMonth::new(2026, 3).unwrap();
        assert_eq!(visible_window(mar, today), (date("2026-03-01"), date("2026-03-31")));

        let jan = YearMonth::new(2026, 1).unwrap();
        assert_eq!(visible_window(jan, today), (date("2026-01-01"), date("2026-01-31")));

        let dec = YearMonth::new(2026, 12).unwrap();
        assert_eq!(visible_window(dec, today), (date("2026-12-01"), date("2026-12-31")));
    }

    #[test]
    fn test_group_by_date_keeps_input_order() {
        let groups = group_by_date(vec![
            entry("2026-02-02", "B", "Night"),
            entry("2026-02-01", "A", "Evening"),
            entry("2026-02-02", "C", "Morning"),
        ]);
        assert_eq!(groups.len(), 2);
        let names: Vec<_> = groups[&date("2026-02-02")]
            .iter()
            .map(|e| e.engineer_name.as_str())
            .collect();
        assert_eq!(names, vec!["B", "C"]);
    }

    #[test]
    fn test_upcoming_today_hides_current_and_off() {
        let day = vec![
            entry("2026-02-10", "A", "Morning"),
            entry("2026-02-10", "B", "Evening"),
            entry("2026-02-10", "C", "Off"),
        ];
        let result = upcoming_for_day(&day, true, Some("Morning"));
        assert_eq!(result, vec![entry("2026-02-10", "B", "Evening")]);
    }

    #[test]
    fn test_upcoming_other_day_sorted_by_sequence() {
        let day = vec![
            entry("2026-02-11", "L", "Annual Leave"),
            entry("2026-02-11", "N", "Night"),
            entry("2026-02-11", "M", "Morning"),
            entry("2026-02-11", "X", ""),
            entry("2026-02-11", "T", "Training"),
            entry("2026-02-11", "E", "Evening"),
        ];
        let names: Vec<_> = upcoming_for_day(&day, false, Some("Night"))
            .into_iter()
            .map(|e| e.engineer_name)
            .collect();
        assert_eq!(names, vec!["M", "E", "N", "L", "T"]);
    }

    #[test]
    fn test_upcoming_today_during_night_leaves_only_unmatched() {
        let day = vec![
            entry("2026-02-10", "A", "Morning"),
            entry("2026-02-10", "N", "Night"),
            entry("2026-02-10", "L", "Leave"),
        ];
        let result = upcoming_for_day(&day, true, Some("Night"));
        assert_eq!(result, vec![entry("2026-02-10", "L", "Leave")]);
    }

    #[test]
    fn test_upcoming_today_without_current_shift() {
        let day = vec![
            entry("2026-02-10", "B", "Evening"),
            entry("2026-02-10", "A", "Morning"),
        ];
        let names: Vec<_> = upcoming_for_day(&day, true, None)
            .into_iter()
            .map(|e| e.engineer_name)
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_build_schedule_suppresses_empty_today() {
        let entries = vec![
            entry("2026-02-09", "P", "Morning"), // 過去日は表示しない
            entry("2026-02-10", "A", "Morning"),
            entry("2026-02-11", "B", "Off"),
            entry("2026-02-12", "C", "Night"),
            entry("2026-03-01", "D", "Morning"), // 翌月
        ];
        let feb = YearMonth::new(2026, 2).unwrap();
        let schedule = build_schedule(&entries, feb, date("2026-02-10"), Some("Morning"));

        let dates: Vec<_> = schedule.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![date("2026-02-11"), date("2026-02-12")]);
        assert!(schedule[0].entries.is_empty());
        assert!(!schedule[0].is_today);
        assert_eq!(schedule[1].entries[0].engineer_name, "C");
    }

    #[test]
    fn test_build_schedule_keeps_today_with_upcoming() {
        let entries = vec![
            entry("2026-02-10", "A", "Morning"),
            entry("2026-02-10", "B", "Evening"),
        ];
        let feb = YearMonth::new(2026, 2).unwrap();
        let schedule = build_schedule(&entries, feb, date("2026-02-10"), Some("Morning"));
        assert_eq!(schedule.len(), 1);
        assert!(schedule[0].is_today);
        assert_eq!(schedule[0].entries, vec![entry("2026-02-10", "B", "Evening")]);
    }
}
