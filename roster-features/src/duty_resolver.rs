use chrono::NaiveDateTime;

use crate::roster_entry::RosterEntry;
use crate::shift_catalog::{ClockTime, ShiftCatalog};

/// `now` の時刻が属するシフト名
pub fn current_shift(now: NaiveDateTime, catalog: &ShiftCatalog) -> Option<&str> {
    catalog.resolve_name(ClockTime::from_time(now.time()))
}

/// 今勤務中の担当者
///
/// 日付が今日で、勤務種別が現在のシフト名と完全一致するもの
pub fn on_duty(now: NaiveDateTime, roster: &[RosterEntry], catalog: &ShiftCatalog) -> Vec<RosterEntry> {
    let Some(shift) = current_shift(now, catalog) else {
        return Vec::new();
    };
    let today = now.date();

    roster
        .iter()
        .filter(|e| e.date == today && e.shift_type == shift)
        .cloned()
        .collect()
}

#[cfg(test)]
mod duty_resolver_tests {
    use super::*;
    use crate::shift_catalog::ShiftWindow;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0).unwrap()
    }

    fn entry(date: &str, name: &str, shift: &str) -> RosterEntry {
        RosterEntry::new(date.parse().unwrap(), name, shift).unwrap()
    }

    #[test]
    fn test_current_shift_defaults() {
        let catalog = ShiftCatalog::defaults();
        assert_eq!(current_shift(at(2026, 2, 10, 23, 0), &catalog), Some("Evening"));
        assert_eq!(current_shift(at(2026, 2, 10, 2, 0), &catalog), Some("Night"));
        assert_eq!(current_shift(at(2026, 2, 10, 9, 30), &catalog), Some("Morning"));
    }

    #[test]
    fn test_current_shift_wrapping_night() {
        let catalog = ShiftCatalog::new(vec![
            ShiftWindow::new("Day", "06:00".parse().unwrap(), "22:00".parse().unwrap()).unwrap(),
            ShiftWindow::new("Night", "22:00".parse().unwrap(), "06:00".parse().unwrap()).unwrap(),
        ])
        .unwrap();
        assert_eq!(current_shift(at(2026, 2, 10, 1, 0), &catalog), Some("Night"));
        assert_eq!(current_shift(at(2026, 2, 10, 22, 0), &catalog), Some("Night"));
        assert_eq!(current_shift(at(2026, 2, 10, 6, 0), &catalog), Some("Day"));
    }

    #[test]
    fn test_on_duty_filters_by_day_and_shift() {
        let catalog = ShiftCatalog::defaults();
        let roster = vec![
            entry("2026-02-10", "A", "Morning"),
            entry("2026-02-10", "B", "Evening"),
            entry("2026-02-10", "C", "Off"),
            entry("2026-02-11", "D", "Morning"),
            entry("2026-02-10", "E", "morning"), // 完全一致のみ
        ];

        let result = on_duty(at(2026, 2, 10, 9, 0), &roster, &catalog);
        assert_eq!(result, vec![entry("2026-02-10", "A", "Morning")]);
    }

    #[test]
    fn test_on_duty_without_active_shift() {
        let catalog = ShiftCatalog::new(vec![
            ShiftWindow::new("Day", "09:00".parse().unwrap(), "17:00".parse().unwrap()).unwrap(),
        ])
        .unwrap();
        let roster = vec![entry("2026-02-10", "A", "Day")];
        assert!(on_duty(at(2026, 2, 10, 20, 0), &roster, &catalog).is_empty());
    }
}
