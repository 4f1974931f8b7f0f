use roster_features::ShiftCatalog;
use roster_manager_lib::application::dto::{MonthlyScheduleDto, OnDutyDto};

pub fn print_on_duty(duty: &OnDutyDto) {
    match &duty.current_shift {
        Some(shift) => println!("{} {}  現在のシフト: {}", duty.date, duty.time, shift),
        None => println!("{} {}  現在のシフト: (なし)", duty.date, duty.time),
    }

    if duty.engineers.is_empty() {
        println!("  勤務中の担当者はいません");
    }
    for entry in &duty.engineers {
        println!("  - {}", entry.engineer_name);
    }
}

pub fn print_schedule(schedule: &MonthlyScheduleDto) {
    println!(
        "{} の予定 ({} 〜 {})",
        schedule.month, schedule.window_start, schedule.window_end
    );

    if schedule.days.is_empty() {
        println!("  (予定なし)");
    }
    for day in &schedule.days {
        let label = if day.is_today { " 今日" } else { "" };
        println!("{}{}", day.date.format("%Y-%m-%d (%a)"), label);
        if day.entries.is_empty() {
            println!("    (全員休み)");
        }
        for entry in &day.entries {
            println!("    {:<12} {}", entry.shift_type, entry.engineer_name);
        }
    }
}

pub fn print_shift_times(catalog: &ShiftCatalog) {
    for window in catalog.windows() {
        let note = if window.wraps_midnight() { "  (日付またぎ)" } else { "" };
        println!("  {:<10} {} - {}{}", window.name, window.start, window.end, note);
    }
}
