use roster_manager_lib::application::dto::{DashboardDto, MonthlyScheduleDto};

pub fn show_monthly_schedule_debug_data(schedule: &MonthlyScheduleDto) {
    println!("\n=======================================================");
    println!(
        "🗓️ [DEBUG] {} の予定 ({} 〜 {}, 計 {} 日)",
        schedule.month,
        schedule.window_start,
        schedule.window_end,
        schedule.days.len()
    );
    println!("=======================================================");

    for day in &schedule.days {
        let label = if day.is_today { " (今日)" } else { "" };
        println!("📅 {}{} ------------------------------------", day.date, label);

        if day.entries.is_empty() {
            println!("   (予定なし)");
        }
        for entry in &day.entries {
            println!("   ┣ {:<10} : {}", entry.shift_type, entry.engineer_name);
        }
    }
    println!("=======================================================\n");
}

pub fn show_dashboard_debug_data(dashboard: &DashboardDto) {
    let duty = &dashboard.on_duty;
    println!("\n=======================================================");
    println!(
        "👷 [DEBUG] {} {} 現在のシフト: {}",
        duty.date,
        duty.time,
        duty.current_shift.as_deref().unwrap_or("(なし)")
    );
    for entry in &duty.engineers {
        println!("   ┣ {}", entry.engineer_name);
    }
    println!("=======================================================");
    show_monthly_schedule_debug_data(&dashboard.schedule);
}
