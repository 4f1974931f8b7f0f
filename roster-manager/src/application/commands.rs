use chrono::NaiveDateTime;
use roster_features::{
    duty_resolver::{current_shift, on_duty},
    schedule_view::{build_schedule, visible_window},
    ClockTime, RosterEntry, ShiftCatalog, ShiftWindow, YearMonth,
};
use serde_json::Value;

use crate::application::auth;
use crate::application::dto::{ConfirmResult, DashboardDto, MonthlyScheduleDto, OnDutyDto};
use crate::domain::roster_batch::{decode_extraction_output, parse_roster_batch};
use crate::domain::session_model::SessionToken;
use crate::domain::settings_model::{PasswordHash, SettingsView};
use crate::error::{Result, RosterError};
use crate::AppServices;

// --- Auth ---

pub async fn login(password: &str, now: NaiveDateTime, services: &AppServices) -> Result<SessionToken> {
    auth::login(password, now, services).await
}

pub async fn logout(token: &str, services: &AppServices) -> Result<()> {
    auth::logout(token, services).await
}

// --- Roster ---

/// 抽出サービスの出力をそのまま受け取って確定する
pub async fn confirm_roster(
    token: &str,
    raw_extraction: &str,
    now: NaiveDateTime,
    services: &AppServices,
) -> Result<ConfirmResult> {
    auth::authorize(token, now, services).await?;
    let entries = decode_extraction_output(raw_extraction).inspect_err(|e| {
        log::warn!("extraction output rejected: {}", e);
    })?;
    apply_batch(&entries, services).await
}

/// 画面で編集済みの JSON を確定する
pub async fn confirm_entries(
    token: &str,
    batch: Value,
    now: NaiveDateTime,
    services: &AppServices,
) -> Result<ConfirmResult> {
    auth::authorize(token, now, services).await?;
    let entries = parse_roster_batch(batch).inspect_err(|e| {
        log::warn!("roster batch rejected: {}", e);
    })?;
    apply_batch(&entries, services).await
}

async fn apply_batch(entries: &[RosterEntry], services: &AppServices) -> Result<ConfirmResult> {
    let applied = services.roster.upsert_batch(entries).await?;
    log::info!("confirmed roster batch of {} entries", applied);
    Ok(ConfirmResult { applied })
}

// --- Duty / Schedule ---

pub async fn get_on_duty(now: NaiveDateTime, services: &AppServices) -> Result<OnDutyDto> {
    let catalog = services.settings.load_shift_times().await?;
    let today = services.roster.find_by_date(now.date()).await?;
    Ok(on_duty_dto(now, &catalog, &today))
}

/// month が None なら今月
pub async fn get_schedule(
    now: NaiveDateTime,
    month: Option<YearMonth>,
    services: &AppServices,
) -> Result<MonthlyScheduleDto> {
    let catalog = services.settings.load_shift_times().await?;
    schedule_dto(now, month, &catalog, services).await
}

pub async fn get_dashboard(
    now: NaiveDateTime,
    month: Option<YearMonth>,
    services: &AppServices,
) -> Result<DashboardDto> {
    // 同じ時間帯定義で両方を計算する
    let catalog = services.settings.load_shift_times().await?;
    let today = services.roster.find_by_date(now.date()).await?;

    Ok(DashboardDto {
        on_duty: on_duty_dto(now, &catalog, &today),
        schedule: schedule_dto(now, month, &catalog, services).await?,
    })
}

fn on_duty_dto(now: NaiveDateTime, catalog: &ShiftCatalog, today: &[RosterEntry]) -> OnDutyDto {
    OnDutyDto {
        date: now.date(),
        time: ClockTime::from_time(now.time()),
        current_shift: current_shift(now, catalog).map(str::to_string),
        engineers: on_duty(now, today, catalog),
    }
}

async fn schedule_dto(
    now: NaiveDateTime,
    month: Option<YearMonth>,
    catalog: &ShiftCatalog,
    services: &AppServices,
) -> Result<MonthlyScheduleDto> {
    let today = now.date();
    let month = month.unwrap_or_else(|| YearMonth::of(today));
    let (window_start, window_end) = visible_window(month, today);

    let entries = services.roster.find_range(window_start, window_end).await?;
    let days = build_schedule(&entries, month, today, current_shift(now, catalog));

    Ok(MonthlyScheduleDto {
        month,
        window_start,
        window_end,
        prev_month: month.prev(),
        next_month: month.next(),
        days,
    })
}

// --- Settings ---

pub async fn get_settings_view(services: &AppServices) -> Result<SettingsView> {
    let settings = services.settings.load().await?;
    Ok(SettingsView::from(&settings))
}

/// シフト時間帯を丸ごと置き換える
pub async fn set_shift_times(
    token: &str,
    windows: Vec<ShiftWindow>,
    now: NaiveDateTime,
    services: &AppServices,
) -> Result<ShiftCatalog> {
    auth::authorize(token, now, services).await?;
    if windows.is_empty() {
        return Err(RosterError::Validation("at least one shift is required".to_string()));
    }
    let catalog = ShiftCatalog::new(windows)?;
    services.settings.save_shift_times(&catalog).await?;
    log::info!("shift times replaced ({} shifts)", catalog.windows().len());
    Ok(catalog)
}

/// 管理者パスワードを変更する。既存のセッションはすべて無効になる
pub async fn set_admin_password(
    token: &str,
    new_password: &str,
    now: NaiveDateTime,
    services: &AppServices,
) -> Result<()> {
    auth::authorize(token, now, services).await?;
    if new_password.trim().is_empty() {
        return Err(RosterError::Validation("password must not be empty".to_string()));
    }
    services.settings.save_admin_password(&PasswordHash::new(new_password)).await?;
    let revoked = services.sessions.delete_all().await?;
    log::info!("admin password changed, {} sessions revoked", revoked);
    Ok(())
}
