use roster_features::ShiftCatalog;
use sqlx::SqlitePool;

use crate::domain::settings_model::*;
use crate::error::{Result, RosterError};

pub struct SettingsRepository {
    pool: SqlitePool,
}

/// initialize_defaults で行ったこと
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub seeded_shift_times: bool,
    pub seeded_admin_password: bool,
    pub migrated_shift_times: bool,
    pub migrated_admin_password: bool,
}

impl SettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // =================================================================
    // 1. Key-Value 操作
    // =================================================================

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT (key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    // =================================================================
    // 2. 初期化 (起動時に1回)
    // =================================================================

    /// 無い設定に初期値を入れ、古い形式の設定を現在の形式に書き換える
    pub async fn initialize_defaults(&self) -> Result<InitReport> {
        let mut report = InitReport::default();

        // --- shift_times ---
        match self.get(KEY_SHIFT_TIMES).await? {
            None => {
                self.save_shift_times(&ShiftCatalog::defaults()).await?;
                report.seeded_shift_times = true;
            }
            Some(raw) => {
                let (catalog, version) = decode_shift_times(&raw)?;
                if version < SETTINGS_VERSION {
                    self.save_shift_times(&catalog).await?;
                    report.migrated_shift_times = true;
                }
            }
        }

        // --- admin_password ---
        match self.get(KEY_ADMIN_PASSWORD).await? {
            None => {
                self.save_admin_password(&PasswordHash::new(DEFAULT_ADMIN_PASSWORD)).await?;
                report.seeded_admin_password = true;
            }
            Some(raw) => {
                if let StoredPassword::Legacy(plain) = decode_password(&raw)? {
                    self.save_admin_password(&PasswordHash::new(&plain)).await?;
                    report.migrated_admin_password = true;
                }
            }
        }

        self.set(KEY_SETTINGS_VERSION, &SETTINGS_VERSION.to_string()).await?;

        if report.seeded_shift_times || report.seeded_admin_password {
            log::info!("seeded default settings: {:?}", report);
        }
        if report.migrated_shift_times || report.migrated_admin_password {
            log::info!("migrated settings to version {}", SETTINGS_VERSION);
        }
        Ok(report)
    }

    // =================================================================
    // 3. 型付きの読み書き
    // =================================================================

    pub async fn load(&self) -> Result<AppSettings> {
        let version = match self.get(KEY_SETTINGS_VERSION).await? {
            Some(v) => v
                .parse::<u32>()
                .map_err(|e| RosterError::Corrupt(format!("{}: {}", KEY_SETTINGS_VERSION, e)))?,
            None => 1,
        };
        let shift_times = self.load_shift_times().await?;

        let raw_password = self
            .get(KEY_ADMIN_PASSWORD)
            .await?
            .ok_or_else(|| RosterError::Corrupt(format!("{} is not set", KEY_ADMIN_PASSWORD)))?;
        let admin_password = match decode_password(&raw_password)? {
            StoredPassword::Hashed(hash) => hash,
            StoredPassword::Legacy(_) => {
                return Err(RosterError::Corrupt(format!(
                    "{} has not been migrated",
                    KEY_ADMIN_PASSWORD
                )))
            }
        };

        Ok(AppSettings { version, shift_times, admin_password })
    }

    pub async fn load_shift_times(&self) -> Result<ShiftCatalog> {
        let raw = self
            .get(KEY_SHIFT_TIMES)
            .await?
            .ok_or_else(|| RosterError::Corrupt(format!("{} is not set", KEY_SHIFT_TIMES)))?;
        let (catalog, _) = decode_shift_times(&raw)?;
        Ok(catalog)
    }

    /// シフト時間帯を丸ごと置き換える
    pub async fn save_shift_times(&self, catalog: &ShiftCatalog) -> Result<()> {
        self.set(KEY_SHIFT_TIMES, &encode_shift_times(catalog)?).await
    }

    pub async fn save_admin_password(&self, hash: &PasswordHash) -> Result<()> {
        self.set(KEY_ADMIN_PASSWORD, &encode_password(hash)?).await
    }
}
