pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;

use sqlx::SqlitePool;

use error::Result;
use infrastructure::database::{self, DatabaseOptions};
use infrastructure::roster_repo::RosterRepository;
use infrastructure::session_repo::SessionRepository;
use infrastructure::settings_repo::SettingsRepository;

// 全てのリポジトリを保持するコンテナ
pub struct AppServices {
    pub roster: RosterRepository,
    pub settings: SettingsRepository,
    pub sessions: SessionRepository,
}

impl AppServices {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            // poolは内部で参照カウントされているのでcloneしても低コスト
            roster: RosterRepository::new(pool.clone()),
            settings: SettingsRepository::new(pool.clone()),
            sessions: SessionRepository::new(pool),
        }
    }

    /// 起動処理: DB 接続 → マイグレーション → 設定の初期値投入
    pub async fn bootstrap(options: &DatabaseOptions) -> Result<Self> {
        let pool = database::connect(options).await?;
        Self::from_pool(pool).await
    }

    /// 接続済みの pool から組み立てる (テストではメモリ DB を渡す)
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        database::ensure_ready(&pool).await?;
        let services = Self::new(pool);
        services.settings.initialize_defaults().await?;
        Ok(services)
    }
}
