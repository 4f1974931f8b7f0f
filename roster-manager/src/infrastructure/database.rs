use std::fs;
use std::path::PathBuf;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

use crate::error::Result;

/// DB 接続設定
#[derive(Debug, Clone)]
pub struct DatabaseOptions {
    pub path: PathBuf,
    pub max_connections: u32,
}

impl DatabaseOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), max_connections: 5 }
    }
}

/// DB を開いてマイグレーションまで済ませる
///
/// 起動時に1回だけ呼び、返ってきた pool を各リポジトリに渡す
pub async fn connect(options: &DatabaseOptions) -> Result<SqlitePool> {
    // --- ディレクトリ作成（冪等） ---
    if let Some(parent) = options.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    log::info!("Using DB at: {}", options.path.display());

    let connect_options = SqliteConnectOptions::new()
        .filename(&options.path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(options.max_connections)
        .connect_with(connect_options)
        .await?;

    ensure_ready(&pool).await?;
    Ok(pool)
}

/// メモリ上の DB (接続は1本のみ。複数あると別々の DB になる)
pub async fn connect_in_memory() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    ensure_ready(&pool).await?;
    Ok(pool)
}

/// マイグレーションを適用する。適用済みなら何もしない
pub async fn ensure_ready(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    log::debug!("database migrations are up to date");
    Ok(())
}
