// =====================
// 設定のドメインモデル
// =====================

use roster_features::{ClockTime, ShiftCatalog, ShiftWindow};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::error::{Result, RosterError};

/// settings テーブルのキー
pub const KEY_ADMIN_PASSWORD: &str = "admin_password";
pub const KEY_SHIFT_TIMES: &str = "shift_times";
pub const KEY_SETTINGS_VERSION: &str = "settings_version";

/// 現在のスキーマ
///
/// - v1: shift_times は `{"Morning": {"start": "08:00", "end": "16:00"}, ...}`、パスワードは平文
/// - v2: shift_times は `[{"name": "Morning", "start": "08:00", "end": "16:00"}, ...]`、パスワードはハッシュ
pub const SETTINGS_VERSION: u32 = 2;

pub const DEFAULT_ADMIN_PASSWORD: &str = "admin";

/// 型付きの設定一式
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub version: u32,
    pub shift_times: ShiftCatalog,
    pub admin_password: PasswordHash,
}

// =====================
// パスワード
// =====================

const HASH_SCHEME: &str = "sha256";

/// ソルト付き SHA-256 (`sha256$<salt>$<hex>`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash {
    salt: String,
    digest: String,
}

impl PasswordHash {
    pub fn new(password: &str) -> Self {
        let salt = Uuid::new_v4().simple().to_string();
        let digest = hex::encode(Self::digest(&salt, password));
        Self { salt, digest }
    }

    fn digest(salt: &str, password: &str) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(b":");
        hasher.update(password.as_bytes());
        hasher.finalize().to_vec()
    }

    /// 定数時間で比較する
    pub fn verify(&self, candidate: &str) -> bool {
        let Ok(stored) = hex::decode(&self.digest) else {
            return false;
        };
        Self::digest(&self.salt, candidate).ct_eq(&stored).into()
    }

    pub fn encode(&self) -> String {
        format!("{}${}${}", HASH_SCHEME, self.salt, self.digest)
    }

    /// ハッシュ形式でなければ None (v1 の平文)
    pub fn decode(encoded: &str) -> Option<Self> {
        let mut parts = encoded.splitn(3, '$');
        let scheme = parts.next()?;
        let salt = parts.next()?;
        let digest = parts.next()?;
        if scheme != HASH_SCHEME || salt.is_empty() || digest.len() != 64 {
            return None;
        }
        Some(Self { salt: salt.to_string(), digest: digest.to_string() })
    }
}

/// 保存されていたパスワード値
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredPassword {
    Hashed(PasswordHash),
    /// v1 の平文。initialize_defaults でハッシュに置き換える
    Legacy(String),
}

pub fn encode_password(hash: &PasswordHash) -> Result<String> {
    serde_json::to_string(&hash.encode()).map_err(|e| RosterError::Corrupt(e.to_string()))
}

pub fn decode_password(raw: &str) -> Result<StoredPassword> {
    let value: String = serde_json::from_str(raw)
        .map_err(|e| RosterError::Corrupt(format!("{}: {}", KEY_ADMIN_PASSWORD, e)))?;
    Ok(match PasswordHash::decode(&value) {
        Some(hash) => StoredPassword::Hashed(hash),
        None => StoredPassword::Legacy(value),
    })
}

// =====================
// シフト時間帯
// =====================

#[derive(Deserialize)]
struct LegacyWindow {
    start: ClockTime,
    end: ClockTime,
}

pub fn encode_shift_times(catalog: &ShiftCatalog) -> Result<String> {
    serde_json::to_string(catalog).map_err(|e| RosterError::Corrupt(e.to_string()))
}

/// shift_times を読み込む。戻り値の2つ目は読み込んだ形式のバージョン
pub fn decode_shift_times(raw: &str) -> Result<(ShiftCatalog, u32)> {
    let corrupt = |e: &dyn std::fmt::Display| RosterError::Corrupt(format!("{}: {}", KEY_SHIFT_TIMES, e));

    let value: Value = serde_json::from_str(raw).map_err(|e| corrupt(&e))?;
    match value {
        Value::Array(_) => {
            let catalog: ShiftCatalog = serde_json::from_value(value).map_err(|e| corrupt(&e))?;
            Ok((catalog, SETTINGS_VERSION))
        }
        // v1: キーの順番が登録順 (preserve_order)
        Value::Object(map) => {
            let mut windows = Vec::with_capacity(map.len());
            for (name, window) in map {
                let legacy: LegacyWindow = serde_json::from_value(window).map_err(|e| corrupt(&e))?;
                windows.push(ShiftWindow::new(&name, legacy.start, legacy.end).map_err(|e| corrupt(&e))?);
            }
            let catalog = ShiftCatalog::new(windows).map_err(|e| corrupt(&e))?;
            Ok((catalog, 1))
        }
        other => Err(corrupt(&format!("unexpected JSON value {}", other))),
    }
}

/// 画面に返す設定 (パスワードは含めない)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsView {
    pub version: u32,
    pub shift_times: ShiftCatalog,
}

impl From<&AppSettings> for SettingsView {
    fn from(settings: &AppSettings) -> Self {
        Self { version: settings.version, shift_times: settings.shift_times.clone() }
    }
}
