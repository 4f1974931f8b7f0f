// =====================
// 当番表の一括登録データ
// =====================
//
// 抽出サービスの出力も画面からの入力も、ここを通してから保存する

use roster_features::RosterEntry;
use serde_json::Value;

use crate::error::{Result, RosterError};

/// JSON 値を当番表の行に変換する
///
/// 配列でなければ拒否。1件でも不正な要素があればバッチ全体を拒否する
pub fn parse_roster_batch(value: Value) -> Result<Vec<RosterEntry>> {
    let Value::Array(items) = value else {
        return Err(RosterError::Validation(
            "roster batch must be a JSON array".to_string(),
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let entry: RosterEntry = serde_json::from_value(item)
                .map_err(|e| RosterError::Validation(format!("entry #{}: {}", index, e)))?;
            entry
                .normalized()
                .map_err(|e| RosterError::Validation(format!("entry #{}: {}", index, e)))
        })
        .collect()
}

/// 抽出サービスの出力 (文字列) を読み込む
///
/// コードフェンス (`` ```json ``) で囲まれていても受け付ける。JSON として読めなければ Extraction エラー
pub fn decode_extraction_output(raw: &str) -> Result<Vec<RosterEntry>> {
    let body = strip_code_fence(raw);
    let value: Value =
        serde_json::from_str(body).map_err(|e| RosterError::Extraction(e.to_string()))?;
    parse_roster_batch(value)
}

/// 最初のコードフェンスの中身を取り出す。フェンスが無ければ全体
///
/// 前置きの文章や、1行に収まったフェンスも受け付ける
fn strip_code_fence(raw: &str) -> &str {
    const FENCE: &str = "```";

    let trimmed = raw.trim();
    let Some(start) = trimmed.find(FENCE) else {
        return trimmed;
    };
    // 言語タグ (json など) を捨てる
    let rest = trimmed[start + FENCE.len()..].trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    let body = match rest.find(FENCE) {
        Some(end) => &rest[..end],
        None => rest,
    };
    body.trim()
}
