/// 表示順の基準になるシフト名 (実際の時間帯とは独立)
pub const SHIFT_SEQUENCE: [&str; 3] = ["Morning", "Evening", "Night"];

/// どのシフト名にも一致しない勤務種別 (休暇など) の並び位置
pub const UNMATCHED_POSITION: usize = 99;

/// 勤務種別の並び位置
///
/// 大文字小文字を無視した部分一致で、`SHIFT_SEQUENCE` の先頭から最初に一致したものを採用する。
/// "Morning+Evening" のような複合表記は Morning として扱われる
pub fn sequence_position(shift_type: &str) -> usize {
    let lowered = shift_type.to_lowercase();
    SHIFT_SEQUENCE
        .iter()
        .position(|name| lowered.contains(&name.to_lowercase()))
        .unwrap_or(UNMATCHED_POSITION)
}

/// 休み扱い ("Off" を含む、または空)
pub fn is_off(shift_type: &str) -> bool {
    let trimmed = shift_type.trim();
    trimmed.is_empty() || trimmed.to_lowercase().contains("off")
}
