use chrono::NaiveDate;
use roster_features::RosterEntry;
use sqlx::{FromRow, SqlitePool};

use crate::error::{Result, RosterError};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct RosterRepository {
    pool: SqlitePool,
}

// =====================
// DB読み込み用ヘルパー構造体
// =====================

#[derive(FromRow)]
struct RosterRow {
    date: String,
    engineer_name: String,
    shift_type: String,
}

impl TryFrom<RosterRow> for RosterEntry {
    type Error = RosterError;

    fn try_from(row: RosterRow) -> Result<Self> {
        let date = NaiveDate::parse_from_str(&row.date, DATE_FORMAT)
            .map_err(|e| RosterError::Corrupt(format!("roster date `{}`: {}", row.date, e)))?;
        Ok(RosterEntry {
            date,
            engineer_name: row.engineer_name,
            shift_type: row.shift_type,
        })
    }
}

fn collect_entries(rows: Vec<RosterRow>) -> Result<Vec<RosterEntry>> {
    rows.into_iter().map(RosterEntry::try_from).collect()
}

impl RosterRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// (date, engineer_name) が一致すれば shift_type を更新、無ければ追加
    ///
    /// バッチ全体を1つのトランザクションで書き込む。
    /// 同じバッチ内で同じキーが複数あれば後のものが残る
    pub async fn upsert_batch(&self, entries: &[RosterEntry]) -> Result<usize> {
        if entries.is_empty() {
            return Ok(0);
        }

        // 1. 書き込む前に全件を正規化する (1件でも不正ならバッチごと拒否)
        let entries = entries
            .iter()
            .cloned()
            .enumerate()
            .map(|(index, entry)| {
                entry
                    .normalized()
                    .map_err(|e| RosterError::Validation(format!("entry #{}: {}", index, e)))
            })
            .collect::<Result<Vec<_>>>()?;

        // 2. トランザクション開始
        let mut tx = self.pool.begin().await?;

        // 3. 1件ずつ upsert
        for entry in &entries {
            sqlx::query(
                "INSERT INTO roster (date, engineer_name, shift_type)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT (date, engineer_name)
                 DO UPDATE SET shift_type = excluded.shift_type",
            )
            .bind(entry.date.format(DATE_FORMAT).to_string())
            .bind(&entry.engineer_name)
            .bind(&entry.shift_type)
            .execute(&mut *tx)
            .await?;
        }

        // 4. トランザクションコミット
        tx.commit().await?;

        log::debug!("upserted {} roster entries", entries.len());
        Ok(entries.len())
    }

    pub async fn find_all(&self) -> Result<Vec<RosterEntry>> {
        let rows: Vec<RosterRow> = sqlx::query_as(
            "SELECT date, engineer_name, shift_type FROM roster ORDER BY date ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        collect_entries(rows)
    }

    pub async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<RosterEntry>> {
        let rows: Vec<RosterRow> = sqlx::query_as(
            "SELECT date, engineer_name, shift_type FROM roster WHERE date = ?1 ORDER BY id ASC",
        )
        .bind(date.format(DATE_FORMAT).to_string())
        .fetch_all(&self.pool)
        .await?;
        collect_entries(rows)
    }

    /// lower 〜 upper (両端を含む)
    pub async fn find_range(&self, lower: NaiveDate, upper: NaiveDate) -> Result<Vec<RosterEntry>> {
        // YYYY-MM-DD は文字列比較で日付順になる
        let rows: Vec<RosterRow> = sqlx::query_as(
            "SELECT date, engineer_name, shift_type FROM roster
             WHERE date BETWEEN ?1 AND ?2
             ORDER BY date ASC, id ASC",
        )
        .bind(lower.format(DATE_FORMAT).to_string())
        .bind(upper.format(DATE_FORMAT).to_string())
        .fetch_all(&self.pool)
        .await?;
        collect_entries(rows)
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM roster")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod roster_repo_tests {
    use super::*;
    use crate::infrastructure::database::connect_in_memory;

    fn entry(d: &str, name: &str, shift: &str) -> RosterEntry {
        RosterEntry::new(d.parse().unwrap(), name, shift).unwrap()
    }

    #[tokio::test]
    async fn test_same_key_in_one_batch_keeps_last() {
        let pool = connect_in_memory().await.expect("Failed to create memory pool");
        let repo = RosterRepository::new(pool);

        repo.upsert_batch(&[
            entry("2026-02-01", "A", "Morning"),
            entry("2026-02-01", "A", "Evening"),
        ])
        .await
        .expect("Failed to upsert");

        let stored = repo.find_all().await.unwrap();
        assert_eq!(stored, vec![entry("2026-02-01", "A", "Evening")]);
    }

    #[tokio::test]
    async fn test_find_by_date_and_range() {
        let pool = connect_in_memory().await.unwrap();
        let repo = RosterRepository::new(pool);

        repo.upsert_batch(&[
            entry("2026-01-31", "A", "Night"),
            entry("2026-02-01", "B", "Morning"),
            entry("2026-02-01", "C", "Evening"),
            entry("2026-02-28", "D", "Night"),
            entry("2026-03-01", "E", "Morning"),
        ])
        .await
        .unwrap();

        let day = repo.find_by_date("2026-02-01".parse().unwrap()).await.unwrap();
        assert_eq!(day.len(), 2);

        let feb = repo
            .find_range("2026-02-01".parse().unwrap(), "2026-02-28".parse().unwrap())
            .await
            .unwrap();
        let names: Vec<_> = feb.iter().map(|e| e.engineer_name.as_str()).collect();
        assert_eq!(names, vec!["B", "C", "D"]);
    }

    #[tokio::test]
    async fn test_empty_batch_is_noop() {
        let pool = connect_in_memory().await.unwrap();
        let repo = RosterRepository::new(pool);
        assert_eq!(repo.upsert_batch(&[]).await.unwrap(), 0);
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unnormalized_entries_are_trimmed_or_rejected() {
        let pool = connect_in_memory().await.unwrap();
        let repo = RosterRepository::new(pool);
        let date: NaiveDate = "2026-02-01".parse().unwrap();

        // フィールドを直接組み立てた行 (new を通っていない)
        let raw = |name: &str, shift: &str| RosterEntry {
            date,
            engineer_name: name.to_string(),
            shift_type: shift.to_string(),
        };

        let rejected = repo
            .upsert_batch(&[raw("   ", "Morning"), raw("A", "Morning")])
            .await;
        assert!(matches!(rejected, Err(RosterError::Validation(_))));
        assert_eq!(repo.count().await.unwrap(), 0);

        let applied = repo
            .upsert_batch(&[raw(" A ", "Morning "), entry("2026-02-01", "A", "Evening")])
            .await
            .unwrap();
        assert_eq!(applied, 2);

        // 空白違いでも同じ担当者として1行にまとまる
        let stored = repo.find_all().await.unwrap();
        assert_eq!(stored, vec![entry("2026-02-01", "A", "Evening")]);
    }

    #[tokio::test]
    async fn test_corrupt_date_is_reported() {
        let pool = connect_in_memory().await.unwrap();
        sqlx::query("INSERT INTO roster (date, engineer_name, shift_type) VALUES ('02/01/2026', 'A', 'Morning')")
            .execute(&pool)
            .await
            .unwrap();

        let repo = RosterRepository::new(pool);
        assert!(matches!(repo.find_all().await, Err(RosterError::Corrupt(_))));
    }
}
