use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::{Row, SqlitePool};

use crate::domain::{CategoryTotal, Cents, Entry, EntryDraft};

use super::MIGRATION_001_INITIAL;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Repository for persisting and querying expense entries.
///
/// Every write and every multi-row read runs against a short-lived pooled
/// connection; nothing here holds a session across calls. Writes that touch
/// more than one row go through an explicit transaction so readers never
/// observe a partially written batch.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // Entry operations
    // ========================

    /// Get all entries with the given date, in arbitrary order.
    /// A date with no entries is an empty vec, never an error.
    pub async fn entries_for_date(&self, date: NaiveDate) -> Result<Vec<Entry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, entry_date, amount_cents, category, notes
            FROM entries
            WHERE entry_date = ?
            "#,
        )
        .bind(encode_date(date))
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch entries for date")?;

        rows.iter().map(Self::row_to_entry).collect()
    }

    /// Append one row per draft, all stamped with `date`, in a single
    /// transaction: either every row lands durably or none do.
    pub async fn insert_entries(&self, date: NaiveDate, drafts: &[EntryDraft]) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        Self::insert_in_tx(&mut tx, date, drafts).await?;

        tx.commit().await.context("Failed to commit inserts")?;
        tracing::debug!(%date, count = drafts.len(), "inserted entries");
        Ok(())
    }

    /// Remove all entries for a date. A no-op (0 rows) when none exist.
    pub async fn delete_entries_for_date(&self, date: NaiveDate) -> Result<u64> {
        let result = sqlx::query("DELETE FROM entries WHERE entry_date = ?")
            .bind(encode_date(date))
            .execute(&self.pool)
            .await
            .context("Failed to delete entries for date")?;

        tracing::debug!(%date, removed = result.rows_affected(), "deleted entries for date");
        Ok(result.rows_affected())
    }

    /// Delete a date's entries and insert the replacement set as one atomic
    /// unit. A concurrent reader sees either the prior full set or the new
    /// full set; the transaction rolls back on drop if anything fails, so
    /// no transient empty or mixed state is ever visible.
    pub async fn replace_entries_for_date(
        &self,
        date: NaiveDate,
        drafts: &[EntryDraft],
    ) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        sqlx::query("DELETE FROM entries WHERE entry_date = ?")
            .bind(encode_date(date))
            .execute(&mut *tx)
            .await
            .context("Failed to delete prior entries")?;

        Self::insert_in_tx(&mut tx, date, drafts).await?;

        tx.commit().await.context("Failed to commit replacement")?;
        tracing::debug!(%date, count = drafts.len(), "replaced entries for date");
        Ok(())
    }

    async fn insert_in_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        date: NaiveDate,
        drafts: &[EntryDraft],
    ) -> Result<()> {
        for draft in drafts {
            sqlx::query(
                r#"
                INSERT INTO entries (entry_date, amount_cents, category, notes)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(encode_date(date))
            .bind(draft.amount_cents)
            .bind(&draft.category)
            .bind(&draft.notes)
            .execute(&mut **tx)
            .await
            .context("Failed to insert entry")?;
        }
        Ok(())
    }

    /// List every entry in the ledger, ordered by date then insertion order.
    pub async fn list_entries(&self) -> Result<Vec<Entry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, entry_date, amount_cents, category, notes
            FROM entries
            ORDER BY entry_date, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list entries")?;

        rows.iter().map(Self::row_to_entry).collect()
    }

    // ========================
    // Aggregation queries
    // ========================

    /// Sum amounts grouped by category over the inclusive `[from, to]`
    /// date range. Categories with no entries in the range are absent.
    pub async fn sum_by_category(
        &self,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> Result<Vec<CategoryTotal>> {
        let rows = sqlx::query(
            r#"
            SELECT category, SUM(amount_cents) as total
            FROM entries
            WHERE entry_date BETWEEN ? AND ?
            GROUP BY category
            "#,
        )
        .bind(encode_date(from_date))
        .bind(encode_date(to_date))
        .fetch_all(&self.pool)
        .await
        .context("Failed to sum entries by category")?;

        Ok(rows
            .iter()
            .map(|row| CategoryTotal {
                category: row.get("category"),
                total_cents: row.get("total"),
            })
            .collect())
    }

    /// Sum amounts grouped by calendar month across all stored entries
    /// regardless of year, ascending by month number 1-12. Months with no
    /// entries are omitted, not zero-filled.
    pub async fn sum_by_month(&self) -> Result<Vec<(u32, Cents)>> {
        let rows = sqlx::query(
            r#"
            SELECT CAST(strftime('%m', entry_date) AS INTEGER) as month_number,
                   SUM(amount_cents) as total
            FROM entries
            GROUP BY month_number
            ORDER BY month_number
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to sum entries by month")?;

        Ok(rows
            .iter()
            .map(|row| {
                let month: i64 = row.get("month_number");
                (month as u32, row.get::<Cents, _>("total"))
            })
            .collect())
    }

    fn row_to_entry(row: &sqlx::sqlite::SqliteRow) -> Result<Entry> {
        let date_str: String = row.get("entry_date");

        Ok(Entry {
            id: row.get("id"),
            date: decode_date(&date_str)?,
            amount_cents: row.get("amount_cents"),
            category: row.get("category"),
            notes: row.get("notes"),
        })
    }
}

fn encode_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn decode_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .with_context(|| format!("Invalid stored date: {s}"))
}
