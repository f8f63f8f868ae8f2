use chrono::NaiveDate;

use crate::domain::{
    Cents, Entry, EntryDraft, MAX_NOTES_LEN, category_shares, filter_persistable, month_name,
    total_amount,
};
use crate::storage::Repository;

use super::{AppError, CategoryReport, CategorySummary, MonthSummary, MonthlyReport};

/// Application service providing the ledger operations.
/// This is the primary interface for any client (CLI, API, TUI, etc.).
pub struct ExpenseService {
    repo: Repository,
}

/// Confirmation returned by replace-for-date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaceOutcome {
    /// Number of entries persisted. Zero means the submitted slate had no
    /// non-empty slots and the date was left untouched.
    pub saved: usize,
    pub total_cents: Cents,
}

/// A date's entries together with their running total.
#[derive(Debug, Clone)]
pub struct DayEntries {
    pub entries: Vec<Entry>,
    pub total_cents: Cents,
}

impl ExpenseService {
    /// Create a new service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    // ========================
    // Entry operations
    // ========================

    /// Get all entries recorded for a date, with their total.
    /// A date with nothing recorded is an empty result, never an error.
    pub async fn entries_for_date(&self, date: NaiveDate) -> Result<DayEntries, AppError> {
        let entries = self.repo.entries_for_date(date).await?;
        let total_cents = entries.iter().map(|e| e.amount_cents).sum();
        Ok(DayEntries {
            entries,
            total_cents,
        })
    }

    /// Replace a date's entries with the submitted slate.
    ///
    /// Slots with a zero (or negative) amount are empty and get filtered
    /// out first. If nothing survives the filter the operation is a no-op:
    /// whatever was previously recorded for the date stays untouched.
    /// "Clear this date" is the separate, explicit [`Self::clear_date`].
    /// Otherwise the date's prior entries are deleted and the new ones
    /// inserted as one atomic unit, so a concurrent reader sees either the
    /// old full set or the new full set. Duplicate categories within the
    /// slate are kept as separate rows, never merged.
    pub async fn replace_for_date(
        &self,
        date: NaiveDate,
        drafts: Vec<EntryDraft>,
    ) -> Result<ReplaceOutcome, AppError> {
        let drafts = filter_persistable(drafts);
        if drafts.is_empty() {
            tracing::debug!(%date, "replace_for_date: no persistable slots, leaving date untouched");
            return Ok(ReplaceOutcome {
                saved: 0,
                total_cents: 0,
            });
        }

        validate_drafts(&drafts)?;

        self.repo.replace_entries_for_date(date, &drafts).await?;
        let outcome = ReplaceOutcome {
            saved: drafts.len(),
            total_cents: total_amount(&drafts),
        };
        tracing::debug!(%date, saved = outcome.saved, total_cents = outcome.total_cents, "replace_for_date");
        Ok(outcome)
    }

    /// Append entries to a date without touching what is already there.
    /// Drafts must all be valid and non-empty; the replace flow is the
    /// normal editing path, this is the raw store primitive.
    pub async fn insert_for_date(
        &self,
        date: NaiveDate,
        drafts: Vec<EntryDraft>,
    ) -> Result<(), AppError> {
        validate_drafts(&drafts)?;
        self.repo.insert_entries(date, &drafts).await?;
        Ok(())
    }

    /// Delete every entry recorded for a date. Succeeds (removing nothing)
    /// when the date is already empty. Returns the number of rows removed.
    pub async fn clear_date(&self, date: NaiveDate) -> Result<u64, AppError> {
        let removed = self.repo.delete_entries_for_date(date).await?;
        tracing::debug!(%date, removed, "clear_date");
        Ok(removed)
    }

    /// List every entry in the ledger, ordered by date.
    pub async fn list_all_entries(&self) -> Result<Vec<Entry>, AppError> {
        Ok(self.repo.list_entries().await?)
    }

    // ========================
    // Reporting operations
    // ========================

    /// Spending breakdown by category over the inclusive `[from, to]`
    /// window. `from == to` restricts to that single day.
    pub async fn category_report(
        &self,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> Result<CategoryReport, AppError> {
        if from_date > to_date {
            return Err(AppError::InvalidDateRange {
                start: from_date,
                end: to_date,
            });
        }

        let totals = self.repo.sum_by_category(from_date, to_date).await?;
        let total = totals.iter().map(|t| t.total_cents).sum();
        let categories = category_shares(totals)
            .into_iter()
            .map(|s| CategorySummary {
                category: s.category,
                total: s.total_cents,
                percentage: s.percentage,
            })
            .collect();

        Ok(CategoryReport {
            from_date,
            to_date,
            categories,
            total,
        })
    }

    /// Month-over-month totals across the whole ledger (year-agnostic).
    pub async fn monthly_report(&self) -> Result<MonthlyReport, AppError> {
        let sums = self.repo.sum_by_month().await?;

        let mut months = Vec::with_capacity(sums.len());
        for (month_number, total) in sums {
            let name = month_name(month_number).ok_or_else(|| {
                anyhow::anyhow!("stored entry produced invalid month number {month_number}")
            })?;
            months.push(MonthSummary {
                month_number,
                month_name: name.to_string(),
                total,
            });
        }

        let total = months.iter().map(|m| m.total).sum();
        Ok(MonthlyReport { months, total })
    }
}

/// Validate a slate of drafts against the store's input contract:
/// non-negative amounts, a non-empty category label (the store is otherwise
/// label-agnostic) and bounded notes. Slot numbers in errors are 1-based
/// to match what the user submitted.
fn validate_drafts(drafts: &[EntryDraft]) -> Result<(), AppError> {
    for (i, draft) in drafts.iter().enumerate() {
        let slot = i + 1;
        if draft.amount_cents < 0 {
            return Err(AppError::NegativeAmount {
                slot,
                amount: draft.amount_cents,
            });
        }
        if draft.category.trim().is_empty() {
            return Err(AppError::MissingCategory { slot });
        }
        if let Some(notes) = &draft.notes {
            if notes.chars().count() > MAX_NOTES_LEN {
                return Err(AppError::NotesTooLong {
                    slot,
                    len: notes.chars().count(),
                    max: MAX_NOTES_LEN,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_drafts_rejects_negative_amount() {
        let drafts = vec![EntryDraft::new(-1, "Food")];
        assert!(matches!(
            validate_drafts(&drafts),
            Err(AppError::NegativeAmount { slot: 1, .. })
        ));
    }

    #[test]
    fn test_validate_drafts_rejects_blank_category() {
        let drafts = vec![EntryDraft::new(100, "Food"), EntryDraft::new(200, "  ")];
        assert!(matches!(
            validate_drafts(&drafts),
            Err(AppError::MissingCategory { slot: 2 })
        ));
    }

    #[test]
    fn test_validate_drafts_rejects_oversized_notes() {
        let drafts = vec![EntryDraft::new(100, "Food").with_notes("x".repeat(MAX_NOTES_LEN + 1))];
        assert!(matches!(
            validate_drafts(&drafts),
            Err(AppError::NotesTooLong { slot: 1, .. })
        ));
    }

    #[test]
    fn test_validate_drafts_accepts_valid_slate() {
        let drafts = vec![
            EntryDraft::new(100, "Food").with_notes("lunch"),
            EntryDraft::new(0, "Shopping"),
        ];
        assert!(validate_drafts(&drafts).is_ok());
    }
}
