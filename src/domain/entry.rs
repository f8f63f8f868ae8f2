use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Cents;

pub type EntryId = i64;

/// Maximum length for the free-text notes field.
pub const MAX_NOTES_LEN: usize = 500;

/// One recorded expense, as stored in the ledger.
/// The id is a store-assigned surrogate key and carries no business meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub date: NaiveDate,
    pub amount_cents: Cents,
    pub category: String,
    pub notes: Option<String>,
}

/// A candidate expense slot submitted for a date, before it gets an id.
/// A zero amount means "empty slot" and is filtered out before storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDraft {
    pub amount_cents: Cents,
    pub category: String,
    pub notes: Option<String>,
}

impl EntryDraft {
    pub fn new(amount_cents: Cents, category: impl Into<String>) -> Self {
        Self {
            amount_cents,
            category: category.into(),
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// True when this slot represents an actual expense to persist.
    /// Zero and negative amounts both mean "nothing in this slot".
    pub fn is_persistable(&self) -> bool {
        self.amount_cents > 0
    }
}

/// Drop the empty/unused slots from a submitted slate of drafts.
pub fn filter_persistable(drafts: Vec<EntryDraft>) -> Vec<EntryDraft> {
    drafts.into_iter().filter(EntryDraft::is_persistable).collect()
}

/// Sum of draft amounts, used for the save confirmation total.
pub fn total_amount(drafts: &[EntryDraft]) -> Cents {
    drafts.iter().map(|d| d.amount_cents).sum()
}

/// Allow-list of category labels, enforced at the presentation boundary.
/// The store itself is label-agnostic: any non-empty string is accepted,
/// so the set can grow without a schema change.
#[derive(Debug, Clone)]
pub struct CategorySet {
    labels: Vec<String>,
}

impl CategorySet {
    pub fn new(labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl Default for CategorySet {
    fn default() -> Self {
        Self::new(["Rent", "Food", "Shopping", "Entertainment", "Other"])
    }
}
