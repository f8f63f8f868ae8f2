use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::Cents;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Entry {slot}: amount must not be negative (got {amount} cents)")]
    NegativeAmount { slot: usize, amount: Cents },

    #[error("Entry {slot}: category label is required")]
    MissingCategory { slot: usize },

    #[error("Entry {slot}: notes exceed {max} characters (got {len})")]
    NotesTooLong { slot: usize, len: usize, max: usize },

    #[error("Unknown category '{0}'")]
    UnknownCategory(String),

    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl AppError {
    /// Validation failures are the caller's to fix and must never be
    /// retried; storage failures may be retried whole via replace-for-date.
    pub fn is_validation(&self) -> bool {
        !matches!(self, AppError::Storage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_classification() {
        assert!(
            AppError::NegativeAmount {
                slot: 0,
                amount: -100
            }
            .is_validation()
        );
        assert!(AppError::UnknownCategory("Travel".into()).is_validation());
        assert!(!AppError::Storage(anyhow::anyhow!("connection refused")).is_validation());
    }
}
