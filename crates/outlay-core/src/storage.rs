use crate::models::{CategoryTotal, Expense, NewExpense};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("{0}")]
    Other(String),
    #[error("amount must be a finite number, got {0}")]
    InvalidAmount(f64),
    #[error("category must not be empty")]
    EmptyCategory,
}

/// Backend contract for the expense ledger.
///
/// Date range arguments are compared textually against the stored
/// `DD-MM-YYYY` strings, so ranges spanning a year boundary behave
/// lexicographically rather than chronologically.
pub trait ExpenseStore: Send + Sync {
    /// Appends one entry and returns its assigned id. Ids are unique and
    /// strictly greater than every previously assigned id at this location.
    fn insert(&self, expense: &NewExpense) -> Result<i64, StorageError>;

    /// All entries with `start_date <= date <= end_date` (inclusive,
    /// textual comparison), in insertion order.
    fn list(&self, start_date: &str, end_date: &str) -> Result<Vec<Expense>, StorageError>;

    /// Per-category totals over the same inclusive range, ordered by
    /// category name. An exact-match filter applies when `category` is set.
    fn summarize(
        &self,
        start_date: &str,
        end_date: &str,
        category: Option<&str>,
    ) -> Result<Vec<CategoryTotal>, StorageError>;
}
