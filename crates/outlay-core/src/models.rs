use serde::{Deserialize, Serialize};

/// A single ledger entry. Entries are append-only: once inserted they are
/// never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Surrogate key assigned by storage on insert, strictly increasing.
    pub id: i64,
    /// Stored and compared as an opaque `DD-MM-YYYY` string.
    pub date: String,
    pub amount: f64,
    pub category: String,
    pub subcategory: String,
    pub note: String,
}

/// Command for appending one entry to the ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewExpense {
    pub amount: f64,
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    #[serde(default)]
    pub note: String,
    /// `DD-MM-YYYY`. When absent, the backend fills in the current date.
    #[serde(default)]
    pub date: Option<String>,
}

impl NewExpense {
    pub fn new(amount: f64, category: impl Into<String>) -> Self {
        Self {
            amount,
            category: category.into(),
            ..Self::default()
        }
    }
}

/// One row of a `summarize` result: the sum of all in-range amounts for a
/// single category. Categories with no matching rows are omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total_amount: f64,
}
