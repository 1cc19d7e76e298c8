use rusqlite::{params, Connection};
use time::{OffsetDateTime, UtcOffset};

use outlay_core::{
    models::{CategoryTotal, Expense, NewExpense},
    storage::{ExpenseStore, StorageError},
};

use crate::location::StorageLocation;

/// SQLite-backed expense ledger.
///
/// Holds only the resolved location: every operation opens its own
/// short-lived connection, runs one statement and drops the handle, so no
/// state leaks across operations and concurrent callers are serialized by
/// SQLite itself.
pub struct SqliteLedger {
    location: StorageLocation,
}

impl SqliteLedger {
    /// Ensures the entries table exists at `location` and returns a ledger
    /// bound to it. Safe to call against an already-initialized file; a
    /// failure here means the location is unusable and startup must stop.
    pub fn open(location: StorageLocation) -> Result<Self, StorageError> {
        let ledger = Self { location };
        ledger.init_schema()?;
        Ok(ledger)
    }

    pub fn location(&self) -> &StorageLocation {
        &self.location
    }

    fn connect(&self) -> Result<Connection, StorageError> {
        Connection::open(self.location.db_path()).map_err(|e| StorageError::Other(e.to_string()))
    }

    fn init_schema(&self) -> Result<(), StorageError> {
        let conn = self.connect()?;
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS expenses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                subcategory TEXT DEFAULT '',
                note TEXT DEFAULT ''
            );
            ",
        )
        .map_err(|e| StorageError::Other(e.to_string()))?;
        tracing::debug!(path = %self.location.db_path().display(), "ledger schema ready");
        Ok(())
    }
}

/// Current date at the ledger's fixed UTC+05:30 offset, as `DD-MM-YYYY`.
fn default_entry_date() -> String {
    let offset = UtcOffset::from_hms(5, 30, 0).unwrap();
    let now = OffsetDateTime::now_utc().to_offset(offset);
    format!("{:02}-{:02}-{:04}", now.day(), now.month() as u8, now.year())
}

impl ExpenseStore for SqliteLedger {
    fn insert(&self, expense: &NewExpense) -> Result<i64, StorageError> {
        if !expense.amount.is_finite() {
            return Err(StorageError::InvalidAmount(expense.amount));
        }
        if expense.category.is_empty() {
            return Err(StorageError::EmptyCategory);
        }
        let date = match &expense.date {
            Some(d) => d.clone(),
            None => default_entry_date(),
        };

        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO expenses (date, amount, category, subcategory, note)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                date,
                expense.amount,
                expense.category,
                expense.subcategory,
                expense.note
            ],
        )
        .map_err(|e| StorageError::Other(e.to_string()))?;
        Ok(conn.last_insert_rowid())
    }

    fn list(&self, start_date: &str, end_date: &str) -> Result<Vec<Expense>, StorageError> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, date, amount, category, subcategory, note
                 FROM expenses
                 WHERE date BETWEEN ?1 AND ?2
                 ORDER BY id ASC",
            )
            .map_err(|e| StorageError::Other(e.to_string()))?;

        let rows = stmt
            .query_map(params![start_date, end_date], |row| {
                Ok(Expense {
                    id: row.get(0)?,
                    date: row.get(1)?,
                    amount: row.get(2)?,
                    category: row.get(3)?,
                    subcategory: row.get(4)?,
                    note: row.get(5)?,
                })
            })
            .map_err(|e| StorageError::Other(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StorageError::Other(e.to_string()))?;

        Ok(rows)
    }

    fn summarize(
        &self,
        start_date: &str,
        end_date: &str,
        category: Option<&str>,
    ) -> Result<Vec<CategoryTotal>, StorageError> {
        let conn = self.connect()?;

        let row_mapper = |row: &rusqlite::Row| -> rusqlite::Result<CategoryTotal> {
            Ok(CategoryTotal {
                category: row.get(0)?,
                total_amount: row.get(1)?,
            })
        };

        let rows = match category {
            Some(cat) => {
                let mut stmt = conn
                    .prepare(
                        "SELECT category, SUM(amount) AS total_amount
                         FROM expenses
                         WHERE date BETWEEN ?1 AND ?2 AND category = ?3
                         GROUP BY category
                         ORDER BY category ASC",
                    )
                    .map_err(|e| StorageError::Other(e.to_string()))?;
                let rows = stmt
                    .query_map(params![start_date, end_date, cat], row_mapper)
                    .map_err(|e| StorageError::Other(e.to_string()))?
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| StorageError::Other(e.to_string()))?;
                rows
            }
            None => {
                let mut stmt = conn
                    .prepare(
                        "SELECT category, SUM(amount) AS total_amount
                         FROM expenses
                         WHERE date BETWEEN ?1 AND ?2
                         GROUP BY category
                         ORDER BY category ASC",
                    )
                    .map_err(|e| StorageError::Other(e.to_string()))?;
                let rows = stmt
                    .query_map(params![start_date, end_date], row_mapper)
                    .map_err(|e| StorageError::Other(e.to_string()))?
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| StorageError::Other(e.to_string()))?;
                rows
            }
        };

        Ok(rows)
    }
}
