pub mod models;
pub mod storage;

pub use models::{CategoryTotal, Expense, NewExpense};
pub use storage::{ExpenseStore, StorageError};
