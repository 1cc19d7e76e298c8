pub mod ledger;
pub mod location;

pub use ledger::SqliteLedger;
pub use location::{resolve, StorageLocation, DB_FILE_NAME};
