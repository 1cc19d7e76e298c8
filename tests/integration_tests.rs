use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use outlay::config::{CliArgs, Config, DB_DIR_ENV};
use outlay_core::{CategoryTotal, ExpenseStore, NewExpense};
use outlay_sqlite::{location, SqliteLedger, DB_FILE_NAME};

fn cli_for(config_path: &str) -> CliArgs {
    CliArgs {
        config: config_path.to_string(),
        db_dir: None,
        log_level: None,
    }
}

fn entry(amount: f64, category: &str, date: &str) -> NewExpense {
    NewExpense {
        date: Some(date.to_string()),
        ..NewExpense::new(amount, category)
    }
}

#[test]
fn startup_flow_inserts_and_queries() {
    let dir = TempDir::new().unwrap();
    let location = location::resolve(Some(dir.path()));
    let ledger = SqliteLedger::open(location).unwrap();

    ledger.insert(&entry(10.0, "food", "02-01-2024")).unwrap();
    ledger.insert(&entry(5.0, "food", "03-01-2024")).unwrap();
    ledger.insert(&entry(7.0, "travel", "04-01-2024")).unwrap();

    let rows = ledger.list("01-01-2024", "31-01-2024").unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].id, 1);
    assert_eq!(rows[2].category, "travel");

    let totals = ledger.summarize("01-01-2024", "31-01-2024", None).unwrap();
    assert_eq!(
        totals,
        vec![
            CategoryTotal {
                category: "food".to_string(),
                total_amount: 15.0,
            },
            CategoryTotal {
                category: "travel".to_string(),
                total_amount: 7.0,
            },
        ]
    );

    assert!(dir.path().join(DB_FILE_NAME).exists());
}

#[test]
fn ledger_survives_restart_and_keeps_id_sequence() {
    let dir = TempDir::new().unwrap();

    let first = SqliteLedger::open(location::resolve(Some(dir.path()))).unwrap();
    let id1 = first.insert(&entry(1.0, "food", "01-01-2024")).unwrap();
    drop(first);

    // Same directory, fresh process: resolution and schema init run again.
    let second = SqliteLedger::open(location::resolve(Some(dir.path()))).unwrap();
    let rows = second.list("01-01-2024", "01-01-2024").unwrap();
    assert_eq!(rows.len(), 1);

    let id2 = second.insert(&entry(2.0, "food", "01-01-2024")).unwrap();
    assert!(id2 > id1);
}

// Defaults and precedence live in one test: it toggles OUTLAY_DB_DIR, which
// is process-wide state, and parallel tests must not observe it.
#[test]
fn config_load_defaults_and_db_dir_precedence() {
    let dir = TempDir::new().unwrap();

    let missing = dir.path().join("does-not-exist.toml");
    let config = Config::load(&cli_for(missing.to_str().unwrap()));
    assert_eq!(config.storage.db_dir, None);
    assert_eq!(config.logging.level, "info");
    assert!(!config.logging.json);
    assert_eq!(config.catalog.path, PathBuf::from("categories.json"));

    let config_path = dir.path().join("outlay.toml");
    fs::write(
        &config_path,
        "[storage]\ndb_dir = \"/from/file\"\n\n[logging]\nlevel = \"debug\"\n",
    )
    .unwrap();
    let config_path = config_path.to_str().unwrap().to_string();

    let config = Config::load(&cli_for(&config_path));
    assert_eq!(config.storage.db_dir, Some(PathBuf::from("/from/file")));
    assert_eq!(config.logging.level, "debug");

    std::env::set_var(DB_DIR_ENV, "/from/env");
    let config = Config::load(&cli_for(&config_path));
    assert_eq!(config.storage.db_dir, Some(PathBuf::from("/from/env")));

    let cli = CliArgs {
        config: config_path.clone(),
        db_dir: Some(PathBuf::from("/from/cli")),
        log_level: Some("trace".to_string()),
    };
    let config = Config::load(&cli);
    assert_eq!(config.storage.db_dir, Some(PathBuf::from("/from/cli")));
    assert_eq!(config.logging.level, "trace");

    std::env::remove_var(DB_DIR_ENV);
}
