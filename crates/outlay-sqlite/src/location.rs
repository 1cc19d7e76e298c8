use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

pub const DB_FILE_NAME: &str = "expenses.db";

/// The resolved filesystem path of the ledger file. Computed once at
/// startup and passed into the backend; never held as ambient global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLocation {
    db_path: PathBuf,
}

impl StorageLocation {
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

/// Picks where the ledger file lives, trying in order:
///
/// 1. `override_dir`, when given — trusted, no writability probe;
/// 2. the directory holding the running executable, when writable;
/// 3. the platform temp directory, migrating any ledger file left in the
///    read-only executable directory by a previous deployment.
pub fn resolve(override_dir: Option<&Path>) -> StorageLocation {
    let app_dir = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    resolve_in(override_dir, app_dir.as_deref(), &env::temp_dir())
}

pub fn resolve_in(
    override_dir: Option<&Path>,
    app_dir: Option<&Path>,
    temp_dir: &Path,
) -> StorageLocation {
    if let Some(dir) = override_dir {
        return StorageLocation {
            db_path: dir.join(DB_FILE_NAME),
        };
    }

    if let Some(dir) = app_dir {
        if dir_is_writable(dir) {
            return StorageLocation {
                db_path: dir.join(DB_FILE_NAME),
            };
        }
    }

    let db_path = temp_dir.join(DB_FILE_NAME);

    // Read-only deployments may ship a pre-seeded ledger next to the
    // executable. Carry it into the writable scratch area once; a failed
    // copy is not fatal, the schema init will start a fresh ledger instead.
    if let Some(dir) = app_dir {
        let seeded = dir.join(DB_FILE_NAME);
        if seeded.exists() && !db_path.exists() {
            match migrate_ledger(&seeded, &db_path) {
                Ok(bytes) => {
                    tracing::info!(
                        from = %seeded.display(),
                        to = %db_path.display(),
                        bytes,
                        "migrated seeded ledger into scratch directory"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        from = %seeded.display(),
                        error = %e,
                        "ledger migration failed, starting fresh"
                    );
                }
            }
        }
    }

    StorageLocation { db_path }
}

fn migrate_ledger(source: &Path, target: &Path) -> io::Result<u64> {
    fs::copy(source, target)
}

fn dir_is_writable(dir: &Path) -> bool {
    let probe = dir.join(".outlay-write-probe");
    match fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&probe)
    {
        Ok(file) => {
            drop(file);
            let _ = fs::remove_file(&probe);
            true
        }
        Err(_) => false,
    }
}
