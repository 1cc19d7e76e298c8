use std::{fs, io, path::PathBuf};

/// Source of the category list served as the `expense://categories`
/// resource. The file is read on every access so it can be edited without
/// restarting the server. The ledger itself never consults it; categories
/// on entries stay free-form strings.
#[derive(Debug, Clone)]
pub struct CategoryCatalog {
    path: PathBuf,
}

impl CategoryCatalog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn read(&self) -> io::Result<String> {
        fs::read_to_string(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn read_picks_up_edits_without_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("categories.json");
        fs::write(&path, r#"{"categories":["food"]}"#).unwrap();

        let catalog = CategoryCatalog::new(path.clone());
        assert_eq!(catalog.read().unwrap(), r#"{"categories":["food"]}"#);

        fs::write(&path, r#"{"categories":["food","travel"]}"#).unwrap();
        assert_eq!(
            catalog.read().unwrap(),
            r#"{"categories":["food","travel"]}"#
        );
    }

    #[test]
    fn read_reports_missing_file() {
        let dir = TempDir::new().unwrap();
        let catalog = CategoryCatalog::new(dir.path().join("nope.json"));
        assert!(catalog.read().is_err());
    }
}
