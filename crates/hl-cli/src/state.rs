//! Persistence of the day store between invocations.
//!
//! The store lives in a single JSON file (`state.json` in the XDG data
//! directory by default).

use std::path::Path;

use anyhow::{Context, Result};
use hl_core::DayStore;

/// Loads the day store from `path`.
///
/// Returns an empty store if the file doesn't exist.
/// Returns an error if the file exists but is unreadable/unparseable.
pub fn load_store(path: &Path) -> Result<DayStore> {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(DayStore::new()),
        Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
    }
}

/// Writes the day store to `path`, creating parent directories.
pub fn save_store(path: &Path, store: &DayStore) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("failed to create data directory")?;
    }
    let json = serde_json::to_string_pretty(store).context("failed to serialize day store")?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;

    #[test]
    fn test_load_missing_returns_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = load_store(&dir.path().join("state.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_then_load_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/state.json");
        let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();

        let mut store = DayStore::new();
        store.add_punch(day, "08:00", "12:00").unwrap();
        save_store(&path, &store).unwrap();

        assert_eq!(load_store(&path).unwrap(), store);
    }

    #[test]
    fn test_load_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = load_store(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }
}
