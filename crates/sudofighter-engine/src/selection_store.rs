//! TOML file backing for the character selection.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use sudofighter_common::SchemaVersion;
use sudofighter_gameplay::{SelectionError, SelectionStore};
use tracing::debug;

/// On-disk layout of the selection file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SelectionFile {
    #[serde(default)]
    schema_version: Option<SchemaVersion>,
    #[serde(rename = "SelectedCharacterIndex", default)]
    selected: Option<i64>,
}

/// Selection store persisted as a small TOML file.
#[derive(Debug, Clone)]
pub struct TomlSelectionStore {
    path: PathBuf,
}

impl TomlSelectionStore {
    /// Creates a store backed by `path`. The file is created on first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SelectionStore for TomlSelectionStore {
    fn load(&self) -> Result<Option<i64>, SelectionError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SelectionError::Store(e.to_string())),
        };
        let file: SelectionFile =
            toml::from_str(&contents).map_err(|e| SelectionError::Store(e.to_string()))?;

        // files without a version predate versioning and are read as-is
        if let Some(found) = file.schema_version {
            let expected = SchemaVersion::SELECTION_STORE;
            if !expected.can_read(&found) {
                return Err(SelectionError::Store(format!(
                    "unsupported selection schema {found}, expected {expected}"
                )));
            }
        }
        Ok(file.selected)
    }

    fn save(&mut self, index: i64) -> Result<(), SelectionError> {
        let file = SelectionFile {
            schema_version: Some(SchemaVersion::SELECTION_STORE),
            selected: Some(index),
        };
        let contents =
            toml::to_string_pretty(&file).map_err(|e| SelectionError::Store(e.to_string()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SelectionError::Store(e.to_string()))?;
        }
        fs::write(&self.path, contents).map_err(|e| SelectionError::Store(e.to_string()))?;
        debug!(index, path = %self.path.display(), "Saved selection");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sudofighter_gameplay::{CharacterSelection, SELECTION_KEY};
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = TomlSelectionStore::new(temp_dir.path().join("none.toml"));
        assert_eq!(store.load().expect("load"), None);
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("prefs").join("selection.toml");
        let mut store = TomlSelectionStore::new(&path);

        store.save(2).expect("save");

        let contents = fs::read_to_string(&path).expect("read");
        assert!(contents.contains(SELECTION_KEY));
        assert_eq!(TomlSelectionStore::new(&path).load().expect("load"), Some(2));
    }

    #[test]
    fn test_hand_written_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("selection.toml");
        fs::write(&path, "SelectedCharacterIndex = 1\n").expect("write");

        let store = TomlSelectionStore::new(&path);
        let selection = CharacterSelection::from_store(2, &store).expect("selection");
        assert_eq!(selection.index(), 1);
    }

    #[test]
    fn test_newer_schema_is_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("selection.toml");
        fs::write(
            &path,
            "SelectedCharacterIndex = 1\n\n[schema_version]\nmajor = 2\nminor = 0\npatch = 0\n",
        )
        .expect("write");

        let store = TomlSelectionStore::new(&path);
        assert!(matches!(store.load(), Err(SelectionError::Store(_))));
        let selection = CharacterSelection::from_store(2, &store).expect("selection");
        assert_eq!(selection.index(), 0);
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("selection.toml");
        fs::write(&path, "SelectedCharacterIndex = [").expect("write");

        let store = TomlSelectionStore::new(&path);
        assert!(matches!(store.load(), Err(SelectionError::Store(_))));
        // selection still opens on the first character
        let selection = CharacterSelection::from_store(3, &store).expect("selection");
        assert_eq!(selection.index(), 0);
    }
}
