//! Character selection.
//!
//! The chosen character is a single integer index persisted across
//! sessions. The store is read once when the selection screen opens and
//! written when the choice is confirmed.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Key under which the selected index is persisted.
pub const SELECTION_KEY: &str = "SelectedCharacterIndex";

/// Character selection errors.
#[derive(Debug, Error)]
pub enum SelectionError {
    /// No characters to choose from
    #[error("no characters available for selection")]
    Empty,
    /// Backing store failure
    #[error("selection store error: {0}")]
    Store(String),
}

/// Persistent key-value slot holding the selected index.
pub trait SelectionStore {
    /// Reads the stored index, `None` when nothing was saved yet.
    fn load(&self) -> Result<Option<i64>, SelectionError>;

    /// Persists the index.
    fn save(&mut self, index: i64) -> Result<(), SelectionError>;
}

/// In-process store, used when nothing is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySelectionStore {
    value: Option<i64>,
}

impl MemorySelectionStore {
    /// Creates a store holding `value`.
    #[must_use]
    pub fn with_value(value: i64) -> Self {
        Self { value: Some(value) }
    }
}

impl SelectionStore for MemorySelectionStore {
    fn load(&self) -> Result<Option<i64>, SelectionError> {
        Ok(self.value)
    }

    fn save(&mut self, index: i64) -> Result<(), SelectionError> {
        self.value = Some(index);
        Ok(())
    }
}

/// Cursor over the selectable characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSelection {
    count: usize,
    index: usize,
}

impl CharacterSelection {
    /// Creates a selection over `count` characters starting at the first.
    pub fn new(count: usize) -> Result<Self, SelectionError> {
        if count == 0 {
            return Err(SelectionError::Empty);
        }
        Ok(Self { count, index: 0 })
    }

    /// Creates a selection starting at the stored index.
    ///
    /// Missing, negative, or out-of-range values and store failures all
    /// start at the first character.
    pub fn from_store(count: usize, store: &dyn SelectionStore) -> Result<Self, SelectionError> {
        let mut selection = Self::new(count)?;
        let stored = match store.load() {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to read {}: {}", SELECTION_KEY, e);
                None
            },
        };
        if let Some(raw) = stored {
            match usize::try_from(raw).ok().filter(|&i| i < count) {
                Some(index) => selection.index = index,
                None => warn!(raw, count, "Stored character index out of range, using 0"),
            }
        }
        Ok(selection)
    }

    /// Returns the selected index.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the number of characters.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Moves to the next character, wrapping to the first.
    pub fn next(&mut self) -> usize {
        self.index = (self.index + 1) % self.count;
        self.index
    }

    /// Moves to the previous character, wrapping to the last.
    pub fn prev(&mut self) -> usize {
        self.index = (self.index + self.count - 1) % self.count;
        self.index
    }

    /// Persists the current choice.
    pub fn confirm(&self, store: &mut dyn SelectionStore) -> Result<usize, SelectionError> {
        let raw = i64::try_from(self.index).map_err(|e| SelectionError::Store(e.to_string()))?;
        store.save(raw)?;
        debug!(index = self.index, "Saved character selection");
        Ok(self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl SelectionStore for BrokenStore {
        fn load(&self) -> Result<Option<i64>, SelectionError> {
            Err(SelectionError::Store("unreadable".to_string()))
        }

        fn save(&mut self, _index: i64) -> Result<(), SelectionError> {
            Err(SelectionError::Store("read-only".to_string()))
        }
    }

    #[test]
    fn test_empty_selection_rejected() {
        assert!(matches!(CharacterSelection::new(0), Err(SelectionError::Empty)));
    }

    #[test]
    fn test_next_prev_wrap() {
        let mut sel = CharacterSelection::new(3).expect("selection");
        assert_eq!(sel.prev(), 2);
        assert_eq!(sel.next(), 0);
        assert_eq!(sel.next(), 1);
        assert_eq!(sel.next(), 2);
        assert_eq!(sel.next(), 0);
    }

    #[test]
    fn test_single_character_stays_put() {
        let mut sel = CharacterSelection::new(1).expect("selection");
        assert_eq!(sel.next(), 0);
        assert_eq!(sel.prev(), 0);
    }

    #[test]
    fn test_from_store() {
        let store = MemorySelectionStore::with_value(2);
        let sel = CharacterSelection::from_store(3, &store).expect("selection");
        assert_eq!(sel.index(), 2);

        let sel = CharacterSelection::from_store(3, &MemorySelectionStore::default())
            .expect("selection");
        assert_eq!(sel.index(), 0);
    }

    #[test]
    fn test_out_of_range_store_falls_back() {
        for raw in [-1, 3, i64::MAX] {
            let store = MemorySelectionStore::with_value(raw);
            let sel = CharacterSelection::from_store(3, &store).expect("selection");
            assert_eq!(sel.index(), 0);
        }
    }

    #[test]
    fn test_broken_store() {
        let sel = CharacterSelection::from_store(2, &BrokenStore).expect("selection");
        assert_eq!(sel.index(), 0);
        assert!(sel.confirm(&mut BrokenStore).is_err());
    }

    #[test]
    fn test_confirm_persists() {
        let mut store = MemorySelectionStore::default();
        let mut sel = CharacterSelection::new(4).expect("selection");
        sel.prev();
        assert_eq!(sel.confirm(&mut store).expect("confirm"), 3);
        assert_eq!(store.load().expect("load"), Some(3));
    }
}
