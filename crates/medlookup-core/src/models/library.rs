//! User library models: recent searches and favorites.

use serde::{Deserialize, Serialize};

use super::MedicineEntry;

/// Maximum number of remembered searches.
pub const HISTORY_CAPACITY: usize = 10;

/// Number of recent searches shown in the search-bar preview.
pub const HISTORY_PREVIEW_LEN: usize = 4;

/// Most-recent-first list of resolved medicine names.
///
/// Names are de-duplicated case-insensitively and the list never holds more
/// than [`HISTORY_CAPACITY`] entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecencyList {
    names: Vec<String>,
}

impl RecencyList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from stored names, re-applying de-duplication and the cap.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self::new();
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        // Stored order is newest first, so replay oldest first.
        for name in names.into_iter().rev() {
            list.record(&name);
        }
        list
    }

    /// Move `name` to the front, dropping any case-insensitive duplicate.
    pub fn record(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        let lower = name.to_lowercase();
        self.names.retain(|n| n.to_lowercase() != lower);
        self.names.insert(0, name.to_string());
        self.names.truncate(HISTORY_CAPACITY);
    }

    /// The `n` most recent names.
    pub fn top_n(&self, n: usize) -> &[String] {
        &self.names[..n.min(self.names.len())]
    }

    pub fn entries(&self) -> &[String] {
        &self.names
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Favorited medicines keyed by exact primary name, in the order added.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites {
    entries: Vec<MedicineEntry>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Add an entry. Returns `false` if it was already a favorite.
    pub fn add(&mut self, entry: MedicineEntry) -> bool {
        if self.contains(&entry.name) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Remove by name. Returns `true` if something was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.name != name);
        self.entries.len() != before
    }

    /// Flip membership. Returns whether the entry is now a favorite.
    pub fn toggle(&mut self, entry: &MedicineEntry) -> bool {
        if self.remove(&entry.name) {
            false
        } else {
            self.entries.push(entry.clone());
            true
        }
    }

    pub fn entries(&self) -> &[MedicineEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_moves_duplicate_to_front() {
        let mut history = RecencyList::new();
        history.record("Paracetamol");
        history.record("Ibuprofen");
        history.record("PARACETAMOL");

        assert_eq!(history.entries(), &["PARACETAMOL", "Ibuprofen"]);
    }

    #[test]
    fn test_record_caps_at_capacity() {
        let mut history = RecencyList::new();
        for i in 1..=11 {
            history.record(&format!("Medicine {}", i));
        }

        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history.entries()[0], "Medicine 11");
        assert!(!history.entries().iter().any(|n| n == "Medicine 1"));
    }

    #[test]
    fn test_record_trims_and_ignores_blank() {
        let mut history = RecencyList::new();
        history.record("  Aspirin  ");
        history.record("   ");

        assert_eq!(history.entries(), &["Aspirin"]);
    }

    #[test]
    fn test_top_n() {
        let history = RecencyList::from_names(["E", "D", "C", "B", "A"]);

        assert_eq!(history.top_n(HISTORY_PREVIEW_LEN), &["E", "D", "C", "B"]);
        assert_eq!(history.top_n(50).len(), 5);
        assert!(RecencyList::new().top_n(4).is_empty());
    }

    #[test]
    fn test_from_names_keeps_order_and_dedups() {
        let history = RecencyList::from_names(["Dolo", "Crocin", "dolo"]);
        assert_eq!(history.entries(), &["Dolo", "Crocin"]);
    }

    #[test]
    fn test_clear() {
        let mut history = RecencyList::from_names(["A", "B"]);
        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn test_favorites_toggle() {
        let mut favorites = Favorites::new();
        let entry = MedicineEntry::new("Cetirizine");

        assert!(favorites.toggle(&entry));
        assert!(favorites.contains("Cetirizine"));
        assert!(!favorites.contains("cetirizine"));

        assert!(!favorites.toggle(&entry));
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_favorites_add_is_idempotent() {
        let mut favorites = Favorites::new();
        assert!(favorites.add(MedicineEntry::new("Dolo")));
        assert!(!favorites.add(MedicineEntry::new("Dolo")));
        assert_eq!(favorites.len(), 1);
        assert!(favorites.remove("Dolo"));
        assert!(!favorites.remove("Dolo"));
    }
}
