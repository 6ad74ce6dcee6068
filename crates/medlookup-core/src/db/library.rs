//! Persistence for recent searches and favorites.

use super::{Database, DbResult, FAVORITES_KEY, HISTORY_KEY};
use crate::models::{Favorites, RecencyList};

impl Database {
    /// Load the recent-search list. Missing means empty.
    pub fn load_history(&self) -> DbResult<RecencyList> {
        let names: Option<Vec<String>> = self.get_json(HISTORY_KEY)?;
        Ok(names.map(RecencyList::from_names).unwrap_or_default())
    }

    /// Persist the recent-search list.
    pub fn save_history(&self, history: &RecencyList) -> DbResult<()> {
        self.set_json(HISTORY_KEY, history)
    }

    /// Load favorites. Missing means empty.
    pub fn load_favorites(&self) -> DbResult<Favorites> {
        Ok(self.get_json(FAVORITES_KEY)?.unwrap_or_default())
    }

    /// Persist favorites.
    pub fn save_favorites(&self, favorites: &Favorites) -> DbResult<()> {
        self.set_json(FAVORITES_KEY, favorites)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MedicineEntry;

    #[test]
    fn test_history_defaults_to_empty() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.load_history().unwrap().is_empty());
    }

    #[test]
    fn test_history_persistence() {
        let db = Database::open_in_memory().unwrap();

        let mut history = RecencyList::new();
        history.record("Ibuprofen");
        history.record("Paracetamol");
        db.save_history(&history).unwrap();

        let loaded = db.load_history().unwrap();
        assert_eq!(loaded.entries(), &["Paracetamol", "Ibuprofen"]);

        // Stored as a plain JSON array of names.
        assert_eq!(
            db.get_value(HISTORY_KEY).unwrap().as_deref(),
            Some(r#"["Paracetamol","Ibuprofen"]"#)
        );
    }

    #[test]
    fn test_history_reapplies_cap_on_load() {
        let db = Database::open_in_memory().unwrap();
        let stored: Vec<String> = (1..=15).map(|i| format!("Med {}", i)).collect();
        db.set_json(HISTORY_KEY, &stored).unwrap();

        let loaded = db.load_history().unwrap();
        assert_eq!(loaded.len(), 10);
        assert_eq!(loaded.entries()[0], "Med 1");
    }

    #[test]
    fn test_favorites_persistence() {
        let db = Database::open_in_memory().unwrap();

        let mut favorites = Favorites::new();
        favorites.add(MedicineEntry::new("Cetirizine").with_aliases(["Zyrtec"]));
        db.save_favorites(&favorites).unwrap();

        let loaded = db.load_favorites().unwrap();
        assert_eq!(loaded, favorites);
        assert_eq!(loaded.entries()[0].other_names, vec!["Zyrtec"]);
    }
}
