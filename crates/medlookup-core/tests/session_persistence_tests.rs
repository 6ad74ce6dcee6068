//! Session tests against an on-disk store.

use std::path::Path;

use medlookup_core::db::{FAVORITES_KEY, HISTORY_KEY};
use medlookup_core::models::Catalog;
use medlookup_core::session::LookupError;
use medlookup_core::{Database, LabelHeuristics, LookupSession, SearchOutcome};

const CATALOG_JSON: &str = r#"[
    {"name": "Paracetamol", "otherNames": ["Dolo", "Calpol"], "uses": "Fever and mild pain"},
    {"name": "Ibuprofen", "otherNames": ["Brufen"]},
    {"name": "Cetirizine", "otherNames": ["Zyrtec"]}
]"#;

fn open(path: &Path) -> LookupSession {
    let db = Database::open(path).unwrap();
    let catalog = Catalog::from_json(CATALOG_JSON).unwrap();
    LookupSession::open(db, catalog, LabelHeuristics::new())
}

#[test]
fn test_history_and_favorites_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("medlookup.db");

    {
        let mut session = open(&path);
        session.search("brufen").unwrap();
        session.search("dolo").unwrap();
        assert!(session.toggle_favorite("Ibuprofen").unwrap());
    }

    let mut session = open(&path);
    assert_eq!(session.history(), ["Paracetamol", "Ibuprofen"]);
    assert!(session.is_favorite("Ibuprofen"));

    let outcome = session.search("ibuprofen").unwrap();
    let detail = outcome.detail().unwrap();
    assert!(detail.is_favorite);
    assert_eq!(session.history(), ["Ibuprofen", "Paracetamol"]);
}

#[test]
fn test_stored_layout_is_plain_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("medlookup.db");

    {
        let mut session = open(&path);
        session.search("Zyrtec").unwrap();
        session.toggle_favorite("Cetirizine").unwrap();
    }

    let db = Database::open(&path).unwrap();
    let history: Vec<String> = db.get_json(HISTORY_KEY).unwrap().unwrap();
    assert_eq!(history, vec!["Cetirizine"]);

    let favorites: serde_json::Value = db.get_json(FAVORITES_KEY).unwrap().unwrap();
    assert_eq!(favorites[0]["name"], "Cetirizine");
    assert_eq!(favorites[0]["otherNames"][0], "Zyrtec");
}

#[test]
fn test_corrupt_store_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("medlookup.db");

    {
        let db = Database::open(&path).unwrap();
        db.set_value(HISTORY_KEY, "{not json").unwrap();
        db.set_value(FAVORITES_KEY, "42").unwrap();
    }

    let mut session = open(&path);
    assert!(session.history().is_empty());
    assert!(session.favorites().is_empty());

    // The next write replaces the unreadable value.
    session.search("calpol").unwrap();
    drop(session);
    assert_eq!(open(&path).history(), ["Paracetamol"]);
}

#[test]
fn test_clear_history_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("medlookup.db");

    {
        let mut session = open(&path);
        session.search("paracetamol").unwrap();
        session.clear_history().unwrap();
    }

    assert!(open(&path).history().is_empty());
}

#[test]
fn test_misses_and_blanks_leave_no_trace() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("medlookup.db");

    {
        let mut session = open(&path);
        assert!(matches!(session.search("   "), Ok(SearchOutcome::Empty)));
        assert!(matches!(session.search("warfarin"), Err(LookupError::NoMatch(_))));
        assert!(matches!(
            session.submit_recognized_text("Tablets 10 x 10"),
            Err(LookupError::NoValidCandidate)
        ));
    }

    assert!(open(&path).history().is_empty());
}

#[test]
fn test_failed_save_leaves_memory_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("medlookup.db");

    let mut session = open(&path);
    session.search("dolo").unwrap();
    assert!(session.toggle_favorite("Cetirizine").unwrap());

    // Pull the table out from under the open session.
    let other = rusqlite::Connection::open(&path).unwrap();
    other.execute_batch("DROP TABLE local_store").unwrap();

    assert!(matches!(
        session.toggle_favorite("Ibuprofen"),
        Err(LookupError::Database(_))
    ));
    assert!(!session.is_favorite("Ibuprofen"));

    assert!(matches!(
        session.toggle_favorite("Cetirizine"),
        Err(LookupError::Database(_))
    ));
    assert!(session.is_favorite("Cetirizine"));

    assert!(matches!(session.clear_history(), Err(LookupError::Database(_))));
    assert_eq!(session.history(), ["Paracetamol"]);
}
