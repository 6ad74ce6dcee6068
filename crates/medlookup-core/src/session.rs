//! Lookup session: the single owner of catalog, heuristics and user library.
//!
//! Typed, spoken and OCR-derived input all funnel through [`LookupSession::search`].

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::capture::{CaptureBusy, CaptureTrigger};
use crate::db::{Database, DbError};
use crate::models::{
    Catalog, Favorites, MatchTier, MedicineEntry, RecencyList, SearchQuery, Suggestions,
    HISTORY_PREVIEW_LEN,
};
use crate::resolver::{LabelHeuristics, Resolver};

/// User-visible lookup failures and the faults behind them.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("No medicine found for: {0}")]
    NoMatch(String),

    #[error("No readable text found in image.")]
    NoReadableText,

    #[error("No valid medicine name detected.")]
    NoValidCandidate,

    #[error("Failed to extract text: {0}")]
    OcrTransport(String),

    #[error("Speech recognition not supported on this platform.")]
    CaptureUnsupported,

    #[error("Voice recognition error: {0}")]
    CaptureFailed(String),

    #[error(transparent)]
    CaptureBusy(#[from] CaptureBusy),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl LookupError {
    /// Whether this is a notice for the user rather than an internal fault.
    pub fn is_notice(&self) -> bool {
        !matches!(self, LookupError::Database(_))
    }
}

pub type LookupResult<T> = Result<T, LookupError>;

/// Why a voice capture produced no utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoiceFailure {
    /// The platform has no speech recognizer
    Unsupported,
    /// Recognition started but errored
    Failed(String),
}

/// A medicine ready for the detail view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicineDetail {
    pub entry: MedicineEntry,
    /// How the entry was reached; `None` when opened directly by name
    pub tier: Option<MatchTier>,
    pub is_favorite: bool,
}

/// Result of a search action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SearchOutcome {
    /// Blank query: the host returns to its home view
    Empty,
    Found(MedicineDetail),
}

impl SearchOutcome {
    pub fn detail(&self) -> Option<&MedicineDetail> {
        match self {
            SearchOutcome::Found(detail) => Some(detail),
            SearchOutcome::Empty => None,
        }
    }
}

/// Coordinates lookups and owns all mutable user state.
pub struct LookupSession {
    db: Database,
    catalog: Catalog,
    heuristics: LabelHeuristics,
    history: RecencyList,
    favorites: Favorites,
    trigger: CaptureTrigger,
}

impl LookupSession {
    /// Open a session, restoring persisted history and favorites.
    ///
    /// Unreadable stored values are logged and replaced by empty lists.
    pub fn open(db: Database, catalog: Catalog, heuristics: LabelHeuristics) -> Self {
        let history = db.load_history().unwrap_or_else(|e| {
            warn!("Discarding unreadable search history: {}", e);
            RecencyList::new()
        });
        let favorites = db.load_favorites().unwrap_or_else(|e| {
            warn!("Discarding unreadable favorites: {}", e);
            Favorites::new()
        });
        info!(
            "Session opened: {} medicines, {} recent searches, {} favorites",
            catalog.len(),
            history.len(),
            favorites.len()
        );

        Self {
            db,
            catalog,
            heuristics,
            history,
            favorites,
            trigger: CaptureTrigger::new(),
        }
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.catalog, &self.heuristics)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn heuristics(&self) -> &LabelHeuristics {
        &self.heuristics
    }

    /// Shared handle to the capture trigger.
    pub fn capture_trigger(&self) -> CaptureTrigger {
        self.trigger.clone()
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Resolve typed (or spoken, or extracted) text and open the match.
    pub fn search(&mut self, raw: &str) -> LookupResult<SearchOutcome> {
        let Some(query) = SearchQuery::new(raw) else {
            return Ok(SearchOutcome::Empty);
        };

        let result = self.resolver().resolve(&query);
        let found = result.entry().cloned().zip(result.tier());
        match found {
            Some((entry, tier)) => {
                debug!("Resolved {:?} to {} via {:?}", query.as_str(), entry.name, tier);
                Ok(SearchOutcome::Found(self.open_detail(entry, Some(tier))))
            }
            None => {
                info!("No medicine found for {:?}", raw.trim());
                Err(LookupError::NoMatch(raw.trim().to_string()))
            }
        }
    }

    /// Autocomplete suggestions for the search bar. Blank input has none.
    pub fn suggest(&self, raw: &str, limit: usize) -> Suggestions<'_> {
        match SearchQuery::new(raw) {
            Some(query) => self.resolver().suggest(&query, limit),
            None => Suggestions::default(),
        }
    }

    /// Open an entry picked by exact name (suggestion, favorite or history row).
    ///
    /// Falls back to a full search when the name is not an exact catalog name.
    pub fn open_entry(&mut self, name: &str) -> LookupResult<SearchOutcome> {
        match self.catalog.get(name).cloned() {
            Some(entry) => Ok(SearchOutcome::Found(self.open_detail(entry, None))),
            None => self.search(name),
        }
    }

    /// Feed text returned by OCR through extraction and search.
    pub fn submit_recognized_text(&mut self, text: &str) -> LookupResult<SearchOutcome> {
        if text.trim().is_empty() {
            return Err(LookupError::NoReadableText);
        }
        debug!("OCR raw text: {:?}", text);

        let candidate = self
            .resolver()
            .extract_candidate(text)
            .ok_or(LookupError::NoValidCandidate)?;
        info!("Label candidate {:?} ({:?})", candidate.text, candidate.rule);

        self.search(&candidate.text)
    }

    /// Feed a finished voice capture into search.
    pub fn submit_utterance(
        &mut self,
        utterance: Result<String, VoiceFailure>,
    ) -> LookupResult<SearchOutcome> {
        match utterance {
            Ok(text) => self.search(&text),
            Err(VoiceFailure::Unsupported) => Err(LookupError::CaptureUnsupported),
            Err(VoiceFailure::Failed(reason)) => Err(LookupError::CaptureFailed(reason)),
        }
    }

    fn open_detail(&mut self, entry: MedicineEntry, tier: Option<MatchTier>) -> MedicineDetail {
        self.history.record(&entry.name);
        if let Err(e) = self.db.save_history(&self.history) {
            warn!("Failed to save search history: {}", e);
        }

        MedicineDetail {
            is_favorite: self.favorites.contains(&entry.name),
            entry,
            tier,
        }
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    /// Flip favorite status for a catalog entry. Returns whether it is now a favorite.
    pub fn toggle_favorite(&mut self, name: &str) -> LookupResult<bool> {
        let entry = match self.catalog.get(name) {
            Some(entry) => entry.clone(),
            // Stored favorites may outlive their catalog record.
            None => self
                .favorites
                .entries()
                .iter()
                .find(|e| e.name == name)
                .cloned()
                .ok_or_else(|| LookupError::NoMatch(name.to_string()))?,
        };

        let mut updated = self.favorites.clone();
        let now_favorite = updated.toggle(&entry);
        self.db.save_favorites(&updated)?;
        self.favorites = updated;
        debug!("{} favorite: {}", entry.name, now_favorite);
        Ok(now_favorite)
    }

    pub fn is_favorite(&self, name: &str) -> bool {
        self.favorites.contains(name)
    }

    /// Favorites in the order added, refreshed from the catalog when possible.
    pub fn favorites(&self) -> Vec<MedicineEntry> {
        self.favorites
            .entries()
            .iter()
            .map(|stored| self.catalog.get(&stored.name).unwrap_or(stored).clone())
            .collect()
    }

    // =========================================================================
    // History
    // =========================================================================

    /// The `n` most recent searches.
    pub fn recent(&self, n: usize) -> &[String] {
        self.history.top_n(n)
    }

    /// Short list shown under an empty search bar.
    pub fn history_preview(&self) -> &[String] {
        self.recent(HISTORY_PREVIEW_LEN)
    }

    /// Full recent-search list.
    pub fn history(&self) -> &[String] {
        self.history.entries()
    }

    pub fn clear_history(&mut self) -> LookupResult<()> {
        let cleared = RecencyList::new();
        self.db.save_history(&cleared)?;
        self.history = cleared;
        info!("Search history cleared");
        Ok(())
    }
}
