//! MedLookup Core Library
//!
//! Local-first medicine reference lookup: typed, spoken or photographed
//! queries resolved against a read-only catalog, with favorites and recent
//! searches persisted on the device.
//!
//! # Architecture
//!
//! ```text
//!  Typed text ─────────────────────────────┐
//!  Voice utterance ────────────────────────┤
//!  Label photo → OCR → Token extraction ───┤
//!                                          ▼
//!                              ┌───────────────────────┐
//!                              │   Tiered resolver     │
//!                              │ name → alias → substr │
//!                              └───────────┬───────────┘
//!                                          │
//!                           ┌──────────────┼──────────────┐
//!                           ▼              ▼              ▼
//!                     Detail view    Recent searches   Favorites
//!                                     (local store)  (local store)
//! ```
//!
//! # Modules
//!
//! - [`db`]: SQLite key/value store for history and favorites
//! - [`models`]: Domain types (MedicineEntry, Catalog, RecencyList, etc.)
//! - [`resolver`]: Tiered catalog matching and label token extraction
//! - [`session`]: Coordinating component that owns all mutable state
//! - [`capture`]: Single-flight trigger for OCR and voice captures

pub mod capture;
pub mod db;
pub mod models;
pub mod resolver;
pub mod session;

// Re-export commonly used types
pub use capture::{CaptureBusy, CaptureGuard, CaptureSource, CaptureState, CaptureTrigger};
pub use db::Database;
pub use models::{
    CandidateName, Catalog, Dosage, DoseGuide, Favorites, MatchResult, MatchTier, MedicineEntry,
    RecencyList, SearchQuery, SelectionRule, Suggestions,
};
pub use resolver::{LabelHeuristics, Resolver};
pub use session::{LookupError, LookupSession, MedicineDetail, SearchOutcome, VoiceFailure};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum MedLookupError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("{0}")]
    Notice(String),

    #[error("Catalog error: {0}")]
    CatalogError(String),

    #[error("Capture error: {0}")]
    CaptureError(String),
}

impl From<db::DbError> for MedLookupError {
    fn from(e: db::DbError) -> Self {
        MedLookupError::DatabaseError(e.to_string())
    }
}

impl From<models::CatalogError> for MedLookupError {
    fn from(e: models::CatalogError) -> Self {
        MedLookupError::CatalogError(e.to_string())
    }
}

impl From<LookupError> for MedLookupError {
    fn from(e: LookupError) -> Self {
        match e {
            LookupError::Database(db) => db.into(),
            LookupError::CaptureBusy(busy) => MedLookupError::CaptureError(busy.to_string()),
            notice => MedLookupError::Notice(notice.to_string()),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for MedLookupError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        MedLookupError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open a session backed by a database file and a catalog file.
///
/// A missing or malformed catalog yields an empty catalog rather than an error.
#[uniffi::export]
pub fn open_session(
    db_path: String,
    catalog_path: String,
) -> Result<Arc<MedLookupCore>, MedLookupError> {
    let db = Database::open(&db_path)?;
    let catalog = Catalog::load_or_empty(&catalog_path);
    Ok(MedLookupCore::wrap(LookupSession::open(
        db,
        catalog,
        LabelHeuristics::new(),
    )))
}

/// Open an in-memory session over an inline catalog (for testing).
#[uniffi::export]
pub fn open_session_in_memory(catalog_json: String) -> Result<Arc<MedLookupCore>, MedLookupError> {
    let db = Database::open_in_memory()?;
    let catalog = Catalog::from_json(&catalog_json)?;
    Ok(MedLookupCore::wrap(LookupSession::open(
        db,
        catalog,
        LabelHeuristics::new(),
    )))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe session wrapper for FFI.
#[derive(uniffi::Object)]
pub struct MedLookupCore {
    session: Arc<Mutex<LookupSession>>,
}

impl MedLookupCore {
    fn wrap(session: LookupSession) -> Arc<Self> {
        Arc::new(Self {
            session: Arc::new(Mutex::new(session)),
        })
    }
}

#[uniffi::export]
impl MedLookupCore {
    // =========================================================================
    // Search Operations
    // =========================================================================

    /// Search by typed text. `None` means the query was blank.
    pub fn search(&self, query: String) -> Result<Option<FfiMedicineDetail>, MedLookupError> {
        let mut session = self.session.lock()?;
        Ok(session.search(&query)?.into())
    }

    /// Autocomplete suggestions for the search bar.
    pub fn suggest(&self, query: String, limit: u32) -> Result<FfiSuggestions, MedLookupError> {
        let session = self.session.lock()?;
        Ok(session.suggest(&query, limit as usize).into())
    }

    /// Open a medicine picked from suggestions, favorites or history.
    pub fn open_entry(&self, name: String) -> Result<Option<FfiMedicineDetail>, MedLookupError> {
        let mut session = self.session.lock()?;
        Ok(session.open_entry(&name)?.into())
    }

    /// Run the label token extractor only.
    pub fn extract_candidate(&self, raw_text: String) -> Result<Option<String>, MedLookupError> {
        let session = self.session.lock()?;
        Ok(session
            .resolver()
            .extract_candidate(&raw_text)
            .map(|c| c.text))
    }

    /// Feed OCR text through extraction and search.
    pub fn submit_recognized_text(
        &self,
        text: String,
    ) -> Result<Option<FfiMedicineDetail>, MedLookupError> {
        let mut session = self.session.lock()?;
        Ok(session.submit_recognized_text(&text)?.into())
    }

    /// Feed a recognized voice utterance into search.
    pub fn submit_voice_transcript(
        &self,
        transcript: String,
    ) -> Result<Option<FfiMedicineDetail>, MedLookupError> {
        let mut session = self.session.lock()?;
        Ok(session.submit_utterance(Ok(transcript))?.into())
    }

    /// Report a voice capture that produced no utterance.
    ///
    /// Always returns the user-visible notice as an error.
    pub fn report_voice_failure(&self, unsupported: bool, reason: String) -> Result<(), MedLookupError> {
        let failure = if unsupported {
            VoiceFailure::Unsupported
        } else {
            VoiceFailure::Failed(reason)
        };
        let mut session = self.session.lock()?;
        session.submit_utterance(Err(failure))?;
        Ok(())
    }

    // =========================================================================
    // Capture Operations
    // =========================================================================

    /// Disable the capture trigger for one OCR or voice attempt.
    pub fn begin_capture(
        &self,
        source: FfiCaptureSource,
    ) -> Result<Arc<CaptureTicket>, MedLookupError> {
        let trigger = self.session.lock()?.capture_trigger();
        let guard = trigger.begin(source.into()).map_err(LookupError::from)?;
        Ok(Arc::new(CaptureTicket {
            guard: Mutex::new(Some(guard)),
        }))
    }

    /// Whether a new capture may start.
    pub fn is_capture_enabled(&self) -> Result<bool, MedLookupError> {
        Ok(self.session.lock()?.capture_trigger().is_enabled())
    }

    // =========================================================================
    // Favorites Operations
    // =========================================================================

    /// Flip favorite status. Returns whether the medicine is now a favorite.
    pub fn toggle_favorite(&self, name: String) -> Result<bool, MedLookupError> {
        let mut session = self.session.lock()?;
        Ok(session.toggle_favorite(&name)?)
    }

    pub fn is_favorite(&self, name: String) -> Result<bool, MedLookupError> {
        Ok(self.session.lock()?.is_favorite(&name))
    }

    /// Favorites in the order added.
    pub fn favorites(&self) -> Result<Vec<FfiMedicine>, MedLookupError> {
        let session = self.session.lock()?;
        Ok(session.favorites().into_iter().map(Into::into).collect())
    }

    // =========================================================================
    // History Operations
    // =========================================================================

    /// The `limit` most recent searches.
    pub fn recent_searches(&self, limit: u32) -> Result<Vec<String>, MedLookupError> {
        let session = self.session.lock()?;
        Ok(session.recent(limit as usize).to_vec())
    }

    /// Full recent-search list.
    pub fn history(&self) -> Result<Vec<String>, MedLookupError> {
        Ok(self.session.lock()?.history().to_vec())
    }

    pub fn clear_history(&self) -> Result<(), MedLookupError> {
        let mut session = self.session.lock()?;
        Ok(session.clear_history()?)
    }
}

/// One in-flight capture. Settle with `succeed` or `fail`; dropping it
/// unsettled re-enables the trigger as a failure.
#[derive(uniffi::Object)]
pub struct CaptureTicket {
    guard: Mutex<Option<CaptureGuard>>,
}

#[uniffi::export]
impl CaptureTicket {
    pub fn succeed(&self) -> Result<(), MedLookupError> {
        if let Some(guard) = self.guard.lock()?.take() {
            guard.succeed();
        }
        Ok(())
    }

    pub fn fail(&self, reason: String) -> Result<(), MedLookupError> {
        if let Some(guard) = self.guard.lock()?.take() {
            guard.fail(reason);
        }
        Ok(())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe capture source.
#[derive(Debug, Clone, Copy, uniffi::Enum)]
pub enum FfiCaptureSource {
    Ocr,
    Voice,
}

impl From<FfiCaptureSource> for CaptureSource {
    fn from(source: FfiCaptureSource) -> Self {
        match source {
            FfiCaptureSource::Ocr => CaptureSource::Ocr,
            FfiCaptureSource::Voice => CaptureSource::Voice,
        }
    }
}

/// FFI-safe dose guidance.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDoseGuide {
    pub amount: String,
    pub interval: String,
    pub max_per_day: String,
}

impl From<DoseGuide> for FfiDoseGuide {
    fn from(guide: DoseGuide) -> Self {
        Self {
            amount: guide.amount,
            interval: guide.interval,
            max_per_day: guide.max_per_day,
        }
    }
}

/// FFI-safe medicine record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicine {
    pub name: String,
    pub other_names: Vec<String>,
    pub uses: Option<String>,
    pub ingredients: Vec<String>,
    pub adult_dose: Option<FfiDoseGuide>,
    pub child_dose: Option<FfiDoseGuide>,
    pub side_effects: Vec<String>,
}

impl From<MedicineEntry> for FfiMedicine {
    fn from(entry: MedicineEntry) -> Self {
        let (adult_dose, child_dose) = match entry.dosage {
            Some(Dosage { adult, child }) => (Some(adult.into()), Some(child.into())),
            None => (None, None),
        };
        Self {
            name: entry.name,
            other_names: entry.other_names,
            uses: entry.uses,
            ingredients: entry.ingredients,
            adult_dose,
            child_dose,
            side_effects: entry.side_effects,
        }
    }
}

impl From<&MedicineEntry> for FfiMedicine {
    fn from(entry: &MedicineEntry) -> Self {
        entry.clone().into()
    }
}

/// FFI-safe detail view payload.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicineDetail {
    pub medicine: FfiMedicine,
    pub match_tier: Option<String>,
    pub is_favorite: bool,
}

impl From<MedicineDetail> for FfiMedicineDetail {
    fn from(detail: MedicineDetail) -> Self {
        Self {
            medicine: detail.entry.into(),
            match_tier: detail.tier.map(|t| format!("{:?}", t)),
            is_favorite: detail.is_favorite,
        }
    }
}

impl From<SearchOutcome> for Option<FfiMedicineDetail> {
    fn from(outcome: SearchOutcome) -> Self {
        match outcome {
            SearchOutcome::Found(detail) => Some(detail.into()),
            SearchOutcome::Empty => None,
        }
    }
}

/// FFI-safe suggestion list.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSuggestions {
    pub names: Vec<String>,
    pub has_more: bool,
}

impl From<Suggestions<'_>> for FfiSuggestions {
    fn from(suggestions: Suggestions<'_>) -> Self {
        Self {
            names: suggestions.names().into_iter().map(str::to_string).collect(),
            has_more: suggestions.has_more,
        }
    }
}
