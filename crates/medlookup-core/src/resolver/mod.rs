//! Catalog resolver and label token extractor.
//!
//! Pipelines:
//! - Query → Tiered match → Display
//! - Label text → Token extraction → Tiered match → Display

mod extractor;
mod heuristics;
mod matcher;

pub use extractor::{extract_candidate, is_dosage_marker, select_candidate, tokenize};
pub use heuristics::*;
pub use matcher::*;

use crate::models::{CandidateName, Catalog, MatchResult, OcrToken, SearchQuery, Suggestions};

/// Read-only view over a catalog and its label heuristics.
///
/// Holds no state of its own; every call is a pure function of its inputs.
pub struct Resolver<'a> {
    catalog: &'a Catalog,
    heuristics: &'a LabelHeuristics,
}

impl<'a> Resolver<'a> {
    /// Create a new resolver.
    pub fn new(catalog: &'a Catalog, heuristics: &'a LabelHeuristics) -> Self {
        Self {
            catalog,
            heuristics,
        }
    }

    /// Resolve a query to at most one catalog entry.
    pub fn resolve(&self, query: &SearchQuery) -> MatchResult<'a> {
        resolve(query, self.catalog.entries())
    }

    /// Autocomplete suggestions for a live-typed prefix.
    pub fn suggest(&self, query: &SearchQuery, limit: usize) -> Suggestions<'a> {
        suggest(query, self.catalog.entries(), limit)
    }

    /// Normalize label text into tokens.
    pub fn tokenize(&self, raw_text: &str) -> Vec<OcrToken> {
        tokenize(raw_text, self.heuristics)
    }

    /// Best-guess medicine name from label text.
    pub fn extract_candidate(&self, raw_text: &str) -> Option<CandidateName> {
        extract_candidate(raw_text, self.heuristics)
    }

    /// Extract a candidate and resolve it in one step.
    pub fn resolve_label(&self, raw_text: &str) -> Option<(CandidateName, MatchResult<'a>)> {
        let candidate = self.extract_candidate(raw_text)?;
        let query = SearchQuery::new(candidate.as_str())?;
        let result = self.resolve(&query);
        Some((candidate, result))
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn heuristics(&self) -> &'a LabelHeuristics {
        self.heuristics
    }
}
