//! Query and match models for the catalog resolver.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::MedicineEntry;

/// A trimmed, case-folded, non-empty search query.
///
/// Blank input has no `SearchQuery`; callers handle it as the idle/home state
/// before ever reaching the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Normalize raw input. Returns `None` for blank input.
    pub fn new(raw: &str) -> Option<Self> {
        let folded = raw.trim().to_lowercase();
        if folded.is_empty() {
            None
        } else {
            Some(Self(folded))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which resolver stage produced a match.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MatchTier {
    /// Case-folded primary name equals the query
    ExactName,
    /// A case-folded alias equals the query
    ExactAlias,
    /// Name or alias contains the query
    Substring,
}

/// Outcome of resolving a query against the catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchResult<'a> {
    Found {
        entry: &'a MedicineEntry,
        tier: MatchTier,
    },
    NotFound,
}

impl<'a> MatchResult<'a> {
    /// The matched entry, if any.
    pub fn entry(&self) -> Option<&'a MedicineEntry> {
        match self {
            MatchResult::Found { entry, .. } => Some(entry),
            MatchResult::NotFound => None,
        }
    }

    pub fn tier(&self) -> Option<MatchTier> {
        match self {
            MatchResult::Found { tier, .. } => Some(*tier),
            MatchResult::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, MatchResult::Found { .. })
    }
}

/// Autocomplete results for a live-typed prefix.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Suggestions<'a> {
    /// Matching entries in catalog order, truncated to the requested limit
    pub entries: Vec<&'a MedicineEntry>,
    /// Whether more entries matched than were returned
    pub has_more: bool,
}

impl<'a> Suggestions<'a> {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of the suggested entries.
    pub fn names(&self) -> Vec<&'a str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }
}
