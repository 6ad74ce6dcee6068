//! Tiered catalog matching.
//!
//! Tiers, first hit wins:
//! 1. Exact primary name
//! 2. Exact alias
//! 3. Name or alias substring (name before aliases within an entry)
//!
//! Catalog order breaks ties inside every tier.

use crate::models::{MatchResult, MatchTier, MedicineEntry, SearchQuery, Suggestions};

/// Default number of autocomplete suggestions.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 6;

/// Resolve a query to at most one catalog entry.
pub fn resolve<'a>(query: &SearchQuery, entries: &'a [MedicineEntry]) -> MatchResult<'a> {
    let q = query.as_str();

    if let Some(entry) = entries.iter().find(|e| e.name.to_lowercase() == q) {
        return MatchResult::Found {
            entry,
            tier: MatchTier::ExactName,
        };
    }

    if let Some(entry) = entries
        .iter()
        .find(|e| e.other_names.iter().any(|a| a.to_lowercase() == q))
    {
        return MatchResult::Found {
            entry,
            tier: MatchTier::ExactAlias,
        };
    }

    if let Some(entry) = entries.iter().find(|e| {
        e.name.to_lowercase().contains(q)
            || e.other_names.iter().any(|a| a.to_lowercase().contains(q))
    }) {
        return MatchResult::Found {
            entry,
            tier: MatchTier::Substring,
        };
    }

    MatchResult::NotFound
}

/// Entries whose primary name contains the query, truncated to `limit`.
///
/// Aliases are not consulted here, unlike [`resolve`].
pub fn suggest<'a>(
    query: &SearchQuery,
    entries: &'a [MedicineEntry],
    limit: usize,
) -> Suggestions<'a> {
    let q = query.as_str();
    let mut matched = entries
        .iter()
        .filter(|e| e.name.to_lowercase().contains(q));

    let taken: Vec<&MedicineEntry> = matched.by_ref().take(limit).collect();
    let has_more = matched.next().is_some();

    Suggestions {
        entries: taken,
        has_more,
    }
}
