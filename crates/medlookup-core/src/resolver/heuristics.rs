//! Lookup tables for the label token extractor.

use std::collections::HashSet;

use super::extractor::capitalize;

/// Medicine names preferred when several words survive label cleanup.
///
/// "Cetrizine" is a common label misspelling and is kept on purpose.
pub const DEFAULT_PRIORITY_NAMES: &[&str] = &[
    "Paracetamol",
    "Ibuprofen",
    "Cetirizine",
    "Amoxicillin",
    "Azithromycin",
    "Dolo",
    "Crocin",
    "Panadol",
    "Calpol",
    "Metformin",
    "Pantoprazole",
    "Omeprazole",
    "Cetrizine",
    "Aspirin",
    "Diclofenac",
    "Losartan",
    "Amlodipine",
    "Atorvastatin",
    "Levocetirizine",
    "Ranitidine",
];

/// Packaging and unit words that never name a medicine.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "Tablet",
    "Tablets",
    "Capsule",
    "Capsules",
    "Strip",
    "Syrup",
    "Injection",
    "Suspension",
    "Dose",
    "For",
    "Use",
    "Mg",
    "Ml",
    "Each",
    "Contains",
];

/// Immutable priority list and stop-word set injected into the extractor.
///
/// Entries are stored in token capitalization (`Paracetamol`), so lookups
/// compare exactly against normalized tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelHeuristics {
    priority: HashSet<String>,
    stop_words: HashSet<String>,
}

impl Default for LabelHeuristics {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelHeuristics {
    /// Heuristics with the built-in tables.
    pub fn new() -> Self {
        Self::with_lists(
            DEFAULT_PRIORITY_NAMES.iter().copied(),
            DEFAULT_STOP_WORDS.iter().copied(),
        )
    }

    /// Heuristics with custom tables. Words are re-capitalized as tokens are.
    pub fn with_lists<P, S>(priority: P, stop_words: S) -> Self
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        S: IntoIterator,
        S::Item: AsRef<str>,
    {
        Self {
            priority: canonical_set(priority),
            stop_words: canonical_set(stop_words),
        }
    }

    pub fn is_priority(&self, token: &str) -> bool {
        self.priority.contains(token)
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    pub fn priority_len(&self) -> usize {
        self.priority.len()
    }

    pub fn stop_word_len(&self) -> usize {
        self.stop_words.len()
    }
}

fn canonical_set<I>(words: I) -> HashSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    words
        .into_iter()
        .map(|w| capitalize(w.as_ref().trim()))
        .filter(|w| !w.is_empty())
        .collect()
}
