use std::collections::HashSet;

use medlookup_core::models::{MatchTier, MedicineEntry, RecencyList, HISTORY_CAPACITY};
use medlookup_core::resolver::{resolve, suggest, tokenize, LabelHeuristics};
use medlookup_core::SearchQuery;
use proptest::prelude::*;

/// Catalog names all start with `n`, aliases with `q`, so no alias equals a name.
fn catalog_strategy() -> impl Strategy<Value = Vec<MedicineEntry>> {
    proptest::collection::vec(
        (
            "n[a-z]{2,10}",
            proptest::collection::vec("q[a-z]{1,6}", 0..4),
        ),
        1..12,
    )
    .prop_map(|rows| {
        let mut seen = HashSet::new();
        rows.into_iter()
            .filter(|(name, _)| seen.insert(name.clone()))
            .map(|(name, aliases)| MedicineEntry::new(capitalize(&name)).with_aliases(aliases))
            .collect()
    })
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn resolved_name(query: &str, entries: &[MedicineEntry]) -> Option<(String, MatchTier)> {
    let query = SearchQuery::new(query)?;
    let result = resolve(&query, entries);
    result.entry().map(|e| e.name.clone()).zip(result.tier())
}

proptest! {
    #[test]
    fn every_name_resolves_to_itself(entries in catalog_strategy()) {
        for entry in &entries {
            let found = resolved_name(&entry.name, &entries);
            prop_assert_eq!(found, Some((entry.name.clone(), MatchTier::ExactName)));
        }
    }

    #[test]
    fn alias_resolves_to_first_entry_listing_it(entries in catalog_strategy()) {
        for entry in &entries {
            for alias in &entry.other_names {
                let first = entries
                    .iter()
                    .find(|e| e.other_names.iter().any(|a| a.eq_ignore_ascii_case(alias)))
                    .map(|e| e.name.clone());
                let found = resolved_name(alias, &entries);
                prop_assert_eq!(found, first.map(|name| (name, MatchTier::ExactAlias)));
            }
        }
    }

    #[test]
    fn query_with_digit_is_never_found(entries in catalog_strategy(), stem in "[a-z]{0,4}", digit in 0u8..10) {
        let query = format!("{}{}", stem, digit);
        prop_assert_eq!(resolved_name(&query, &entries), None);
    }

    #[test]
    fn resolution_ignores_case_and_padding(entries in catalog_strategy(), query in "[a-z]{1,5}") {
        let shouted = format!("  {}\t", query.to_uppercase());
        prop_assert_eq!(resolved_name(&query, &entries), resolved_name(&shouted, &entries));
    }

    #[test]
    fn resolve_is_idempotent(entries in catalog_strategy(), query in "[a-zA-Z0-9 ]{1,12}") {
        if let Some(query) = SearchQuery::new(&query) {
            prop_assert_eq!(resolve(&query, &entries), resolve(&query, &entries));
        }
    }

    #[test]
    fn suggestions_respect_limit(entries in catalog_strategy(), query in "[a-z]{1,2}", limit in 0usize..8) {
        let query = SearchQuery::new(&query).unwrap();
        let matching = entries
            .iter()
            .filter(|e| e.name.to_lowercase().contains(query.as_str()))
            .count();

        let suggestions = suggest(&query, &entries, limit);
        prop_assert_eq!(suggestions.entries.len(), matching.min(limit));
        prop_assert_eq!(suggestions.has_more, matching > limit);
    }

    #[test]
    fn tokens_are_bounded_and_clean(raw in "[ -~\n]{0,120}") {
        let heuristics = LabelHeuristics::new();
        for token in tokenize(&raw, &heuristics) {
            let word = token.as_str();
            prop_assert!(word.len() > 2 && word.len() < 20, "bad length: {:?}", word);
            prop_assert!(word.chars().all(|c| c.is_ascii_alphanumeric()));
            prop_assert!(!heuristics.is_stop_word(word));
        }
    }

    #[test]
    fn history_stays_bounded_and_unique(names in proptest::collection::vec("[a-cA-C]{1,2}", 0..40)) {
        let mut history = RecencyList::new();
        for name in &names {
            history.record(name);
        }

        prop_assert!(history.len() <= HISTORY_CAPACITY);
        let lowered: HashSet<String> = history.entries().iter().map(|n| n.to_lowercase()).collect();
        prop_assert_eq!(lowered.len(), history.len());
        if let Some(last) = names.last() {
            prop_assert_eq!(history.entries().first(), Some(last));
        }
    }
}
