//! Label token extractor.
//!
//! Turns noisy OCR text from a photographed strip or bottle into a single
//! best-guess medicine name:
//!
//! 1. Non-alphanumeric characters become spaces
//! 2. Split on whitespace
//! 3. Keep words of 3..=19 characters
//! 4. Capitalize (`PARACETAMOL` → `Paracetamol`)
//! 5. Drop stop words
//!
//! Then the first of these rules that yields something wins: priority-list
//! word, word followed by a dosage marker (`Crocin 650mg`), first word.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::LabelHeuristics;
use crate::models::{CandidateName, OcrToken, SelectionRule};

/// Words must be longer than this.
const MIN_TOKEN_LEN: usize = 2;

/// Words must be shorter than this.
const MAX_TOKEN_LEN: usize = 20;

static DOSAGE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[0-9]+mg").expect("dosage marker pattern is valid"));

/// Normalize raw label text into ordered tokens.
pub fn tokenize(raw_text: &str, heuristics: &LabelHeuristics) -> Vec<OcrToken> {
    let sanitized: String = raw_text
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    sanitized
        .split_whitespace()
        .map(str::trim)
        .filter(|w| {
            let len = w.chars().count();
            len > MIN_TOKEN_LEN && len < MAX_TOKEN_LEN
        })
        .map(capitalize)
        .filter(|w| !heuristics.is_stop_word(w))
        .map(OcrToken::new)
        .collect()
}

/// Pick the most probable medicine name from normalized tokens.
pub fn select_candidate(tokens: &[OcrToken], heuristics: &LabelHeuristics) -> Option<CandidateName> {
    if let Some(token) = tokens.iter().find(|t| heuristics.is_priority(t.as_str())) {
        return Some(CandidateName {
            text: token.as_str().to_string(),
            rule: SelectionRule::PriorityList,
        });
    }

    // The base word is the one *before* the dosage marker.
    if let Some(pair) = tokens
        .windows(2)
        .find(|pair| is_dosage_marker(pair[1].as_str()))
    {
        return Some(CandidateName {
            text: format!("{} {}", pair[0], pair[1]),
            rule: SelectionRule::DosageAdjacent,
        });
    }

    tokens.first().map(|token| CandidateName {
        text: token.as_str().to_string(),
        rule: SelectionRule::FirstToken,
    })
}

/// Run the full pipeline over raw label text.
///
/// Never fails; returns `None` when no word survives filtering.
pub fn extract_candidate(raw_text: &str, heuristics: &LabelHeuristics) -> Option<CandidateName> {
    let tokens = tokenize(raw_text, heuristics);
    debug!(
        "Filtered label words: {:?}",
        tokens.iter().map(OcrToken::as_str).collect::<Vec<_>>()
    );

    let candidate = select_candidate(&tokens, heuristics);
    match &candidate {
        Some(c) => debug!("Label candidate {:?} via {:?}", c.text, c.rule),
        None => debug!("No label candidate survived filtering"),
    }
    candidate
}

/// Whether a token looks like a dosage (`500mg`, `650MG`).
pub fn is_dosage_marker(token: &str) -> bool {
    DOSAGE_MARKER.is_match(token)
}

/// First character upper case, the rest lower case.
pub(crate) fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(raw: &str) -> Vec<String> {
        tokenize(raw, &LabelHeuristics::new())
            .into_iter()
            .map(|t| t.as_str().to_string())
            .collect()
    }

    fn extract(raw: &str) -> Option<CandidateName> {
        extract_candidate(raw, &LabelHeuristics::new())
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("pARACETAMOL"), "Paracetamol");
        assert_eq!(capitalize("650MG"), "650mg");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_length_filter_bounds() {
        let two = "ab";
        let three = "abc";
        let nineteen = "a".repeat(19);
        let twenty = "b".repeat(20);
        let raw = format!("{} {} {} {}", two, three, nineteen, twenty);

        assert_eq!(words(&raw), vec!["Abc".to_string(), capitalize(&nineteen)]);
    }

    #[test]
    fn test_sanitize_splits_on_punctuation() {
        assert_eq!(words("Dolo-650/Tabs,Strip"), vec!["Dolo", "650", "Tabs"]);
    }

    #[test]
    fn test_stop_words_removed_after_capitalizing() {
        assert_eq!(words("TABLETS each CONTAINS Metformin"), vec!["Metformin"]);
    }

    #[test]
    fn test_paracetamol_label() {
        assert_eq!(words("Paracetamol 500 Mg Tablet"), vec!["Paracetamol", "500"]);

        let candidate = extract("Paracetamol 500 Mg Tablet").unwrap();
        assert_eq!(candidate.text, "Paracetamol");
        assert_eq!(candidate.rule, SelectionRule::PriorityList);
    }

    #[test]
    fn test_priority_hit_anywhere_in_sequence() {
        let candidate = extract("Manufactured by Acme Pharma Ibuprofen").unwrap();
        assert_eq!(candidate.text, "Ibuprofen");
    }

    #[test]
    fn test_dosage_adjacency() {
        let heuristics =
            LabelHeuristics::with_lists(["Paracetamol"], crate::resolver::DEFAULT_STOP_WORDS.iter());
        let candidate = extract_candidate("Crocin 650mg Suspension", &heuristics).unwrap();

        assert_eq!(candidate.text, "Crocin 650mg");
        assert_eq!(candidate.rule, SelectionRule::DosageAdjacent);
    }

    #[test]
    fn test_dosage_marker_case_insensitive() {
        let candidate = extract("Zerodol 100MG").unwrap();
        assert_eq!(candidate.text, "Zerodol 100mg");
    }

    #[test]
    fn test_dosage_takes_token_before_marker() {
        let candidate = extract("Batch Zerodol 100mg Strip").unwrap();
        assert_eq!(candidate.text, "Zerodol 100mg");
    }

    #[test]
    fn test_fallback_first_token() {
        let candidate = extract("Generic Brand").unwrap();
        assert_eq!(candidate.text, "Generic");
        assert_eq!(candidate.rule, SelectionRule::FirstToken);
    }

    #[test]
    fn test_dosage_marker_first_falls_back() {
        // A marker with nothing before it cannot pair with a base word.
        let candidate = extract("500mg Generic").unwrap();
        assert_eq!(candidate.text, "500mg");
        assert_eq!(candidate.rule, SelectionRule::FirstToken);
    }

    #[test]
    fn test_only_noise_is_absent() {
        assert!(extract("Tablets!! -- Mg, ml; 10 Strip").is_none());
        assert!(extract("").is_none());
        assert!(extract("   \n\t ").is_none());
    }

    #[test]
    fn test_is_dosage_marker() {
        assert!(is_dosage_marker("650mg"));
        assert!(is_dosage_marker("650MG"));
        assert!(is_dosage_marker("X250mg"));
        assert!(!is_dosage_marker("Mg"));
        assert!(!is_dosage_marker("650ml"));
    }
}
