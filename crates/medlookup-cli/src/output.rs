//! Output formatting for lookups.
//!
//! Supports both human-readable terminal output and JSON for scripting.

use medlookup_core::models::{CandidateName, DoseGuide, MedicineEntry, OcrToken, Suggestions};
use medlookup_core::MedicineDetail;
use serde::Serialize;

/// Output flavor selected by `--json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Human,
    Json,
}

impl Format {
    pub fn from_flag(json: bool) -> Self {
        if json {
            Format::Json
        } else {
            Format::Human
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Idle view shown for a blank query.
pub fn format_home(recent: &[String], format: Format) -> String {
    if format == Format::Json {
        #[derive(Serialize)]
        struct Home<'a> {
            recent: &'a [String],
        }
        return to_json(&Home { recent });
    }

    let mut output = String::from("Type a medicine name to search.");
    if !recent.is_empty() {
        output.push_str("\n\nRecent:\n");
        for name in recent {
            output.push_str(&format!("  {}\n", name));
        }
    }
    output.trim_end().to_string()
}

/// Detail view for one medicine.
pub fn format_detail(detail: &MedicineDetail, format: Format) -> String {
    if format == Format::Json {
        return to_json(detail);
    }

    let entry = &detail.entry;
    let mut output = String::new();
    let heart = if detail.is_favorite { " ♥" } else { "" };
    output.push_str(&format!("{}{}\n", entry.name, heart));

    if !entry.other_names.is_empty() {
        output.push_str(&format!("Also known as: {}\n", entry.other_names.join(", ")));
    }
    output.push_str(&format!("\nUses: {}\n", entry.uses_display()));
    output.push_str(&format!("Ingredients: {}\n", entry.ingredients_display()));

    if let Some(dosage) = &entry.dosage {
        output.push_str("\nRecommended Dosage\n");
        push_dose(&mut output, "Adults", &dosage.adult);
        push_dose(&mut output, "Children", &dosage.child);
    }

    if !entry.side_effects.is_empty() {
        output.push_str("\nPotential Side Effects\n");
        for effect in &entry.side_effects {
            output.push_str(&format!("  - {}\n", effect));
        }
    }

    output.trim_end().to_string()
}

fn push_dose(output: &mut String, group: &str, dose: &DoseGuide) {
    output.push_str(&format!("  {}\n", group));
    output.push_str(&format!("    Amount:      {}\n", or_dash(&dose.amount)));
    output.push_str(&format!("    Interval:    {}\n", or_dash(&dose.interval)));
    output.push_str(&format!("    Max per Day: {}\n", or_dash(&dose.max_per_day)));
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

/// Autocomplete list.
pub fn format_suggestions(prefix: &str, suggestions: &Suggestions<'_>, format: Format) -> String {
    if format == Format::Json {
        #[derive(Serialize)]
        struct JsonSuggestions<'a> {
            query: &'a str,
            names: Vec<&'a str>,
            has_more: bool,
        }
        return to_json(&JsonSuggestions {
            query: prefix,
            names: suggestions.names(),
            has_more: suggestions.has_more,
        });
    }

    if suggestions.is_empty() {
        return format!("No suggestions for \"{}\"", prefix.trim());
    }

    let mut lines: Vec<String> = suggestions
        .names()
        .into_iter()
        .map(|name| highlight(name, prefix))
        .collect();
    if suggestions.has_more {
        lines.push("Show more results...".to_string());
    }
    lines.join("\n")
}

/// Wrap the first case-insensitive occurrence of `query` in brackets.
fn highlight(name: &str, query: &str) -> String {
    let query = query.trim().to_lowercase();
    let lower = name.to_lowercase();
    match lower.find(&query) {
        Some(start) if !query.is_empty() && lower.len() == name.len() => {
            let end = start + query.len();
            // Equal lengths can still hide shifted boundaries ("İ" grows, "ẞ" shrinks).
            if !name.is_char_boundary(start) || !name.is_char_boundary(end) {
                return name.to_string();
            }
            format!("{}[{}]{}", &name[..start], &name[start..end], &name[end..])
        }
        _ => name.to_string(),
    }
}

/// Extractor trace for `medlookup extract`.
pub fn format_extraction(
    tokens: &[OcrToken],
    candidate: Option<&CandidateName>,
    format: Format,
) -> String {
    if format == Format::Json {
        #[derive(Serialize)]
        struct JsonExtraction<'a> {
            tokens: &'a [OcrToken],
            candidate: Option<&'a CandidateName>,
        }
        return to_json(&JsonExtraction { tokens, candidate });
    }

    let words: Vec<&str> = tokens.iter().map(OcrToken::as_str).collect();
    let mut output = format!("Filtered words: {}\n", words.join(", "));
    match candidate {
        Some(c) => output.push_str(&format!("Candidate: {} ({:?})", c.text, c.rule)),
        None => output.push_str("Candidate: none"),
    }
    output
}

/// Favorites list.
pub fn format_favorites(favorites: &[MedicineEntry], format: Format) -> String {
    if format == Format::Json {
        return to_json(favorites);
    }
    if favorites.is_empty() {
        return "No favorites added yet.".to_string();
    }
    favorites
        .iter()
        .map(|e| format!("♥ {}", e.name))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Result of a favorite toggle.
pub fn format_toggle(name: &str, is_favorite: bool, format: Format) -> String {
    if format == Format::Json {
        #[derive(Serialize)]
        struct Toggle<'a> {
            name: &'a str,
            is_favorite: bool,
        }
        return to_json(&Toggle { name, is_favorite });
    }
    if is_favorite {
        format!("Added {} to favorites", name)
    } else {
        format!("Removed {} from favorites", name)
    }
}

/// Recent searches, newest first.
pub fn format_history(names: &[String], format: Format) -> String {
    if format == Format::Json {
        return to_json(names);
    }
    if names.is_empty() {
        return "No history yet.".to_string();
    }
    names
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{}. {}", i + 1, name))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use medlookup_core::models::{Dosage, MatchTier};

    fn detail() -> MedicineDetail {
        let mut entry = MedicineEntry::new("Paracetamol").with_aliases(["Dolo", "Calpol"]);
        entry.uses = Some("Fever".into());
        entry.dosage = Some(Dosage {
            adult: DoseGuide {
                amount: "500mg".into(),
                interval: "4-6 hours".into(),
                max_per_day: "4g".into(),
            },
            child: DoseGuide::default(),
        });
        entry.side_effects = vec!["Nausea".into()];
        MedicineDetail {
            entry,
            tier: Some(MatchTier::ExactAlias),
            is_favorite: true,
        }
    }

    #[test]
    fn test_human_detail() {
        let text = format_detail(&detail(), Format::Human);

        assert!(text.starts_with("Paracetamol ♥\nAlso known as: Dolo, Calpol"));
        assert!(text.contains("Uses: Fever"));
        assert!(text.contains("Ingredients: -"));
        assert!(text.contains("Amount:      500mg"));
        assert!(text.contains("Max per Day: -"));
        assert!(text.ends_with("  - Nausea"));
    }

    #[test]
    fn test_json_detail() {
        let json: serde_json::Value =
            serde_json::from_str(&format_detail(&detail(), Format::Json)).unwrap();

        assert_eq!(json["entry"]["name"], "Paracetamol");
        assert_eq!(json["entry"]["dosage"]["adult"]["maxPerDay"], "4g");
        assert_eq!(json["tier"], "ExactAlias");
        assert_eq!(json["is_favorite"], true);
    }

    #[test]
    fn test_home_lists_recent() {
        let recent = vec!["Ibuprofen".to_string(), "Paracetamol".to_string()];
        assert_eq!(
            format_home(&recent, Format::Human),
            "Type a medicine name to search.\n\nRecent:\n  Ibuprofen\n  Paracetamol"
        );
        assert_eq!(format_home(&[], Format::Human), "Type a medicine name to search.");
    }

    #[test]
    fn test_highlight() {
        assert_eq!(highlight("Paracetamol", "CETA"), "Para[ceta]mol");
        assert_eq!(highlight("Ibuprofen", "xyz"), "Ibuprofen");
    }

    #[test]
    fn test_highlight_shifted_boundaries() {
        // Same byte length after lowercasing, but offsets fall inside characters.
        assert_eq!("İẞx".to_lowercase().len(), "İẞx".len());
        assert_eq!(highlight("İẞx", "ß"), "İẞx");
        assert_eq!(highlight("İẞx", "i"), "İẞx");
        assert_eq!(highlight("İẞx", "X"), "İẞ[x]");
    }

    #[test]
    fn test_history_numbering() {
        let names = vec!["A".to_string(), "B".to_string()];
        assert_eq!(format_history(&names, Format::Human), "1. A\n2. B");
        assert_eq!(format_history(&[], Format::Human), "No history yet.");
    }

    #[test]
    fn test_toggle_messages() {
        assert_eq!(format_toggle("Dolo", true, Format::Human), "Added Dolo to favorites");
        assert_eq!(format_toggle("Dolo", false, Format::Human), "Removed Dolo from favorites");
    }
}
