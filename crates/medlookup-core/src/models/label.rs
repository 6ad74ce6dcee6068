//! Label text models produced by the token extractor.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A normalized word read from a medicine label.
///
/// Alphanumeric, 3 to 19 characters, capitalized (`Paracetamol`, `650mg`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OcrToken(String);

impl OcrToken {
    pub(crate) fn new(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OcrToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which selection rule produced a candidate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SelectionRule {
    /// Token found in the medicine priority list
    PriorityList,
    /// Token followed by a dosage marker such as `650mg`
    DosageAdjacent,
    /// First surviving token
    FirstToken,
}

/// Best-guess medicine name extracted from label text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateName {
    /// Text handed to the resolver as a query
    pub text: String,
    /// Rule that selected it
    pub rule: SelectionRule,
}

impl CandidateName {
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for CandidateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
