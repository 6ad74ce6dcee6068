//! Medicine catalog models.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// A single medicine record in the reference catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedicineEntry {
    /// Primary display name
    pub name: String,
    /// Alternative names/brands, in catalog order
    #[serde(default, deserialize_with = "list_or_empty")]
    pub other_names: Vec<String>,
    /// What the medicine is used for
    #[serde(default)]
    pub uses: Option<String>,
    /// Active ingredients (a single string on the wire is accepted)
    #[serde(default, deserialize_with = "ingredients_list")]
    pub ingredients: Vec<String>,
    /// Recommended dosage for adults and children
    #[serde(default)]
    pub dosage: Option<Dosage>,
    /// Potential side effects
    #[serde(default, deserialize_with = "list_or_empty")]
    pub side_effects: Vec<String>,
}

/// Recommended dosage split by patient group.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Dosage {
    pub adult: DoseGuide,
    pub child: DoseGuide,
}

/// Dose guidance for one patient group.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DoseGuide {
    /// Amount per dose (e.g., "500mg")
    pub amount: String,
    /// Time between doses (e.g., "4-6 hours")
    pub interval: String,
    /// Daily ceiling (e.g., "4g")
    pub max_per_day: String,
}

impl MedicineEntry {
    /// Create a new entry with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            other_names: Vec::new(),
            uses: None,
            ingredients: Vec::new(),
            dosage: None,
            side_effects: Vec::new(),
        }
    }

    /// Builder-style alias setter.
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.other_names = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// Uses line for display, `-` when absent.
    pub fn uses_display(&self) -> &str {
        self.uses.as_deref().filter(|u| !u.is_empty()).unwrap_or("-")
    }

    /// Ingredients joined for display, `-` when absent.
    pub fn ingredients_display(&self) -> String {
        if self.ingredients.is_empty() {
            "-".to_string()
        } else {
            self.ingredients.join(", ")
        }
    }
}

/// Catalog loading errors.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The read-only, ordered medicine catalog.
///
/// Built once at startup; nothing in the crate mutates it afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: Vec<MedicineEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<MedicineEntry>) -> Self {
        Self { entries }
    }

    /// The defined state when no catalog could be loaded.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a JSON array of medicine records.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let entries: Vec<MedicineEntry> = serde_json::from_str(json)?;
        Ok(Self::new(entries))
    }

    /// Load a catalog file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load a catalog file, falling back to the empty catalog on any failure.
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(catalog) => {
                info!("Loaded {} medicines from {}", catalog.len(), path.display());
                catalog
            }
            Err(e) => {
                warn!("Error loading medicines from {}: {}", path.display(), e);
                Self::empty()
            }
        }
    }

    pub fn entries(&self) -> &[MedicineEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact (case-sensitive) lookup by primary name.
    pub fn get(&self, name: &str) -> Option<&MedicineEntry> {
        self.entries.iter().find(|e| e.name == name)
    }
}

fn list_or_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IngredientsField {
    One(String),
    Many(Vec<String>),
}

fn ingredients_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<IngredientsField>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(IngredientsField::One(s)) if s.trim().is_empty() => Vec::new(),
        Some(IngredientsField::One(s)) => vec![s],
        Some(IngredientsField::Many(list)) => list,
    })
}
