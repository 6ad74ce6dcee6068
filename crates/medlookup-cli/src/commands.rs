//! Subcommand execution against a lookup session.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use medlookup_core::resolver::{extract_candidate, tokenize};
use medlookup_core::{Catalog, Database, LabelHeuristics, LookupSession, SearchOutcome, SearchQuery};
use medlookup_ocr::{scan_label, ImagePayload, OcrError, OcrSpaceClient};
use tracing::info;

use crate::config::{Config, OCR_API_KEY_ENV};
use crate::output::{self, Format};

/// Open the on-disk session described by config and flags.
pub fn open_session(
    config: &Config,
    catalog_flag: Option<&PathBuf>,
    data_dir_flag: Option<&PathBuf>,
) -> Result<LookupSession> {
    let data_dir = config.data_dir(data_dir_flag)?;
    fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

    let db_path = config.database_path(data_dir_flag)?;
    let db = Database::open(&db_path)
        .with_context(|| format!("Failed to open database: {}", db_path.display()))?;

    let catalog = Catalog::load_or_empty(config.catalog_path(catalog_flag));
    Ok(LookupSession::open(db, catalog, config.heuristics()))
}

pub fn search(session: &mut LookupSession, query: &str, format: Format) -> Result<String> {
    let outcome = session.search(query)?;
    Ok(render_outcome(session, outcome, format))
}

fn render_outcome(session: &LookupSession, outcome: SearchOutcome, format: Format) -> String {
    match outcome {
        SearchOutcome::Empty => output::format_home(session.history_preview(), format),
        SearchOutcome::Found(detail) => output::format_detail(&detail, format),
    }
}

pub fn suggest(session: &LookupSession, prefix: &str, limit: usize, format: Format) -> String {
    let suggestions = session.suggest(prefix, limit);
    output::format_suggestions(prefix, &suggestions, format)
}

/// Run the label extractor alone, without touching the catalog.
pub fn extract(heuristics: &LabelHeuristics, text: &str, format: Format) -> String {
    let tokens = tokenize(text, heuristics);
    let candidate = extract_candidate(text, heuristics);
    output::format_extraction(&tokens, candidate.as_ref(), format)
}

/// Send a label photo to OCR.space and open the medicine it names.
pub async fn scan(
    session: &mut LookupSession,
    config: &Config,
    image_path: &Path,
    format: Format,
) -> Result<String> {
    let api_key = config.ocr.api_key.clone().unwrap_or_default();
    let client = OcrSpaceClient::new(api_key, config.ocr_options()).map_err(|e| match e {
        OcrError::MissingApiKey => anyhow!(
            "OCR API key is not configured. Set {} or ocr.api_key in the config file",
            OCR_API_KEY_ENV
        ),
        other => other.into(),
    })?;

    let image = ImagePayload::from_path(image_path)
        .with_context(|| format!("Failed to read image: {}", image_path.display()))?;
    info!("Read {} bytes from {}", image.len(), image_path.display());

    let outcome = scan_label(session, &client, &image).await?;
    Ok(render_outcome(session, outcome, format))
}

pub fn list_favorites(session: &LookupSession, format: Format) -> String {
    output::format_favorites(&session.favorites(), format)
}

pub fn toggle_favorite(session: &mut LookupSession, name: &str, format: Format) -> Result<String> {
    // Accept any spelling the resolver understands, then key on the catalog name.
    let canonical = match session.catalog().get(name) {
        Some(entry) => entry.name.clone(),
        None => SearchQuery::new(name)
            .and_then(|query| session.resolver().resolve(&query).entry())
            .map(|entry| entry.name.clone())
            .unwrap_or_else(|| name.to_string()),
    };
    let is_favorite = session.toggle_favorite(&canonical)?;
    Ok(output::format_toggle(&canonical, is_favorite, format))
}

pub fn history(
    session: &mut LookupSession,
    limit: Option<usize>,
    clear: bool,
    format: Format,
) -> Result<String> {
    if clear {
        session.clear_history()?;
    }
    let names = match limit {
        Some(n) => session.recent(n),
        None => session.history(),
    };
    Ok(output::format_history(names, format))
}
