//! Loading chapter documents from JSON files.

use crate::models::{ChapterContent, ChapterDocument, StyledSegment};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Verse not found: {0}")]
    VerseNotFound(u32),
}

/// Parse a chapter document from a JSON string.
///
/// Accepts the full API document or a bare content array; the shape is
/// picked from the first non-whitespace character so parse errors point at
/// the real problem.
pub fn parse_chapter(json: &str) -> Result<ChapterDocument, LoadError> {
    if json.trim_start().starts_with('[') {
        let content: Vec<ChapterContent> = serde_json::from_str(json)?;
        return Ok(ChapterDocument::from_content(content));
    }
    Ok(serde_json::from_str(json)?)
}

/// Load a chapter document from a JSON file.
pub fn load_chapter(path: &Path) -> Result<ChapterDocument, LoadError> {
    let json = std::fs::read_to_string(path)?;
    let doc = parse_chapter(&json)?;
    debug!(
        path = %path.display(),
        verses = doc.verse_count(),
        "loaded chapter"
    );
    Ok(doc)
}

/// Content of one verse, by number. The first occurrence wins.
pub fn verse_content(doc: &ChapterDocument, number: u32) -> Result<&[StyledSegment], LoadError> {
    doc.verses()
        .find(|(n, _)| *n == number)
        .map(|(_, content)| content)
        .ok_or(LoadError::VerseNotFound(number))
}
