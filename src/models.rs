//! Data structures for the verse comparison pipeline.

use serde::{Deserialize, Serialize};

// ============================================================================
// Verse content
// ============================================================================

/// One element of a verse's content array.
///
/// Deserializes from the loosely shaped JSON used by translation chapter
/// documents (a bare string, `{text, wordsOfJesus}`, `{noteId}` or
/// `{lineBreak}`). Any other shape becomes an empty `PlainText`, which the
/// tokenizer skips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSegment", into = "RawSegment")]
pub enum StyledSegment {
    /// Raw words and punctuation.
    PlainText(String),
    /// Words carrying a rendering attribute (words of Jesus).
    StyledText { text: String, emphasis: bool },
    /// Reference to a footnote; has no visible text.
    FootnoteMarker { id: u32 },
    /// Forced line break inside the verse.
    LineBreak,
}

impl StyledSegment {
    pub fn plain(text: impl Into<String>) -> Self {
        StyledSegment::PlainText(text.into())
    }

    pub fn styled(text: impl Into<String>, emphasis: bool) -> Self {
        StyledSegment::StyledText {
            text: text.into(),
            emphasis,
        }
    }

    /// Visible text carried by this segment, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            StyledSegment::PlainText(text) => Some(text),
            StyledSegment::StyledText { text, .. } => Some(text),
            StyledSegment::FootnoteMarker { .. } | StyledSegment::LineBreak => None,
        }
    }

    /// Emphasis flag; always false for plain text.
    pub fn emphasis(&self) -> bool {
        matches!(self, StyledSegment::StyledText { emphasis: true, .. })
    }
}

/// Wire shape of a segment. Variant order matters: untagged matching tries
/// each shape top to bottom.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawSegment {
    Plain(String),
    Note {
        #[serde(rename = "noteId")]
        note_id: u32,
    },
    LineBreak {
        #[serde(rename = "lineBreak")]
        line_break: bool,
    },
    Styled {
        text: String,
        #[serde(rename = "wordsOfJesus", default, skip_serializing_if = "is_false")]
        words_of_jesus: bool,
    },
    Unknown(serde_json::Value),
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl From<RawSegment> for StyledSegment {
    fn from(raw: RawSegment) -> Self {
        match raw {
            RawSegment::Plain(text) => StyledSegment::PlainText(text),
            RawSegment::Note { note_id } => StyledSegment::FootnoteMarker { id: note_id },
            RawSegment::LineBreak { .. } => StyledSegment::LineBreak,
            RawSegment::Styled {
                text,
                words_of_jesus,
            } => StyledSegment::StyledText {
                text,
                emphasis: words_of_jesus,
            },
            RawSegment::Unknown(_) => StyledSegment::PlainText(String::new()),
        }
    }
}

impl From<StyledSegment> for RawSegment {
    fn from(segment: StyledSegment) -> Self {
        match segment {
            StyledSegment::PlainText(text) => RawSegment::Plain(text),
            StyledSegment::StyledText { text, emphasis } => RawSegment::Styled {
                text,
                words_of_jesus: emphasis,
            },
            StyledSegment::FootnoteMarker { id } => RawSegment::Note { note_id: id },
            StyledSegment::LineBreak => RawSegment::LineBreak { line_break: true },
        }
    }
}

// ============================================================================
// Tokens and diff entries
// ============================================================================

/// Smallest comparable unit of a verse: a word, punctuation run,
/// whitespace run or forced line break.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub text: String,
    pub emphasis: bool,
    pub is_line_break: bool,
}

impl Token {
    pub fn new(text: impl Into<String>, emphasis: bool) -> Self {
        Token {
            text: text.into(),
            emphasis,
            is_line_break: false,
        }
    }

    /// A single space standing in for an elided separator.
    pub fn space() -> Self {
        Token::new(" ", false)
    }

    pub fn line_break() -> Self {
        Token {
            text: "\n".to_string(),
            emphasis: false,
            is_line_break: true,
        }
    }
}

/// Classification of a diff entry relative to the other side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffStatus {
    /// Present on both sides.
    Common,
    /// Only in the comparison (other) side.
    Added,
    /// Only in the base side.
    Removed,
}

impl DiffStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DiffStatus::Common => "common",
            DiffStatus::Added => "added",
            DiffStatus::Removed => "removed",
        }
    }
}

/// One classified token of a verse diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffEntry {
    pub text: String,
    pub status: DiffStatus,
    pub emphasis: bool,
    pub is_line_break: bool,
}

impl DiffEntry {
    pub fn from_token(token: &Token, status: DiffStatus) -> Self {
        DiffEntry {
            text: token.text.clone(),
            status,
            emphasis: token.emphasis,
            is_line_break: token.is_line_break,
        }
    }
}

/// Aligned output for one verse: one classified stream per side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseDiff {
    pub base_diff: Vec<DiffEntry>,
    pub other_diff: Vec<DiffEntry>,
}

impl VerseDiff {
    /// True when neither side has an added or removed entry.
    pub fn is_identical(&self) -> bool {
        self.base_diff
            .iter()
            .chain(self.other_diff.iter())
            .all(|e| e.status == DiffStatus::Common)
    }

    /// Number of common entries (equal on both sides).
    pub fn common_count(&self) -> usize {
        count_status(&self.base_diff, DiffStatus::Common)
    }

    pub fn added_count(&self) -> usize {
        count_status(&self.other_diff, DiffStatus::Added)
    }

    pub fn removed_count(&self) -> usize {
        count_status(&self.base_diff, DiffStatus::Removed)
    }

    /// Dice similarity over tokens: 2 * common / (base + other).
    pub fn similarity(&self) -> f32 {
        let total = self.base_diff.len() + self.other_diff.len();
        if total == 0 {
            return 1.0;
        }
        (2 * self.common_count()) as f32 / total as f32
    }

    pub fn base_text(&self) -> String {
        join_texts(&self.base_diff)
    }

    pub fn other_text(&self) -> String {
        join_texts(&self.other_diff)
    }
}

fn count_status(entries: &[DiffEntry], status: DiffStatus) -> usize {
    entries.iter().filter(|e| e.status == status).count()
}

fn join_texts(entries: &[DiffEntry]) -> String {
    entries.iter().map(|e| e.text.as_str()).collect()
}

/// Adjacent diff entries sharing status and emphasis, joined for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffRun {
    pub text: String,
    pub status: DiffStatus,
    pub emphasis: bool,
    pub is_line_break: bool,
}

// ============================================================================
// Parameters
// ============================================================================

/// Token equality used during alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Exact text equality (default)
    #[default]
    Exact,
    /// Orthographic folding: quotes, question marks, case, whitespace runs
    Normalized,
}

/// Which side the backtrack consumes when both moves keep the LCS length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Consume from the other side first (`L[i][j-1] >= L[i-1][j]`)
    #[default]
    PreferAdded,
    /// Consume from the base side first
    PreferRemoved,
}

/// Comparison parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonParams {
    pub mode: MatchMode,
    pub tie_break: TieBreak,
    pub implicit_spacing: bool, // Insert a space between run-together segments
    pub precheck: bool,         // Skip alignment for structurally equal verses
}

impl Default for ComparisonParams {
    fn default() -> Self {
        Self {
            mode: MatchMode::Exact,
            tie_break: TieBreak::PreferAdded,
            implicit_spacing: false,
            precheck: true,
        }
    }
}

// ============================================================================
// Chapter documents
// ============================================================================

/// A chapter as served by the translation API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChapterDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<TranslationInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book: Option<BookRef>,
    pub chapter: ChapterBody,
}

impl ChapterDocument {
    /// Wrap a bare content array into a document without metadata.
    pub fn from_content(content: Vec<ChapterContent>) -> Self {
        ChapterDocument {
            translation: None,
            book: None,
            chapter: ChapterBody {
                number: 0,
                content,
                footnotes: Vec::new(),
            },
        }
    }

    /// Iterate verses in document order as (number, content).
    pub fn verses(&self) -> impl Iterator<Item = (u32, &[StyledSegment])> + '_ {
        self.chapter.content.iter().filter_map(|item| match item {
            ChapterContent::Verse { number, content } => Some((*number, content.as_slice())),
            _ => None,
        })
    }

    /// Number of verses in the chapter.
    pub fn verse_count(&self) -> usize {
        self.verses().count()
    }

    /// Short label for reports: translation short name, then id.
    pub fn label(&self) -> Option<String> {
        let translation = self.translation.as_ref()?;
        translation
            .short_name
            .clone()
            .or_else(|| translation.id.clone())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationInfo {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub english_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChapterBody {
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub content: Vec<ChapterContent>,
    #[serde(default)]
    pub footnotes: Vec<Footnote>,
}

/// One item of a chapter's content list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChapterContent {
    Heading {
        #[serde(default)]
        content: Vec<String>,
    },
    LineBreak,
    Verse {
        number: u32,
        #[serde(default)]
        content: Vec<StyledSegment>,
    },
    HebrewSubtitle {
        #[serde(default)]
        content: Vec<serde_json::Value>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Footnote {
    pub note_id: u32,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller: Option<String>,
}

// ============================================================================
// Comparison results
// ============================================================================

/// Result of comparing one verse across the two chapters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerseComparison {
    pub number: u32,
    pub identical: bool,
    pub prechecked: bool, // Alignment skipped by the structural pre-check
    pub diff: VerseDiff,
}

/// Full chapter comparison result
#[derive(Debug, Serialize, Deserialize)]
pub struct ChapterComparison {
    pub version: String,
    pub parameters: ComparisonParams,
    pub base_label: String,
    pub other_label: String,
    pub summary: ComparisonSummary,
    pub verses: Vec<VerseComparison>,
    pub missing_in_other: Vec<u32>, // Verse numbers only the base chapter has
    pub missing_in_base: Vec<u32>,  // Verse numbers only the other chapter has
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub verses_compared: usize,
    pub identical_verses: usize,
    pub differing_verses: usize,
    pub prechecked_verses: usize,
    pub base_tokens: usize,
    pub other_tokens: usize,
    pub common_tokens: usize,
    pub added_tokens: usize,
    pub removed_tokens: usize,
    pub avg_similarity: f32,
}
