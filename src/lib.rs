//! Verse Diff Library
//!
//! Word-level comparison of one verse as rendered by two Bible translations.
//! Structured verse content (plain text, styled text, footnote markers, line
//! breaks) is tokenized into words, punctuation and whitespace, and the two
//! token streams are aligned with a longest common subsequence so each side
//! comes back classified as common, added or removed.
//!
//! # Example
//!
//! ```
//! use verse_diff::prelude::*;
//!
//! let base = vec![StyledSegment::plain("Who made you ruler")];
//! let other = vec![StyledSegment::plain("Who made you judge")];
//!
//! let diff = compare_verses(&base, &other);
//!
//! assert_eq!(diff.removed_count(), 1);
//! assert_eq!(diff.added_count(), 1);
//! assert_eq!(format_side(&diff.base_diff), "Who made you [-ruler-]");
//! ```
//!
//! # Chapter Example
//!
//! ```no_run
//! use verse_diff::prelude::*;
//! use std::path::Path;
//!
//! let base = load_chapter(Path::new("BSB_EXO_2.json")).unwrap();
//! let other = load_chapter(Path::new("MSB_EXO_2.json")).unwrap();
//!
//! let result = compare_chapters(&base, &other, &ComparisonParams::default(), false);
//!
//! println!("{} of {} verses differ", result.summary.differing_verses, result.summary.verses_compared);
//! ```

pub mod align;
pub mod compare;
pub mod load;
pub mod merge;
pub mod models;
pub mod output;
pub mod telemetry;
pub mod tokenize;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::align::{
        align_tokens, align_tokens_with, lcs_length, normalize_token_text, tokens_equal, LcsTable,
    };
    pub use crate::compare::{
        compare_chapters, compare_verses, compare_verses_with, content_identical, summarize,
    };
    pub use crate::load::{load_chapter, parse_chapter, verse_content, LoadError};
    pub use crate::merge::coalesce_runs;
    pub use crate::models::{
        BookRef, ChapterBody, ChapterComparison, ChapterContent, ChapterDocument,
        ComparisonParams, ComparisonSummary, DiffEntry, DiffRun, DiffStatus, Footnote,
        MatchMode, StyledSegment, TieBreak, Token, TranslationInfo, VerseComparison, VerseDiff,
    };
    pub use crate::output::{
        format_side, format_verse, format_verse_diff, print_summary, print_verse_diffs,
        write_csv, write_csv_file, write_json, write_json_file, write_text, write_text_file,
        write_verse_json, OutputError,
    };
    pub use crate::tokenize::{tokenize, tokenize_with};
}

// Re-export commonly used types at the crate root
pub use compare::{compare_verses, compare_verses_with};
pub use models::{ComparisonParams, DiffEntry, DiffStatus, StyledSegment, Token, VerseDiff};
