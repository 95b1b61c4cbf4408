//! Comparison orchestration.
//!
//! Ties the tokenizer and aligner together for one verse, and pairs verses
//! across two chapter documents for chapter-wide comparison.

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

use crate::align::align_tokens_with;
use crate::models::*;
use crate::tokenize::tokenize_with;

/// Compare one verse from two translations with default parameters.
///
/// Deterministic; each side's diff joins back to that side's tokenization.
pub fn compare_verses(base: &[StyledSegment], other: &[StyledSegment]) -> VerseDiff {
    compare_verses_with(base, other, &ComparisonParams::default())
}

/// Compare one verse from two translations.
pub fn compare_verses_with(
    base: &[StyledSegment],
    other: &[StyledSegment],
    params: &ComparisonParams,
) -> VerseDiff {
    diff_verse(base, other, params).0
}

/// Structural equality of two verses' raw content.
///
/// Cheap guard in front of tokenize + align: equal content always aligns
/// entirely `Common`.
#[inline]
pub fn content_identical(base: &[StyledSegment], other: &[StyledSegment]) -> bool {
    base == other
}

/// Diff one verse, returning whether the pre-check short-circuited it.
fn diff_verse(
    base: &[StyledSegment],
    other: &[StyledSegment],
    params: &ComparisonParams,
) -> (VerseDiff, bool) {
    let tokens_a = tokenize_with(base, params);

    if params.precheck && content_identical(base, other) {
        let common = |tokens: &[Token]| -> Vec<DiffEntry> {
            tokens
                .iter()
                .map(|t| DiffEntry::from_token(t, DiffStatus::Common))
                .collect()
        };
        let diff = VerseDiff {
            base_diff: common(&tokens_a),
            other_diff: common(&tokens_a),
        };
        return (diff, true);
    }

    let tokens_b = tokenize_with(other, params);
    debug!(
        base_tokens = tokens_a.len(),
        other_tokens = tokens_b.len(),
        "aligning verse"
    );

    (align_tokens_with(&tokens_a, &tokens_b, params), false)
}

/// Compare every verse two chapters have in common.
///
/// Verses are paired by number and compared in parallel. Verse numbers
/// present on only one side are listed in the result, not compared.
/// Result order follows the base chapter.
pub fn compare_chapters(
    base: &ChapterDocument,
    other: &ChapterDocument,
    params: &ComparisonParams,
    show_progress: bool,
) -> ChapterComparison {
    // First occurrence wins when a chapter repeats a verse number
    let mut other_index: HashMap<u32, &[StyledSegment]> = HashMap::new();
    for (number, content) in other.verses() {
        other_index.entry(number).or_insert(content);
    }

    let mut pairs = Vec::new();
    let mut missing_in_other = Vec::new();
    let mut base_numbers = HashSet::new();

    for (number, content) in base.verses() {
        if !base_numbers.insert(number) {
            continue;
        }
        match other_index.get(&number) {
            Some(other_content) => pairs.push((number, content, *other_content)),
            None => missing_in_other.push(number),
        }
    }

    let mut missing_in_base: Vec<u32> = other_index
        .keys()
        .copied()
        .filter(|n| !base_numbers.contains(n))
        .collect();
    missing_in_base.sort_unstable();

    info!(
        verses = pairs.len(),
        missing_in_other = missing_in_other.len(),
        missing_in_base = missing_in_base.len(),
        "comparing chapters"
    );
    if !missing_in_other.is_empty() {
        warn!(verses = ?missing_in_other, "verses missing from the other chapter");
    }
    if !missing_in_base.is_empty() {
        warn!(verses = ?missing_in_base, "verses missing from the base chapter");
    }

    if show_progress {
        eprintln!("Comparing {} verses...", pairs.len());
    }

    let progress = if show_progress {
        let pb = ProgressBar::new(pairs.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let verses: Vec<VerseComparison> = pairs
        .par_iter()
        .map(|&(number, base_content, other_content)| {
            let (diff, prechecked) = diff_verse(base_content, other_content, params);

            if let Some(ref pb) = progress {
                pb.inc(1);
            }

            VerseComparison {
                number,
                identical: diff.is_identical(),
                prechecked,
                diff,
            }
        })
        .collect();

    if let Some(pb) = progress {
        pb.finish_with_message("Done");
    }

    let summary = summarize(&verses);

    ChapterComparison {
        version: env!("CARGO_PKG_VERSION").to_string(),
        parameters: params.clone(),
        base_label: base.label().unwrap_or_else(|| "base".to_string()),
        other_label: other.label().unwrap_or_else(|| "other".to_string()),
        summary,
        verses,
        missing_in_other,
        missing_in_base,
    }
}

/// Aggregate statistics over compared verses.
pub fn summarize(verses: &[VerseComparison]) -> ComparisonSummary {
    let identical_verses = verses.iter().filter(|v| v.identical).count();

    ComparisonSummary {
        verses_compared: verses.len(),
        identical_verses,
        differing_verses: verses.len() - identical_verses,
        prechecked_verses: verses.iter().filter(|v| v.prechecked).count(),
        base_tokens: verses.iter().map(|v| v.diff.base_diff.len()).sum(),
        other_tokens: verses.iter().map(|v| v.diff.other_diff.len()).sum(),
        common_tokens: verses.iter().map(|v| v.diff.common_count()).sum(),
        added_tokens: verses.iter().map(|v| v.diff.added_count()).sum(),
        removed_tokens: verses.iter().map(|v| v.diff.removed_count()).sum(),
        avg_similarity: if verses.is_empty() {
            0.0
        } else {
            verses.iter().map(|v| v.diff.similarity()).sum::<f32>() / verses.len() as f32
        },
    }
}
