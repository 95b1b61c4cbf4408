//! Output formatting for comparison results (JSON, CSV, plain text).

use crate::merge::coalesce_runs;
use crate::models::{ChapterComparison, DiffEntry, DiffStatus, VerseComparison, VerseDiff};
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write a chapter comparison as JSON.
pub fn write_json<W: Write>(result: &ChapterComparison, writer: &mut W) -> Result<(), OutputError> {
    let json = serde_json::to_string_pretty(result)?;
    writer.write_all(json.as_bytes())?;
    Ok(())
}

/// Write a chapter comparison as JSON to a file.
pub fn write_json_file(result: &ChapterComparison, path: &Path) -> Result<(), OutputError> {
    let mut file = std::fs::File::create(path)?;
    write_json(result, &mut file)
}

/// Write a single verse diff as JSON (`{ baseDiff, otherDiff }`).
pub fn write_verse_json<W: Write>(diff: &VerseDiff, writer: &mut W) -> Result<(), OutputError> {
    let json = serde_json::to_string_pretty(diff)?;
    writer.write_all(json.as_bytes())?;
    Ok(())
}

/// Write every diff entry as one CSV row.
pub fn write_csv<W: Write>(verses: &[VerseComparison], writer: &mut W) -> Result<(), OutputError> {
    // Write header
    writeln!(writer, "verse,side,index,status,emphasis,line_break,text")?;

    // Write rows
    for verse in verses {
        write_csv_side(writer, verse.number, "base", &verse.diff.base_diff)?;
        write_csv_side(writer, verse.number, "other", &verse.diff.other_diff)?;
    }

    Ok(())
}

fn write_csv_side<W: Write>(
    writer: &mut W,
    number: u32,
    side: &str,
    entries: &[DiffEntry],
) -> Result<(), OutputError> {
    for (index, entry) in entries.iter().enumerate() {
        writeln!(
            writer,
            "{},{},{},{},{},{},{:?}",
            number,
            side,
            index,
            entry.status.as_str(),
            entry.emphasis,
            entry.is_line_break,
            entry.text
        )?;
    }
    Ok(())
}

/// Write diff entries as CSV to a file.
pub fn write_csv_file(verses: &[VerseComparison], path: &Path) -> Result<(), OutputError> {
    let mut file = std::fs::File::create(path)?;
    write_csv(verses, &mut file)
}

/// Write every compared verse in the plain-text marker format.
pub fn write_text<W: Write>(result: &ChapterComparison, writer: &mut W) -> Result<(), OutputError> {
    writeln!(writer, "{} -> {}", result.base_label, result.other_label)?;
    for verse in &result.verses {
        writeln!(writer, "{}", format_verse(verse))?;
    }
    Ok(())
}

/// Write the plain-text format to a file.
pub fn write_text_file(result: &ChapterComparison, path: &Path) -> Result<(), OutputError> {
    let mut file = std::fs::File::create(path)?;
    write_text(result, &mut file)
}

/// Render one side of a diff with inline markers.
///
/// Removed runs appear as `[-text-]`, added runs as `{+text+}`; common text
/// and line breaks are written as-is.
pub fn format_side(entries: &[DiffEntry]) -> String {
    let mut out = String::new();
    for run in coalesce_runs(entries) {
        match run.status {
            _ if run.is_line_break => out.push('\n'),
            DiffStatus::Common => out.push_str(&run.text),
            DiffStatus::Removed => {
                out.push_str("[-");
                out.push_str(&run.text);
                out.push_str("-]");
            }
            DiffStatus::Added => {
                out.push_str("{+");
                out.push_str(&run.text);
                out.push_str("+}");
            }
        }
    }
    out
}

/// Format a verse diff as base and other lines with markers.
pub fn format_verse_diff(diff: &VerseDiff) -> String {
    format!(
        "  base:  {}\n  other: {}",
        format_side(&diff.base_diff),
        format_side(&diff.other_diff)
    )
}

/// Format a verse comparison as a human-readable string.
pub fn format_verse(verse: &VerseComparison) -> String {
    if verse.identical {
        return format!("Verse {}: identical", verse.number);
    }
    format!(
        "Verse {}: common={} removed={} added={} similarity={:.1}%\n{}",
        verse.number,
        verse.diff.common_count(),
        verse.diff.removed_count(),
        verse.diff.added_count(),
        verse.diff.similarity() * 100.0,
        format_verse_diff(&verse.diff)
    )
}

/// Print differing verses in a human-readable format.
pub fn print_verse_diffs(verses: &[VerseComparison], limit: Option<usize>) {
    let differing: Vec<&VerseComparison> = verses.iter().filter(|v| !v.identical).collect();
    let to_print = match limit {
        Some(n) => &differing[..n.min(differing.len())],
        None => &differing[..],
    };

    for verse in to_print {
        println!("{}", format_verse(verse));
    }

    if let Some(n) = limit {
        if differing.len() > n {
            println!("... and {} more differing verses", differing.len() - n);
        }
    }
}

/// Write a summary report to stdout.
pub fn print_summary(result: &ChapterComparison) {
    println!("\n=== Comparison Summary ===");
    println!("Version: {}", result.version);
    println!();
    println!("Base: {}", result.base_label);
    println!("Other: {}", result.other_label);
    println!();
    println!("Parameters:");
    println!("  Match mode: {:?}", result.parameters.mode);
    println!("  Tie break: {:?}", result.parameters.tie_break);
    println!("  Implicit spacing: {}", result.parameters.implicit_spacing);
    println!("  Pre-check: {}", result.parameters.precheck);
    println!();
    println!("Results:");
    println!("  Verses compared: {}", result.summary.verses_compared);
    println!("  Identical verses: {}", result.summary.identical_verses);
    println!("  Differing verses: {}", result.summary.differing_verses);
    println!("  Short-circuited by pre-check: {}", result.summary.prechecked_verses);
    println!(
        "  Tokens: {} base, {} other, {} common",
        result.summary.base_tokens, result.summary.other_tokens, result.summary.common_tokens
    );
    println!(
        "  Removed: {}  Added: {}",
        result.summary.removed_tokens, result.summary.added_tokens
    );
    println!("  Average similarity: {:.1}%", result.summary.avg_similarity * 100.0);
    if !result.missing_in_other.is_empty() {
        println!("  Missing from other: {}", format_numbers(&result.missing_in_other));
    }
    if !result.missing_in_base.is_empty() {
        println!("  Missing from base: {}", format_numbers(&result.missing_in_base));
    }
}

fn format_numbers(numbers: &[u32]) -> String {
    numbers
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
