//! Merge adjacent diff entries into maximal render runs.
//!
//! Token-level output is fine-grained (every space is its own entry). For
//! rendering, consecutive entries with the same status and emphasis are
//! joined into a single run so a highlight spans a phrase, not each word.

use crate::models::{DiffEntry, DiffRun};

/// Coalesce adjacent entries with equal status and emphasis.
///
/// Line breaks always form their own run. Joining the run texts in order
/// reproduces the joined entry texts.
pub fn coalesce_runs(entries: &[DiffEntry]) -> Vec<DiffRun> {
    let mut runs: Vec<DiffRun> = Vec::new();

    for entry in entries {
        let should_merge = if let Some(last) = runs.last() {
            !last.is_line_break
                && !entry.is_line_break
                && last.status == entry.status
                && last.emphasis == entry.emphasis
        } else {
            false
        };

        if should_merge {
            if let Some(last) = runs.last_mut() {
                last.text.push_str(&entry.text);
            }
        } else {
            runs.push(DiffRun {
                text: entry.text.clone(),
                status: entry.status,
                emphasis: entry.emphasis,
                is_line_break: entry.is_line_break,
            });
        }
    }

    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DiffStatus, Token};

    fn entry(text: &str, status: DiffStatus, emphasis: bool) -> DiffEntry {
        DiffEntry::from_token(&Token::new(text, emphasis), status)
    }

    #[test]
    fn test_merge_same_status() {
        let entries = vec![
            entry("Who", DiffStatus::Common, false),
            entry(" ", DiffStatus::Common, false),
            entry("made", DiffStatus::Common, false),
            entry(" ", DiffStatus::Removed, false),
            entry("ruler", DiffStatus::Removed, false),
        ];
        let runs = coalesce_runs(&entries);

        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text, "Who made");
        assert_eq!(runs[0].status, DiffStatus::Common);
        assert_eq!(runs[1].text, " ruler");
        assert_eq!(runs[1].status, DiffStatus::Removed);
    }

    #[test]
    fn test_emphasis_splits_runs() {
        let entries = vec![
            entry("He", DiffStatus::Common, false),
            entry(" ", DiffStatus::Common, false),
            entry("said", DiffStatus::Common, true),
        ];
        let runs = coalesce_runs(&entries);
        assert_eq!(runs.len(), 2);
        assert!(runs[1].emphasis);
    }

    #[test]
    fn test_line_breaks_never_merge() {
        let line_break = DiffEntry::from_token(&Token::line_break(), DiffStatus::Common);
        let entries = vec![
            entry("a", DiffStatus::Common, false),
            line_break.clone(),
            line_break,
            entry("b", DiffStatus::Common, false),
        ];
        let runs = coalesce_runs(&entries);
        assert_eq!(runs.len(), 4);
        assert!(runs[1].is_line_break);
        assert!(runs[2].is_line_break);
    }

    #[test]
    fn test_runs_preserve_text() {
        let entries = vec![
            entry("a", DiffStatus::Common, false),
            entry("b", DiffStatus::Added, false),
            entry("c", DiffStatus::Added, true),
            entry("d", DiffStatus::Common, false),
        ];
        let joined: String = coalesce_runs(&entries).iter().map(|r| r.text.as_str()).collect();
        assert_eq!(joined, "abcd");
    }

    #[test]
    fn test_empty() {
        assert!(coalesce_runs(&[]).is_empty());
    }
}
