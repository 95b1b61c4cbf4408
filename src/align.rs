//! Longest-common-subsequence alignment of two token streams.
//!
//! Both streams are aligned in full, whitespace included, so spacing
//! differences show up in the diff. The table is O(n*m) in time and space,
//! which is fine at verse length.

use std::borrow::Cow;

use crate::models::{ComparisonParams, DiffEntry, DiffStatus, MatchMode, TieBreak, Token, VerseDiff};

/// LCS length table for two key sequences.
///
/// `get(i, j)` is the LCS length of the first `i` base keys and the first
/// `j` other keys.
#[derive(Debug, Clone)]
pub struct LcsTable {
    width: usize,
    cells: Vec<u32>,
}

impl LcsTable {
    /// Fill the table. Row 0 and column 0 stay zero.
    pub fn build<K: PartialEq>(base: &[K], other: &[K]) -> Self {
        let n = base.len();
        let m = other.len();

        // Flat Vec for cache efficiency: L[i][j] = cells[i * width + j]
        let width = m + 1;
        let mut cells = vec![0u32; (n + 1) * width];

        for i in 1..=n {
            let row = i * width;
            let prev_row = (i - 1) * width;
            let key_a = &base[i - 1];

            for j in 1..=m {
                cells[row + j] = if *key_a == other[j - 1] {
                    cells[prev_row + j - 1] + 1
                } else {
                    cells[prev_row + j].max(cells[row + j - 1])
                };
            }
        }

        LcsTable { width, cells }
    }

    #[inline(always)]
    pub fn get(&self, i: usize, j: usize) -> u32 {
        self.cells[i * self.width + j]
    }

    /// Length of the full LCS.
    pub fn length(&self) -> u32 {
        self.cells.last().copied().unwrap_or(0)
    }
}

/// Align two token streams with default parameters.
pub fn align_tokens(base: &[Token], other: &[Token]) -> VerseDiff {
    align_tokens_with(base, other, &ComparisonParams::default())
}

/// Align two token streams into one classified diff per side.
///
/// Total for every input: an empty side makes the other side entirely
/// `Added` (or `Removed`). Each side's entries keep that side's token text
/// and rendering metadata, in source order.
pub fn align_tokens_with(base: &[Token], other: &[Token], params: &ComparisonParams) -> VerseDiff {
    let keys_a = comparison_keys(base, params.mode);
    let keys_b = comparison_keys(other, params.mode);
    let table = LcsTable::build(&keys_a, &keys_b);

    let mut base_diff = Vec::with_capacity(base.len());
    let mut other_diff = Vec::with_capacity(other.len());

    // Backtrack from the bottom-right corner; output is built in reverse
    let mut i = base.len();
    let mut j = other.len();

    while i > 0 || j > 0 {
        if i > 0 && j > 0 && keys_a[i - 1] == keys_b[j - 1] {
            base_diff.push(DiffEntry::from_token(&base[i - 1], DiffStatus::Common));
            other_diff.push(DiffEntry::from_token(&other[j - 1], DiffStatus::Common));
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || take_other_first(&table, i, j, params.tie_break)) {
            other_diff.push(DiffEntry::from_token(&other[j - 1], DiffStatus::Added));
            j -= 1;
        } else {
            base_diff.push(DiffEntry::from_token(&base[i - 1], DiffStatus::Removed));
            i -= 1;
        }
    }

    base_diff.reverse();
    other_diff.reverse();

    VerseDiff {
        base_diff,
        other_diff,
    }
}

/// Decide the move at a mismatch with both `i` and `j` positive.
#[inline(always)]
fn take_other_first(table: &LcsTable, i: usize, j: usize, tie_break: TieBreak) -> bool {
    let left = table.get(i, j - 1);
    let up = table.get(i - 1, j);
    match tie_break {
        TieBreak::PreferAdded => left >= up,
        TieBreak::PreferRemoved => left > up,
    }
}

/// LCS length of two token streams under a match mode.
pub fn lcs_length(base: &[Token], other: &[Token], mode: MatchMode) -> usize {
    let keys_a = comparison_keys(base, mode);
    let keys_b = comparison_keys(other, mode);
    LcsTable::build(&keys_a, &keys_b).length() as usize
}

/// Whether two tokens align under a match mode. Emphasis never matters.
pub fn tokens_equal(a: &Token, b: &Token, mode: MatchMode) -> bool {
    comparison_key(a, mode) == comparison_key(b, mode)
}

fn comparison_keys(tokens: &[Token], mode: MatchMode) -> Vec<Cow<'_, str>> {
    tokens.iter().map(|t| comparison_key(t, mode)).collect()
}

fn comparison_key(token: &Token, mode: MatchMode) -> Cow<'_, str> {
    match mode {
        MatchMode::Exact => Cow::Borrowed(token.text.as_str()),
        MatchMode::Normalized if token.is_line_break => Cow::Borrowed(token.text.as_str()),
        MatchMode::Normalized => normalize_token_text(&token.text),
    }
}

/// Orthographic folding used by `MatchMode::Normalized`.
///
/// Whitespace runs all fold to a single space. Otherwise zero-width
/// characters are removed, the text is trimmed, quote and question-mark
/// variants fold to their ASCII forms and letters are lowercased.
pub fn normalize_token_text(text: &str) -> Cow<'_, str> {
    if !text.is_empty() && text.chars().all(char::is_whitespace) {
        return Cow::Borrowed(" ");
    }

    let needs_folding = text
        .chars()
        .any(|c| !c.is_ascii() || c.is_ascii_uppercase() || c.is_whitespace());
    if !needs_folding {
        return Cow::Borrowed(text);
    }

    let folded: String = text
        .chars()
        .filter(|c| !matches!(*c, '\u{200B}'..='\u{200D}' | '\u{FEFF}'))
        .collect::<String>()
        .trim()
        .chars()
        .map(fold_char)
        .flat_map(char::to_lowercase)
        .collect();
    Cow::Owned(folded)
}

fn fold_char(c: char) -> char {
    match c {
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' | '\u{2035}' => '\'',
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' | '\u{2036}' => '"',
        '\u{037E}' | '\u{055E}' | '\u{061F}' | '\u{1367}' | '\u{203D}' | '\u{2047}'
        | '\u{2048}' | '\u{2049}' | '\u{2CFA}' | '\u{2CFB}' | '\u{2E2E}' | '\u{A60F}'
        | '\u{A6F7}' | '\u{FE56}' | '\u{FF1F}' => '?',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(texts: &[&str]) -> Vec<Token> {
        texts.iter().map(|t| Token::new(*t, false)).collect()
    }

    fn statuses(entries: &[DiffEntry]) -> Vec<DiffStatus> {
        entries.iter().map(|e| e.status).collect()
    }

    #[test]
    fn test_identical_sequences() {
        let seq = words(&["In", " ", "the", " ", "beginning"]);
        let diff = align_tokens(&seq, &seq);

        assert!(diff.is_identical());
        assert_eq!(diff.base_diff.len(), seq.len());
        assert_eq!(diff.other_diff.len(), seq.len());
        assert_eq!(diff.base_text(), "In the beginning");
    }

    #[test]
    fn test_single_substitution() {
        let base = words(&["Who", "made", "you", "ruler"]);
        let other = words(&["Who", "made", "you", "judge"]);
        let diff = align_tokens(&base, &other);

        use DiffStatus::*;
        assert_eq!(statuses(&diff.base_diff), vec![Common, Common, Common, Removed]);
        assert_eq!(statuses(&diff.other_diff), vec![Common, Common, Common, Added]);
        assert_eq!(diff.base_diff[3].text, "ruler");
        assert_eq!(diff.other_diff[3].text, "judge");
    }

    #[test]
    fn test_empty_sequences() {
        let seq = words(&["a", "b"]);

        let diff = align_tokens(&[], &seq);
        assert!(diff.base_diff.is_empty());
        assert_eq!(statuses(&diff.other_diff), vec![DiffStatus::Added; 2]);

        let diff = align_tokens(&seq, &[]);
        assert!(diff.other_diff.is_empty());
        assert_eq!(statuses(&diff.base_diff), vec![DiffStatus::Removed; 2]);

        let diff = align_tokens(&[], &[]);
        assert_eq!(diff, VerseDiff::default());
    }

    #[test]
    fn test_no_common_tokens() {
        let diff = align_tokens(&words(&["a", "b"]), &words(&["c", "d"]));
        assert_eq!(diff.common_count(), 0);
        assert_eq!(diff.removed_count(), 2);
        assert_eq!(diff.added_count(), 2);
    }

    #[test]
    fn test_emphasis_ignored_for_equality() {
        let base = vec![Token::new("Follow", false)];
        let other = vec![Token::new("Follow", true)];
        let diff = align_tokens(&base, &other);

        assert!(diff.is_identical());
        assert!(!diff.base_diff[0].emphasis);
        assert!(diff.other_diff[0].emphasis);
    }

    #[test]
    fn test_tie_break_prefers_added() {
        let base = words(&["x"]);
        let other = words(&["y"]);
        let diff = align_tokens(&base, &other);
        assert_eq!(statuses(&diff.base_diff), vec![DiffStatus::Removed]);
        assert_eq!(statuses(&diff.other_diff), vec![DiffStatus::Added]);

        // Repeated token: which copy is matched depends on the policy
        let base = words(&["a", " ", "b"]);
        let other = words(&["b", " ", "a"]);
        let added_first = align_tokens(&base, &other);
        let removed_first = align_tokens_with(
            &base,
            &other,
            &ComparisonParams {
                tie_break: TieBreak::PreferRemoved,
                ..Default::default()
            },
        );
        assert_eq!(added_first.common_count(), 1);
        assert_eq!(removed_first.common_count(), 1);
        assert_eq!(
            statuses(&added_first.base_diff),
            vec![DiffStatus::Removed, DiffStatus::Removed, DiffStatus::Common]
        );
        assert_eq!(
            statuses(&removed_first.base_diff),
            vec![DiffStatus::Common, DiffStatus::Removed, DiffStatus::Removed]
        );
    }

    #[test]
    fn test_line_break_matches_by_text() {
        let base = vec![Token::new("a", false), Token::line_break()];
        let other = vec![Token::new("a", false), Token::new("\n", false)];
        let diff = align_tokens(&base, &other);
        assert!(diff.is_identical());
        assert!(diff.base_diff[1].is_line_break);
        assert!(!diff.other_diff[1].is_line_break);
    }

    #[test]
    fn test_lcs_table() {
        let table = LcsTable::build(&['a', 'b', 'c', 'b'], &['b', 'c', 'b']);
        assert_eq!(table.length(), 3);
        assert_eq!(table.get(0, 3), 0);
        assert_eq!(table.get(2, 1), 1);

        let empty = LcsTable::build::<char>(&[], &[]);
        assert_eq!(empty.length(), 0);
    }

    #[test]
    fn test_lcs_length_modes() {
        let base = words(&["“", "Yes", "”"]);
        let other = words(&["\"", "yes", "\""]);
        assert_eq!(lcs_length(&base, &other, MatchMode::Exact), 0);
        assert_eq!(lcs_length(&base, &other, MatchMode::Normalized), 3);
    }

    #[test]
    fn test_normalized_matching() {
        let mode = MatchMode::Normalized;
        assert!(tokens_equal(&Token::new(" ", false), &Token::new("  ", false), mode));
        assert!(tokens_equal(&Token::new("Lord’s", false), &Token::new("lord's", false), mode));
        assert!(tokens_equal(&Token::new("\u{037E}", false), &Token::new("?", false), mode));
        assert!(tokens_equal(&Token::new("a\u{200B}", false), &Token::new("a", false), mode));
        assert!(!tokens_equal(&Token::line_break(), &Token::new(" ", false), mode));
        assert!(!tokens_equal(&Token::new("ruler", false), &Token::new("judge", false), mode));

        // Exact mode keeps them apart
        assert!(!tokens_equal(&Token::new(" ", false), &Token::new("  ", false), MatchMode::Exact));
    }

    #[test]
    fn test_normalized_keeps_own_text() {
        let base = words(&["“"]);
        let other = words(&["\""]);
        let params = ComparisonParams {
            mode: MatchMode::Normalized,
            ..Default::default()
        };
        let diff = align_tokens_with(&base, &other, &params);
        assert!(diff.is_identical());
        assert_eq!(diff.base_text(), "“");
        assert_eq!(diff.other_text(), "\"");
    }

    #[test]
    fn test_normalize_token_text() {
        assert_eq!(normalize_token_text("plain"), "plain");
        assert!(matches!(normalize_token_text("plain"), Cow::Borrowed(_)));
        assert_eq!(normalize_token_text("\t\n "), " ");
        assert_eq!(normalize_token_text("It’S"), "it's");
        assert_eq!(normalize_token_text("„”"), "\"\"");
    }
}
