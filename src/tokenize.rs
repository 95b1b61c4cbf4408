//! Tokenization of a verse's structured content into comparable tokens.
//!
//! Footnote markers are dropped, line breaks become their own token, and
//! text segments are split into word, punctuation and whitespace runs.

use regex::Regex;
use std::sync::LazyLock;

use crate::models::{ComparisonParams, MatchMode, StyledSegment, Token};

/// Token grammar, in order of precedence: word runs (apostrophes included),
/// punctuation runs (straight and curly quotes, dashes, ellipsis, slash and
/// the non-ASCII question marks), whitespace runs.
static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"[\w']+|[.,;:?!"()\[\]\-–—“”‘’…/\x{037E}\x{055E}\x{061F}\x{1367}\x{203D}\x{2047}-\x{2049}\x{2CFA}\x{2CFB}\x{2E2E}\x{A60F}\x{A6F7}\x{FE56}\x{FF1F}]+|\s+"#,
    )
    .expect("token pattern is valid")
});

/// Grammar for `MatchMode::Normalized`: curly and prime single quotes count
/// as apostrophes, so `Lord’s` stays one word and lines up with `Lord's`.
static NORMALIZED_TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"[\w'‘’‚‛′‵]+|[.,;:?!"()\[\]\-–—“”…/\x{037E}\x{055E}\x{061F}\x{1367}\x{203D}\x{2047}-\x{2049}\x{2CFA}\x{2CFB}\x{2E2E}\x{A60F}\x{A6F7}\x{FE56}\x{FF1F}]+|\s+"#,
    )
    .expect("normalized token pattern is valid")
});

/// Characters after which a run-together segment needs a space.
const SPACING_TRAILERS: &str = ";,.\"?!:’')]—–";
/// Characters that may open a run-together segment.
const SPACING_LEADERS: &str = "“\"‘(";

/// Tokenize one verse with default parameters.
pub fn tokenize(content: &[StyledSegment]) -> Vec<Token> {
    tokenize_with(content, &ComparisonParams::default())
}

/// Tokenize one verse.
///
/// Never fails: empty or unrecognised segments simply produce no tokens.
/// Tokens come out in source order and are never merged or reordered.
pub fn tokenize_with(content: &[StyledSegment], params: &ComparisonParams) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::with_capacity(content.len() * 4);

    for (i, segment) in content.iter().enumerate() {
        match segment {
            StyledSegment::LineBreak => tokens.push(Token::line_break()),
            StyledSegment::FootnoteMarker { .. } => {
                // The marker may have been the only thing separating two words
                let next_starts_word = content
                    .get(i + 1)
                    .and_then(StyledSegment::text)
                    .is_some_and(starts_alphanumeric);
                if next_starts_word {
                    tokens.push(Token::space());
                }
            }
            StyledSegment::PlainText(text) => push_text(&mut tokens, text, false, params),
            StyledSegment::StyledText { text, emphasis } => {
                push_text(&mut tokens, text, *emphasis, params)
            }
        }
    }

    tokens
}

fn push_text(tokens: &mut Vec<Token>, text: &str, emphasis: bool, params: &ComparisonParams) {
    if text.is_empty() {
        return;
    }

    if params.implicit_spacing {
        if let Some(last) = tokens.last() {
            if needs_implicit_space(&last.text, text) {
                tokens.push(Token::space());
            }
        }
    }

    let pattern = match params.mode {
        MatchMode::Exact => &*TOKEN_PATTERN,
        MatchMode::Normalized => &*NORMALIZED_TOKEN_PATTERN,
    };
    tokens.extend(
        pattern
            .find_iter(text)
            .map(|m| Token::new(m.as_str(), emphasis)),
    );
}

/// Whether `prev` and `next` would run together without a separator.
fn needs_implicit_space(prev: &str, next: &str) -> bool {
    let ends_word = prev
        .chars()
        .last()
        .is_some_and(|c| c.is_alphanumeric() || SPACING_TRAILERS.contains(c));
    let starts_word = next
        .chars()
        .next()
        .is_some_and(|c| c.is_alphanumeric() || SPACING_LEADERS.contains(c));
    ends_word && starts_word
}

#[inline]
fn starts_alphanumeric(text: &str) -> bool {
    text.chars().next().is_some_and(char::is_alphanumeric)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_words_punctuation_whitespace() {
        let tokens = tokenize(&[StyledSegment::plain("Who made you, a ruler?")]);
        assert_eq!(
            texts(&tokens),
            vec!["Who", " ", "made", " ", "you", ",", " ", "a", " ", "ruler", "?"]
        );
        assert!(tokens.iter().all(|t| !t.emphasis && !t.is_line_break));
    }

    #[test]
    fn test_apostrophes_stay_in_words() {
        let tokens = tokenize(&[StyledSegment::plain("don't")]);
        assert_eq!(texts(&tokens), vec!["don't"]);
    }

    #[test]
    fn test_smart_quotes_and_dashes_are_punctuation() {
        let tokens = tokenize(&[StyledSegment::plain("“Go—now.”")]);
        assert_eq!(texts(&tokens), vec!["“", "Go", "—", "now", ".”"]);
    }

    #[test]
    fn test_question_mark_variants_are_punctuation() {
        let tokens = tokenize(&[StyledSegment::plain("Who made you ruler\u{037E}")]);
        assert_eq!(
            texts(&tokens),
            vec!["Who", " ", "made", " ", "you", " ", "ruler", "\u{037E}"]
        );

        let tokens = tokenize(&[StyledSegment::plain("why？ \u{061F}")]);
        assert_eq!(texts(&tokens), vec!["why", "？", " ", "\u{061F}"]);
    }

    #[test]
    fn test_ellipsis_and_slash_are_kept() {
        let tokens = tokenize(&[StyledSegment::plain("then\u{2026} he")]);
        assert_eq!(texts(&tokens), vec!["then", "\u{2026}", " ", "he"]);

        let tokens = tokenize(&[StyledSegment::plain("sons/daughters")]);
        assert_eq!(texts(&tokens), vec!["sons", "/", "daughters"]);
    }

    #[test]
    fn test_curly_apostrophe_by_mode() {
        let content = [StyledSegment::plain("the Lord’s house")];

        let exact = tokenize(&content);
        assert_eq!(texts(&exact), vec!["the", " ", "Lord", "’", "s", " ", "house"]);

        let normalized = tokenize_with(
            &content,
            &ComparisonParams {
                mode: MatchMode::Normalized,
                ..Default::default()
            },
        );
        assert_eq!(texts(&normalized), vec!["the", " ", "Lord’s", " ", "house"]);

        // Closing double quotes stay punctuation in both grammars
        let normalized = tokenize_with(
            &[StyledSegment::plain("“Go.”")],
            &ComparisonParams {
                mode: MatchMode::Normalized,
                ..Default::default()
            },
        );
        assert_eq!(texts(&normalized), vec!["“", "Go", ".”"]);
    }

    #[test]
    fn test_emphasis_carried_to_every_token() {
        let tokens = tokenize(&[StyledSegment::styled("I am he", true)]);
        assert_eq!(tokens.len(), 5);
        assert!(tokens.iter().all(|t| t.emphasis));
    }

    #[test]
    fn test_line_break_token() {
        let tokens = tokenize(&[
            StyledSegment::plain("a"),
            StyledSegment::LineBreak,
            StyledSegment::plain("b"),
        ]);
        assert_eq!(texts(&tokens), vec!["a", "\n", "b"]);
        assert!(tokens[1].is_line_break);
        assert!(!tokens[1].emphasis);
        assert_eq!(tokens.iter().filter(|t| t.is_line_break).count(), 1);
    }

    #[test]
    fn test_footnote_before_word_synthesizes_space() {
        let with_note = tokenize(&[
            StyledSegment::plain("He said"),
            StyledSegment::FootnoteMarker { id: 1 },
            StyledSegment::plain("hello"),
        ]);
        let with_space = tokenize(&[
            StyledSegment::plain("He said"),
            StyledSegment::plain(" "),
            StyledSegment::plain("hello"),
        ]);
        assert_eq!(texts(&with_note), texts(&with_space));
    }

    #[test]
    fn test_footnote_before_punctuation_synthesizes_nothing() {
        let tokens = tokenize(&[
            StyledSegment::plain("He said "),
            StyledSegment::FootnoteMarker { id: 1 },
            StyledSegment::plain(", friend"),
        ]);
        assert_eq!(texts(&tokens), vec!["He", " ", "said", " ", ",", " ", "friend"]);
    }

    #[test]
    fn test_footnote_before_accented_word_synthesizes_space() {
        // Any Unicode letter or digit counts, not only ASCII
        let tokens = tokenize(&[
            StyledSegment::plain("Then"),
            StyledSegment::FootnoteMarker { id: 2 },
            StyledSegment::plain("Élie answered"),
        ]);
        assert_eq!(texts(&tokens), vec!["Then", " ", "Élie", " ", "answered"]);
    }

    #[test]
    fn test_footnote_at_end_or_before_marker() {
        let tokens = tokenize(&[
            StyledSegment::plain("end"),
            StyledSegment::FootnoteMarker { id: 1 },
        ]);
        assert_eq!(texts(&tokens), vec!["end"]);

        // Only the immediately following element is inspected
        let tokens = tokenize(&[
            StyledSegment::plain("a"),
            StyledSegment::FootnoteMarker { id: 1 },
            StyledSegment::FootnoteMarker { id: 2 },
            StyledSegment::plain("b"),
        ]);
        assert_eq!(texts(&tokens), vec!["a", " ", "b"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize(&[]).is_empty());
        assert!(tokenize(&[StyledSegment::plain("")]).is_empty());
        assert!(tokenize(&[StyledSegment::styled("", true)]).is_empty());
    }

    #[test]
    fn test_no_implicit_spacing_by_default() {
        let tokens = tokenize(&[StyledSegment::plain("word;"), StyledSegment::plain("word")]);
        assert_eq!(texts(&tokens), vec!["word", ";", "word"]);
    }

    #[test]
    fn test_implicit_spacing() {
        let params = ComparisonParams {
            implicit_spacing: true,
            ..Default::default()
        };

        let tokens = tokenize_with(
            &[StyledSegment::plain("word;"), StyledSegment::plain("word")],
            &params,
        );
        assert_eq!(texts(&tokens), vec!["word", ";", " ", "word"]);

        let tokens = tokenize_with(
            &[StyledSegment::plain("said"), StyledSegment::styled("“Follow", true)],
            &params,
        );
        assert_eq!(texts(&tokens), vec!["said", " ", "“", "Follow"]);

        // Already separated
        let tokens = tokenize_with(
            &[StyledSegment::plain("said "), StyledSegment::plain("more")],
            &params,
        );
        assert_eq!(texts(&tokens), vec!["said", " ", "more"]);

        // Footnote space is not doubled
        let tokens = tokenize_with(
            &[
                StyledSegment::plain("said"),
                StyledSegment::FootnoteMarker { id: 3 },
                StyledSegment::plain("more"),
            ],
            &params,
        );
        assert_eq!(texts(&tokens), vec!["said", " ", "more"]);
    }
}
