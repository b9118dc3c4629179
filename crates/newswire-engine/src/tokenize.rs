//! Tokenization and the big-word filter.
//!
//! Two layers turn document text into terms:
//!
//! 1. [`big_words`] reduces free text to the vocabulary the engine works
//!    with: short tokens are dropped, long tokens are cut to a crude stem,
//!    a handful of punctuation characters are stripped, and everything is
//!    lower-cased.
//! 2. A [`Tokenizer`] splits the resulting word text into terms for the
//!    TF-IDF model. [`WhitespaceTokenizer`] is the default;
//!    [`UnicodeWordTokenizer`] segments on Unicode word boundaries instead.
//!
//! Centroid training text, production documents and thread re-ranking all go
//! through the same filter, so changing it changes vocabulary identity
//! everywhere.

use std::fmt;
use unicode_segmentation::UnicodeSegmentation;

/// Tokens shorter than this (in characters) are discarded.
pub const MIN_WORD_CHARS: usize = 4;

/// Tokens longer than this are truncated to this many characters.
const MAX_WORD_CHARS: usize = 8;

/// Tokens of 7 or 8 characters are truncated to this many characters.
const SHORT_STEM_CHARS: usize = 6;

/// Characters removed from every token.
const STRIPPED_CHARS: &[char] = &[',', '«', '»', '(', ')', ':'];

/// Produces a sequence of terms from text.
///
/// Implementations must be deterministic: the same text always yields the
/// same terms, since corpus deduplication and weight lookups depend on it.
pub trait Tokenizer: fmt::Debug + Send + Sync {
    /// Splits text into terms.
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Splits on Unicode whitespace and keeps every token verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_owned).collect()
    }
}

/// Splits on Unicode word boundaries and lower-cases each word.
///
/// Punctuation-only segments are dropped by the segmenter itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeWordTokenizer;

impl Tokenizer for UnicodeWordTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.unicode_words().map(str::to_lowercase).collect()
    }
}

/// Reduces text to its "big words".
///
/// Processing steps, per whitespace-delimited token:
/// 1. Drop tokens shorter than 4 characters
/// 2. Truncate tokens longer than 8 characters to 8, and 7-8 character
///    tokens to 6
/// 3. Drop tokens starting with `<` (markup debris)
/// 4. Strip `, « » ( ) :`
/// 5. Lower-case
///
/// Lengths are measured in characters, not bytes. Tokens left empty by
/// stripping are dropped.
pub fn big_words(text: &str) -> Vec<String> {
    text.split_whitespace().filter_map(normalize_word).collect()
}

/// Big words joined by single spaces, ready for a [`Tokenizer`].
pub fn big_word_text(text: &str) -> String {
    big_words(text).join(" ")
}

fn normalize_word(word: &str) -> Option<String> {
    let len = word.chars().count();
    if len < MIN_WORD_CHARS {
        return None;
    }

    let keep = if len > MAX_WORD_CHARS {
        MAX_WORD_CHARS
    } else if len > SHORT_STEM_CHARS {
        SHORT_STEM_CHARS
    } else {
        len
    };
    let truncated: String = word.chars().take(keep).collect();

    if truncated.starts_with('<') {
        return None;
    }

    let stripped: String = truncated
        .chars()
        .filter(|c| !STRIPPED_CHARS.contains(c))
        .collect();
    if stripped.is_empty() {
        return None;
    }

    Some(stripped.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_tokens_dropped() {
        assert!(big_words("a an the cat dog").is_empty());
        assert_eq!(big_words("the bird"), vec!["bird"]);
    }

    #[test]
    fn truncation_rules() {
        // 4-6 chars kept as is
        assert_eq!(big_words("goal score league"), vec!["goal", "score", "league"]);
        // 7 and 8 chars cut to 6
        assert_eq!(big_words("penalty champion"), vec!["penalt", "champi"]);
        // 9+ chars cut to 8
        assert_eq!(big_words("parliamentary"), vec!["parliame"]);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        // 9 Cyrillic characters, 18 bytes
        assert_eq!(big_words("президент"), vec!["президен"]);
        // 7 Cyrillic characters
        assert_eq!(big_words("выборов"), vec!["выборо"]);
    }

    #[test]
    fn punctuation_stripped_after_length_check() {
        assert_eq!(big_words("«Спартак»"), vec!["спартак"]);
        assert_eq!(big_words("(goal),"), vec!["goal"]);
        // four characters of pure punctuation vanish entirely
        assert!(big_words("(::)").is_empty());
    }

    #[test]
    fn markup_tokens_dropped() {
        assert!(big_words("<div> <span>").is_empty());
    }

    #[test]
    fn lowercased() {
        assert_eq!(big_words("Election RESULTS"), vec!["electi", "result"]);
    }

    #[test]
    fn big_word_text_joins() {
        assert_eq!(big_word_text("the final match of the season"), "final match season");
    }

    #[test]
    fn whitespace_tokenizer() {
        let tokens = WhitespaceTokenizer.tokenize("  goal  match\tteam\n");
        assert_eq!(tokens, vec!["goal", "match", "team"]);
    }

    #[test]
    fn unicode_word_tokenizer() {
        let tokens = UnicodeWordTokenizer.tokenize("Goal! Match-day, team.");
        assert_eq!(tokens, vec!["goal", "match", "day", "team"]);
    }

    #[test]
    fn empty_input() {
        assert!(big_words("").is_empty());
        assert!(WhitespaceTokenizer.tokenize("").is_empty());
    }
}
