//! Word tokenization for TF-IDF vectorization.
//!
//! Deterministic and pure: lowercase the input, replace every character that
//! is not a word character with a space, split on whitespace, and discard
//! short tokens and stopwords. No stemming or lemmatization is applied.

use crate::config::MIN_TOKEN_CHARS;
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Common English stopwords filtered out before weighting.
static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
        "from", "as", "is", "was", "are", "were", "been", "be", "have", "has", "had", "do", "does",
        "did", "will", "would", "could", "should", "may", "might", "must", "shall", "can", "need",
        "dare", "ought", "used", "it", "its", "this", "that", "these", "those", "i", "you", "he",
        "she", "we", "they", "what", "which", "who", "whom", "when", "where", "why", "how", "all",
        "each", "every", "both", "few", "more", "most", "other", "some", "such", "no", "nor",
        "not", "only", "own", "same", "so", "than", "too", "very", "just", "also", "now", "here",
        "there",
    ]
    .into_iter()
    .collect()
});

/// Splits raw text into filtered lowercase word tokens.
///
/// Tokens shorter than [`MIN_TOKEN_CHARS`] characters and stopwords are
/// dropped. Punctuation and other non-word characters act as separators, so
/// `"k-means"` tokenizes to `["means"]` (the single-letter fragment is too
/// short to survive).
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                ' '
            }
        })
        .collect();

    normalized
        .split_whitespace()
        .filter(|word| word.len() >= MIN_TOKEN_CHARS && !STOP_WORDS.contains(word))
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_splits() {
        assert_eq!(
            tokenize("Rust Programming Language"),
            vec!["rust", "programming", "language"]
        );
    }

    #[test]
    fn test_strips_punctuation() {
        assert_eq!(
            tokenize("hello, world! (clustering... works?)"),
            vec!["hello", "world", "clustering", "works"]
        );
    }

    #[test]
    fn test_drops_short_tokens() {
        // "k" and "of" are below the length floor
        assert_eq!(tokenize("k means of vectors"), vec!["means", "vectors"]);
    }

    #[test]
    fn test_drops_stopwords() {
        assert_eq!(
            tokenize("the quick brown fox and the lazy dog"),
            vec!["quick", "brown", "fox", "lazy", "dog"]
        );
    }

    #[test]
    fn test_empty_and_symbol_only_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("!!! ??? ---").is_empty());
    }

    #[test]
    fn test_numbers_and_underscores_are_word_characters() {
        assert_eq!(
            tokenize("error_404 happened 123 times"),
            vec!["error_404", "happened", "123", "times"]
        );
    }

    #[test]
    fn test_deterministic() {
        let text = "Tokenize me twice; tokenize me the same.";
        assert_eq!(tokenize(text), tokenize(text));
    }
}
