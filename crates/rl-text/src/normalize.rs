//! Review text normalization for bag-of-words export.
//!
//! Pipeline, in order: lowercase → tokenize → drop punctuation and
//! non-alphabetic tokens → drop stopwords → drop words of the subject's own
//! title → lemmatize → drop the lemma if it is itself a stopword or title word.

use std::collections::HashSet;

use crate::lemmatize::Lemmatizer;
use crate::stopwords::Stopwords;
use crate::tokenize::{is_alphabetic_token, is_alphanumeric_token, is_punctuation_token, words};

#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    stopwords: Stopwords,
    lemmatizer: Lemmatizer,
}

impl Normalizer {
    pub fn new(stopwords: Stopwords, lemmatizer: Lemmatizer) -> Self {
        Self { stopwords, lemmatizer }
    }

    pub fn stopwords(&self) -> &Stopwords {
        &self.stopwords
    }

    /// Normalized lemma stream for one review. Missing text yields an empty
    /// stream; a missing title removes nothing.
    pub fn normalize(&self, text: Option<&str>, title: Option<&str>) -> Vec<String> {
        let Some(text) = text else {
            return Vec::new();
        };
        let title_words = title.map(title_tokens).unwrap_or_default();

        let mut out = Vec::new();
        for token in words(&text.to_lowercase()) {
            if is_punctuation_token(&token) || !is_alphabetic_token(&token) {
                continue;
            }
            if self.stopwords.contains(&token) || title_words.contains(&token) {
                continue;
            }
            let lemma = self.lemmatizer.lemmatize(&token);
            if self.stopwords.contains(&lemma) || title_words.contains(&lemma) {
                continue;
            }
            out.push(lemma);
        }
        out
    }

    /// Lowercase surface tokens with stopwords and single punctuation marks
    /// removed. No lemmatization and no title filtering.
    pub fn surface_tokens(&self, text: &str) -> Vec<String> {
        words(&text.to_lowercase())
            .into_iter()
            .filter(|t| !is_punctuation_token(t) && !self.stopwords.contains(t))
            .collect()
    }
}

/// Lowercase alphanumeric tokens of a subject title.
pub fn title_tokens(title: &str) -> HashSet<String> {
    words(&title.to_lowercase())
        .into_iter()
        .filter(|t| !is_punctuation_token(t) && is_alphanumeric_token(t))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> Normalizer {
        Normalizer::default()
    }

    #[test]
    fn full_pipeline() {
        let tokens = normalizer().normalize(
            Some("The enemies in Hollow Knight are GORGEOUS, and the bosses don't disappoint!"),
            Some("Hollow Knight"),
        );
        assert_eq!(tokens, vec!["enemy", "gorgeous", "boss", "disappoint"]);
    }

    #[test]
    fn missing_text_yields_nothing() {
        assert!(normalizer().normalize(None, Some("Hades")).is_empty());
        assert!(normalizer().normalize(Some(""), Some("Hades")).is_empty());
    }

    #[test]
    fn title_words_never_survive() {
        let tokens = normalizer().normalize(
            Some("Dead Cells: dead fun, the cells keep dying"),
            Some("Dead Cells"),
        );
        assert!(!tokens.contains(&"dead".to_string()));
        // "cells" is removed before lemmatization, never reaching "cell".
        assert!(!tokens.contains(&"cells".to_string()));
        assert!(!tokens.contains(&"cell".to_string()));
        assert_eq!(tokens, vec!["fun", "keep", "dying"]);
    }

    #[test]
    fn lemma_matching_title_word_is_dropped() {
        // "knights" itself is not a title word, its lemma is.
        let tokens = normalizer().normalize(Some("many knights"), Some("Knight"));
        assert_eq!(tokens, vec!["many"]);
    }

    #[test]
    fn numbers_and_hyphenated_words_are_dropped() {
        let tokens = normalizer().normalize(Some("10 out of 10, a well-made game"), None);
        assert_eq!(tokens, vec!["game"]);
    }

    #[test]
    fn title_tokens_keep_alphanumerics_only() {
        let t = title_tokens("Cyberpunk 2077: Phantom Liberty");
        assert!(t.contains("cyberpunk"));
        assert!(t.contains("2077"));
        assert!(t.contains("liberty"));
        assert!(!t.contains(":"));
    }

    #[test]
    fn surface_tokens_skip_stopwords_and_punctuation() {
        let toks = normalizer().surface_tokens("The combat is BRUTAL, but I don't mind.");
        assert_eq!(toks, vec!["combat", "brutal", "n't", "mind"]);
    }
}
