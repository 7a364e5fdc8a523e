//! Noun lemmatizer.
//!
//! Reduces plural noun forms to their singular lemma. The form table is
//! consulted first: it holds irregular plurals, `-ie` nouns (`movies`) and
//! words that only look plural (`series`, `always`), the latter mapped to
//! themselves. Suffix rules (`-ies` → `-y`, `-ches` → `-ch`, `-s` → ``, ...)
//! are the fallback. Words that do not look inflected come back unchanged.

use std::collections::HashMap;
use std::path::Path;

use rl_core::{Result, RlError};

const BUILTIN_EXCEPTIONS: &str = include_str!("../resources/noun_exceptions.tsv");

/// Minimum length of a word before suffix rules apply.
const MIN_INFLECTED_LEN: usize = 4;

#[derive(Debug, Clone)]
pub struct Lemmatizer {
    exceptions: HashMap<String, String>,
}

impl Lemmatizer {
    /// Lemmatizer with the builtin irregular-plural table.
    pub fn english() -> Self {
        Self {
            exceptions: parse_exceptions(BUILTIN_EXCEPTIONS),
        }
    }

    /// Builtin table extended (and overridden) by a `form<TAB>lemma` file.
    pub fn with_exception_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RlError::resource(format!("lemma exceptions ({})", path.display()), e))?;
        let mut lemmatizer = Self::english();
        lemmatizer.exceptions.extend(parse_exceptions(&content));
        Ok(lemmatizer)
    }

    /// Add one irregular form.
    pub fn insert_exception(&mut self, form: &str, lemma: &str) {
        self.exceptions
            .insert(form.to_lowercase(), lemma.to_lowercase());
    }

    /// Lemma of a lowercase token.
    pub fn lemmatize(&self, word: &str) -> String {
        if let Some(lemma) = self.exceptions.get(word) {
            return lemma.clone();
        }
        if word.chars().count() < MIN_INFLECTED_LEN || !word.ends_with('s') {
            return word.to_string();
        }

        if word.ends_with("sses") {
            return strip(word, 2);
        }
        if word.ends_with("ies") {
            return if word.chars().count() > MIN_INFLECTED_LEN {
                format!("{}y", &word[..word.len() - 3])
            } else {
                strip(word, 1)
            };
        }
        for suffix in ["xes", "zes", "ches", "shes"] {
            if word.ends_with(suffix) {
                return strip(word, 2);
            }
        }
        // Singular words that merely end in s: boss, bonus, chassis, famous.
        for ending in ["ss", "us", "is"] {
            if word.ends_with(ending) {
                return word.to_string();
            }
        }
        strip(word, 1)
    }
}

impl Default for Lemmatizer {
    fn default() -> Self {
        Self::english()
    }
}

fn strip(word: &str, n: usize) -> String {
    word[..word.len() - n].to_string()
}

fn parse_exceptions(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .filter_map(|l| {
            let mut parts = l.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some(form), Some(lemma)) => Some((form.to_lowercase(), lemma.to_lowercase())),
                _ => None,
            }
        })
        .collect()
}
