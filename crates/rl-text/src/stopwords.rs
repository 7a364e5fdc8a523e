//! Stopword set.

use std::collections::HashSet;
use std::path::Path;

use rl_core::{Result, RlError};

const BUILTIN_ENGLISH: &str = include_str!("../resources/stopwords_en.txt");

/// A set of lowercase words discarded during normalization and auditing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Stopwords {
    /// The standard English list shipped with the crate.
    pub fn english() -> Self {
        Self::parse(BUILTIN_ENGLISH)
    }

    /// Load a list with one word per line. `#` starts a comment line.
    ///
    /// A configured list that cannot be read is a startup failure.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RlError::resource(format!("stopwords ({})", path.display()), e))?;
        let list = Self::parse(&content);
        if list.is_empty() {
            return Err(RlError::resource(
                format!("stopwords ({})", path.display()),
                "list is empty",
            ));
        }
        Ok(list)
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    fn parse(content: &str) -> Self {
        Self::from_words(
            content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#')),
        )
    }

    /// Exact match; callers pass lowercase tokens.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for Stopwords {
    fn default() -> Self {
        Self::english()
    }
}
