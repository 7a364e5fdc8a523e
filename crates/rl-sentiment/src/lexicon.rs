//! Weighted sentiment lexicon.
//!
//! A [`Lexicon`] is immutable once built. Tuning goes through
//! [`LexiconBuilder`], which copies the base weights before applying
//! overrides, so a pristine lexicon and its tuned derivative never share
//! storage.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use rl_core::{weights_fingerprint, Result, RlError};

const BUILTIN_BASE: &str = include_str!("../resources/base_lexicon.txt");

/// Conventional bound of a lexicon weight.
pub const WEIGHT_BOUND: f64 = 4.0;

// ---------------------------------------------------------------------------
// Lexicon
// ---------------------------------------------------------------------------

/// Word → signed polarity weight. Keys are lowercase; lookup is exact.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lexicon {
    weights: HashMap<String, f64>,
}

impl Lexicon {
    /// The default base lexicon shipped with the crate.
    pub fn load_base() -> Result<Self> {
        Self::parse(BUILTIN_BASE, "builtin base lexicon")
    }

    /// Load a base lexicon file with one `word<TAB>weight[<TAB>...]` entry
    /// per line. Extra columns (standard deviation, raw ratings) are ignored.
    pub fn from_file(path: &Path) -> Result<Self> {
        let name = format!("lexicon ({})", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| RlError::resource(&name, e))?;
        let lexicon = Self::parse(&content, &name)?;
        info!(path = %path.display(), entries = lexicon.len(), "base lexicon loaded");
        Ok(lexicon)
    }

    /// Parse lexicon text. A malformed weight column is a resource error:
    /// a half-read lexicon would silently skew every score.
    pub fn parse(content: &str, source: &str) -> Result<Self> {
        let mut weights = HashMap::new();
        for (n, line) in content.lines().enumerate() {
            let line = line.trim_end_matches(['\r', '\n']);
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let mut cols = line.split('\t');
            let word = cols.next().unwrap_or("").trim();
            let weight = cols.next().map(str::trim).unwrap_or("");
            let weight: f64 = weight.parse().map_err(|_| {
                RlError::resource(source, format!("line {}: bad weight {weight:?}", n + 1))
            })?;
            if word.is_empty() {
                continue;
            }
            weights.insert(word.to_lowercase(), weight);
        }
        if weights.is_empty() {
            return Err(RlError::resource(source, "no entries"));
        }
        Ok(Self { weights })
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        Self {
            weights: entries
                .into_iter()
                .map(|(w, v)| (w.as_ref().to_lowercase(), v))
                .collect(),
        }
    }

    /// Weight of `word`, or `0.0` when the word is unknown.
    pub fn lookup(&self, word: &str) -> f64 {
        self.weights.get(word).copied().unwrap_or(0.0)
    }

    pub fn get(&self, word: &str) -> Option<f64> {
        self.weights.get(word).copied()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.weights.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Order-independent SHA-256 over all entries.
    pub fn fingerprint(&self) -> String {
        weights_fingerprint(self.iter())
    }

    /// Start a tuned copy of this lexicon.
    pub fn builder(&self) -> LexiconBuilder {
        LexiconBuilder::new(self)
    }
}

// ---------------------------------------------------------------------------
// LexiconBuilder
// ---------------------------------------------------------------------------

/// Working copy of a base lexicon that accepts overrides.
#[derive(Debug, Clone)]
pub struct LexiconBuilder {
    weights: HashMap<String, f64>,
    overridden: usize,
}

impl LexiconBuilder {
    pub fn new(base: &Lexicon) -> Self {
        Self {
            weights: base.weights.clone(),
            overridden: 0,
        }
    }

    /// Merge `weights` into the working copy. Each listed key is replaced
    /// whole (or added); unlisted keys are left untouched.
    pub fn override_weights<I, S>(mut self, weights: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        for (word, weight) in weights {
            let word = word.as_ref().trim().to_lowercase();
            if word.is_empty() {
                continue;
            }
            if weight.abs() > WEIGHT_BOUND {
                debug!(%word, weight, "override outside the conventional weight range");
            }
            self.weights.insert(word, weight);
            self.overridden += 1;
        }
        self
    }

    /// Number of override entries applied so far.
    pub fn overridden(&self) -> usize {
        self.overridden
    }

    /// Freeze the working copy.
    pub fn build(self) -> Lexicon {
        Lexicon {
            weights: self.weights,
        }
    }
}
