//! Startup resource probing.
//!
//! Every linguistic resource is loaded once, before any review is touched.
//! Failures are fatal except for the sentence splitter, which degrades to
//! whole-document mode, and the aspect table, whose absence only disables
//! aspect scoring.

use std::collections::BTreeMap;

use tracing::{info, warn};

use rl_core::{AspectDictionary, Result};
use rl_sentiment::{gaming_corrections, load_corrections, Lexicon};
use rl_text::{Lemmatizer, Normalizer, SentenceStrategy, Stopwords};

use crate::config::ResourceConfig;

/// Everything an analysis run reads but never writes.
#[derive(Debug, Clone)]
pub struct Resources {
    pub normalizer: Normalizer,
    /// Pristine lexicon; the audit always runs against this one.
    pub base_lexicon: Lexicon,
    pub corrections: BTreeMap<String, f64>,
    pub aspects: AspectDictionary,
    pub sentences: SentenceStrategy,
}

impl Resources {
    /// Load every resource named in `config`, falling back to the builtin
    /// ones where a path is unset.
    pub fn probe(config: &ResourceConfig) -> Result<Self> {
        let stopwords = match &config.stopwords {
            Some(path) => Stopwords::from_file(path)?,
            None => Stopwords::english(),
        };
        let lemmatizer = match &config.lemma_exceptions {
            Some(path) => Lemmatizer::with_exception_file(path)?,
            None => Lemmatizer::english(),
        };
        let base_lexicon = match &config.base_lexicon {
            Some(path) => Lexicon::from_file(path)?,
            None => Lexicon::load_base()?,
        };
        let corrections = match &config.corrections {
            Some(path) => load_corrections(path)?,
            None => gaming_corrections(),
        };
        let aspects = match &config.aspects {
            Some(path) => AspectDictionary::load_csv(path)?,
            None => {
                warn!("no aspect table configured; aspect scoring disabled");
                AspectDictionary::new()
            }
        };
        let sentences = SentenceStrategy::probe(config.abbreviations.as_deref());

        info!(
            stopwords = stopwords.len(),
            lexicon = base_lexicon.len(),
            corrections = corrections.len(),
            aspects = aspects.len(),
            sentence_strategy = sentences.as_str(),
            "resources ready"
        );

        Ok(Self {
            normalizer: Normalizer::new(stopwords, lemmatizer),
            base_lexicon,
            corrections,
            aspects,
            sentences,
        })
    }

    /// Builtin resources with the given aspect table.
    pub fn builtin(aspects: AspectDictionary) -> Result<Self> {
        Ok(Self {
            normalizer: Normalizer::default(),
            base_lexicon: Lexicon::load_base()?,
            corrections: gaming_corrections(),
            aspects,
            sentences: SentenceStrategy::default(),
        })
    }
}
