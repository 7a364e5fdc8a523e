//! Per-aspect polarity from sentence-level evidence.

use std::collections::BTreeMap;

use rl_core::AspectDictionary;
use rl_text::SentenceStrategy;

use crate::lexicon::Lexicon;
use crate::scorer::PolarityScorer;

/// Scores each sentence once and credits that score to every aspect whose
/// keywords the sentence mentions.
pub struct AspectAttributor<'a> {
    scorer: &'a dyn PolarityScorer,
    lexicon: &'a Lexicon,
    aspects: &'a AspectDictionary,
    sentences: &'a SentenceStrategy,
}

impl<'a> AspectAttributor<'a> {
    pub fn new(
        scorer: &'a dyn PolarityScorer,
        lexicon: &'a Lexicon,
        aspects: &'a AspectDictionary,
        sentences: &'a SentenceStrategy,
    ) -> Self {
        Self {
            scorer,
            lexicon,
            aspects,
            sentences,
        }
    }

    /// One entry per defined aspect: the mean compound of the sentences that
    /// mention it, or `None` when none does. Keyword matching is a
    /// case-insensitive substring test, so "fight" also matches "fighting".
    pub fn attribute(&self, text: Option<&str>) -> BTreeMap<String, Option<f64>> {
        let mut evidence: BTreeMap<&str, Vec<f64>> =
            self.aspects.names().map(|name| (name, Vec::new())).collect();

        if let Some(text) = text.filter(|t| !t.trim().is_empty()) {
            for sentence in self.sentences.sentences(text) {
                let lower = sentence.to_lowercase();
                let mut compound = None;
                for (name, keywords) in self.aspects.iter() {
                    if !keywords.iter().any(|k| lower.contains(k.as_str())) {
                        continue;
                    }
                    let score =
                        *compound.get_or_insert_with(|| self.scorer.compound(sentence, self.lexicon));
                    if let Some(list) = evidence.get_mut(name) {
                        list.push(score);
                    }
                }
            }
        }

        evidence
            .into_iter()
            .map(|(name, scores)| {
                let mean = if scores.is_empty() {
                    None
                } else {
                    Some(scores.iter().sum::<f64>() / scores.len() as f64)
                };
                (name.to_string(), mean)
            })
            .collect()
    }
}
