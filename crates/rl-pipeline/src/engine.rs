//! Parallel analysis engine.
//!
//! [`AnalysisEngine::analyze`] runs the whole pass over a corpus:
//!
//! 1. Audit every rated review against the pristine lexicon.
//! 2. Build the tuned lexicon (pristine + corrections) and freeze it.
//! 3. Normalize, score and attribute every review in parallel with rayon,
//!    keeping corpus order.
//! 4. Assemble a [`RunRecord`] describing the run.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use rl_core::db::{ResultStore, RunRecord};
use rl_core::{AnalyzedReview, PolarityResult, Result, Review, RlError};
use rl_sentiment::{
    AspectAttributor, AuditReport, DiagnosticAuditor, Lexicon, PolarityScorer, VaderScorer,
};

use crate::config::AnalysisConfig;
use crate::resources::Resources;
use crate::summary::{summarize, RunSummary};

/// Which lexicon a one-off score uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexiconChoice {
    Pristine,
    Tuned,
}

/// Everything one run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutput {
    pub run: RunRecord,
    pub audit: AuditReport,
    pub reviews: Vec<AnalyzedReview>,
}

impl RunOutput {
    pub fn summary(&self) -> RunSummary {
        summarize(&self.reviews)
    }

    /// Write the run, its reviews and both culprit tables to `store` in one
    /// transaction. A failure leaves nothing of this run behind.
    pub fn persist(&self, store: &dyn ResultStore) -> Result<()> {
        store.insert_output(
            &self.run,
            &self.reviews,
            &self.audit.fn_culprits,
            &self.audit.fp_culprits,
        )?;
        info!(run_id = %self.run.id, reviews = self.reviews.len(), "run persisted");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// AnalysisEngine
// ---------------------------------------------------------------------------

pub struct AnalysisEngine {
    resources: Resources,
    scorer: Arc<dyn PolarityScorer>,
    culprit_limit: usize,
    /// `0` runs on the global rayon pool.
    worker_threads: usize,
}

impl AnalysisEngine {
    pub fn new(resources: Resources, config: &AnalysisConfig) -> Self {
        Self {
            resources,
            scorer: Arc::new(VaderScorer::new()),
            culprit_limit: config.audit.culprit_limit,
            worker_threads: config.engine.worker_threads,
        }
    }

    /// Replace the default scorer.
    pub fn with_scorer(mut self, scorer: Arc<dyn PolarityScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    /// Pristine lexicon with the correction set merged in, plus the number
    /// of corrections applied.
    pub fn tuned_lexicon(&self) -> (Lexicon, usize) {
        let builder = self
            .resources
            .base_lexicon
            .builder()
            .override_weights(self.resources.corrections.iter().map(|(w, v)| (w.as_str(), *v)));
        let applied = builder.overridden();
        (builder.build(), applied)
    }

    /// Audit `reviews` against the pristine lexicon.
    pub fn audit(&self, reviews: &[Review]) -> Result<AuditReport> {
        self.install(|| self.audit_with(&self.resources.base_lexicon, reviews))
    }

    /// Audit `reviews` against an arbitrary lexicon.
    pub fn audit_with(&self, lexicon: &Lexicon, reviews: &[Review]) -> AuditReport {
        DiagnosticAuditor::new(self.scorer.as_ref(), lexicon, &self.resources.normalizer)
            .with_limit(self.culprit_limit)
            .audit(reviews)
    }

    /// Full pass over `reviews`. An empty corpus yields an empty run.
    pub fn analyze(&self, reviews: &[Review]) -> Result<RunOutput> {
        let started_at = Utc::now();
        let start = Instant::now();
        info!(reviews = reviews.len(), "analysis started");

        let (audit, tuned, override_count, analyzed) = self.install(|| {
            let audit = self.audit_with(&self.resources.base_lexicon, reviews);
            let (tuned, override_count) = self.tuned_lexicon();
            debug!(overrides = override_count, entries = tuned.len(), "tuned lexicon frozen");
            let analyzed: Vec<AnalyzedReview> = reviews
                .par_iter()
                .map(|r| self.analyze_review(r, &tuned))
                .collect();
            (audit, tuned, override_count, analyzed)
        })?;

        let run = RunRecord {
            id: Uuid::new_v4(),
            started_at,
            base_fingerprint: audit.lexicon_fingerprint.clone(),
            tuned_fingerprint: tuned.fingerprint(),
            override_count,
            review_count: analyzed.len(),
            false_negatives: audit.false_negatives.len(),
            false_positives: audit.false_positives.len(),
            sentence_strategy: self.resources.sentences.as_str().to_string(),
        };

        info!(
            run_id = %run.id,
            reviews = run.review_count,
            false_negatives = run.false_negatives,
            false_positives = run.false_positives,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "analysis complete"
        );

        Ok(RunOutput {
            run,
            audit,
            reviews: analyzed,
        })
    }

    /// Derive tokens, polarity and aspect scores for one review.
    pub fn analyze_review(&self, review: &Review, lexicon: &Lexicon) -> AnalyzedReview {
        let text = review.text();
        let tokens = self
            .resources
            .normalizer
            .normalize(text, Some(review.subject.as_str()));
        let polarity = match text {
            Some(t) => self.scorer.score(t, lexicon),
            None => PolarityResult::from_compound(0.0),
        };
        let aspects = AspectAttributor::new(
            self.scorer.as_ref(),
            lexicon,
            &self.resources.aspects,
            &self.resources.sentences,
        )
        .attribute(text);

        AnalyzedReview {
            review: review.clone(),
            tokens,
            polarity,
            aspects,
        }
    }

    /// Score a single text.
    pub fn score_text(&self, text: &str, choice: LexiconChoice) -> PolarityResult {
        match choice {
            LexiconChoice::Pristine => self.scorer.score(text, &self.resources.base_lexicon),
            LexiconChoice::Tuned => self.scorer.score(text, &self.tuned_lexicon().0),
        }
    }

    fn install<R, F>(&self, f: F) -> Result<R>
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        if self.worker_threads == 0 {
            return Ok(f());
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.worker_threads)
            .build()
            .map_err(|e| RlError::Internal(format!("worker pool: {e}")))?;
        Ok(pool.install(f))
    }
}
