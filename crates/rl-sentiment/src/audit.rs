//! Diagnostic audit of a lexicon against reference ratings.
//!
//! The auditor scores every rated review with the lexicon it was given,
//! keeps the reviews whose polarity contradicts a clearly good or clearly
//! bad rating, and ranks the lexicon words most often present in those
//! contradictions. The result tells a human which weights to correct; the
//! auditor itself never changes the lexicon.

use std::collections::HashMap;
use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use rl_core::{AuthorRole, CulpritWord, Direction, Review, NEUTRAL_THRESHOLD};
use rl_text::Normalizer;

use crate::lexicon::Lexicon;
use crate::scorer::PolarityScorer;

/// Critic ratings at or above this are well-rated.
pub const CRITIC_HIGH: f64 = 70.0;
/// Critic ratings at or below this are poorly rated.
pub const CRITIC_LOW: f64 = 50.0;
pub const USER_HIGH: f64 = 7.0;
pub const USER_LOW: f64 = 5.0;
/// A word implicates a disagreement when its weight exceeds this magnitude
/// in the disagreeing direction.
pub const CULPRIT_THRESHOLD: f64 = 0.5;
pub const DEFAULT_CULPRIT_LIMIT: usize = 20;

// ---------------------------------------------------------------------------
// Reference bands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceBand {
    High,
    Low,
}

/// Band of a native rating. Ratings between the bands, and missing
/// ratings, belong to neither.
pub fn reference_band(role: AuthorRole, rating: Option<f64>) -> Option<ReferenceBand> {
    let rating = rating.filter(|r| r.is_finite())?;
    let (high, low) = match role {
        AuthorRole::Critic => (CRITIC_HIGH, CRITIC_LOW),
        AuthorRole::User => (USER_HIGH, USER_LOW),
    };
    if rating >= high {
        Some(ReferenceBand::High)
    } else if rating <= low {
        Some(ReferenceBand::Low)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// One review whose polarity contradicts its rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disagreement {
    pub review_id: Uuid,
    pub subject: String,
    pub role: AuthorRole,
    /// Native-scale rating.
    pub rating: f64,
    pub compound: f64,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    /// Fingerprint of the lexicon the audit ran against.
    pub lexicon_fingerprint: String,
    /// Reviews that fell in either reference band.
    pub examined: usize,
    pub false_negatives: Vec<Disagreement>,
    pub false_positives: Vec<Disagreement>,
    /// Ranked negative words found in false negatives.
    pub fn_culprits: Vec<CulpritWord>,
    /// Ranked positive words found in false positives.
    pub fp_culprits: Vec<CulpritWord>,
}

impl AuditReport {
    pub fn disagreements(&self, direction: Direction) -> &[Disagreement] {
        match direction {
            Direction::FalseNegative => &self.false_negatives,
            Direction::FalsePositive => &self.false_positives,
        }
    }

    pub fn culprits(&self, direction: Direction) -> &[CulpritWord] {
        match direction {
            Direction::FalseNegative => &self.fn_culprits,
            Direction::FalsePositive => &self.fp_culprits,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.false_negatives.is_empty() && self.false_positives.is_empty()
    }

    /// Both culprit tables as fixed-width text.
    pub fn render_tables(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "False negatives: {} (well-rated, scored negative)\n",
            self.false_negatives.len()
        ));
        out.push_str(&format!(
            "False positives: {} (poorly rated, scored positive)\n",
            self.false_positives.len()
        ));
        render_table(
            &mut out,
            "[1] Negative words in well-rated reviews",
            &self.fn_culprits,
        );
        render_table(
            &mut out,
            "[2] Positive words in poorly rated reviews",
            &self.fp_culprits,
        );
        out
    }
}

fn render_table(out: &mut String, title: &str, rows: &[CulpritWord]) {
    out.push('\n');
    out.push_str(title);
    out.push('\n');
    out.push_str(&format!("{:<15} | {:<12} | {:<10}\n", "Word", "Weight", "Frequency"));
    out.push_str(&"-".repeat(45));
    out.push('\n');
    for row in rows {
        out.push_str(&format!(
            "{:<15} | {:<12} | {:<10}\n",
            row.word, row.weight, row.count
        ));
    }
}

impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_tables())
    }
}

// ---------------------------------------------------------------------------
// DiagnosticAuditor
// ---------------------------------------------------------------------------

pub struct DiagnosticAuditor<'a> {
    scorer: &'a dyn PolarityScorer,
    lexicon: &'a Lexicon,
    normalizer: &'a Normalizer,
    limit: usize,
}

impl<'a> DiagnosticAuditor<'a> {
    pub fn new(
        scorer: &'a dyn PolarityScorer,
        lexicon: &'a Lexicon,
        normalizer: &'a Normalizer,
    ) -> Self {
        Self {
            scorer,
            lexicon,
            normalizer,
            limit: DEFAULT_CULPRIT_LIMIT,
        }
    }

    /// Number of culprit rows kept per direction.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Audit `reviews` against the auditor's lexicon.
    ///
    /// Reviews without text score zero and so never disagree. Disagreements
    /// keep corpus order; culprits are ranked by frequency, ties in order of
    /// first appearance.
    pub fn audit(&self, reviews: &[Review]) -> AuditReport {
        let banded: Vec<(&Review, ReferenceBand, f64)> = reviews
            .par_iter()
            .filter_map(|r| {
                let band = reference_band(r.role, r.rating)?;
                let compound = r
                    .text()
                    .map(|t| self.scorer.compound(t, self.lexicon))
                    .unwrap_or(0.0);
                Some((r, band, compound))
            })
            .collect();

        let mut false_negatives = Vec::new();
        let mut false_positives = Vec::new();
        let mut fn_texts = Vec::new();
        let mut fp_texts = Vec::new();
        for (review, band, compound) in &banded {
            let direction = match band {
                ReferenceBand::High if *compound <= -NEUTRAL_THRESHOLD => Direction::FalseNegative,
                ReferenceBand::Low if *compound >= NEUTRAL_THRESHOLD => Direction::FalsePositive,
                _ => continue,
            };
            let entry = Disagreement {
                review_id: review.id,
                subject: review.subject.clone(),
                role: review.role,
                rating: review.rating.unwrap_or_default(),
                compound: *compound,
                direction,
            };
            let text = review.text().unwrap_or_default();
            match direction {
                Direction::FalseNegative => {
                    false_negatives.push(entry);
                    fn_texts.push(text);
                }
                Direction::FalsePositive => {
                    false_positives.push(entry);
                    fp_texts.push(text);
                }
            }
        }

        info!(
            examined = banded.len(),
            false_negatives = false_negatives.len(),
            false_positives = false_positives.len(),
            "audit complete"
        );

        AuditReport {
            lexicon_fingerprint: self.lexicon.fingerprint(),
            examined: banded.len(),
            fn_culprits: self.culprits(&fn_texts, Direction::FalseNegative),
            fp_culprits: self.culprits(&fp_texts, Direction::FalsePositive),
            false_negatives,
            false_positives,
        }
    }

    fn culprits(&self, texts: &[&str], direction: Direction) -> Vec<CulpritWord> {
        let mut rows: Vec<CulpritWord> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for text in texts {
            for token in self.normalizer.surface_tokens(text) {
                let Some(weight) = self.lexicon.get(&token) else {
                    continue;
                };
                let implicated = match direction {
                    Direction::FalseNegative => weight < -CULPRIT_THRESHOLD,
                    Direction::FalsePositive => weight > CULPRIT_THRESHOLD,
                };
                if !implicated {
                    continue;
                }
                match index.get(&token) {
                    Some(&i) => rows[i].count += 1,
                    None => {
                        index.insert(token.clone(), rows.len());
                        rows.push(CulpritWord {
                            word: token,
                            weight,
                            count: 1,
                        });
                    }
                }
            }
        }
        rows.sort_by(|a, b| b.count.cmp(&a.count));
        rows.truncate(self.limit);
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::VaderScorer;

    fn lexicon() -> Lexicon {
        Lexicon::from_entries(vec![
            ("boring", -1.3),
            ("dull", -1.7),
            ("bad", -2.5),
            ("meh", -0.3),
            ("great", 3.1),
            ("fun", 2.3),
            ("nice", 1.8),
        ])
    }

    fn critic(text: &str, rating: f64) -> Review {
        Review::new("Hades", AuthorRole::Critic, Some(text.into()), Some(rating))
    }

    fn user(text: &str, rating: f64) -> Review {
        Review::new("Hades", AuthorRole::User, Some(text.into()), Some(rating))
    }

    #[test]
    fn band_edges_are_inclusive() {
        assert_eq!(reference_band(AuthorRole::Critic, Some(70.0)), Some(ReferenceBand::High));
        assert_eq!(reference_band(AuthorRole::Critic, Some(69.9)), None);
        assert_eq!(reference_band(AuthorRole::Critic, Some(50.0)), Some(ReferenceBand::Low));
        assert_eq!(reference_band(AuthorRole::Critic, Some(50.1)), None);
        assert_eq!(reference_band(AuthorRole::User, Some(7.0)), Some(ReferenceBand::High));
        assert_eq!(reference_band(AuthorRole::User, Some(6.0)), None);
        assert_eq!(reference_band(AuthorRole::User, Some(5.0)), Some(ReferenceBand::Low));
        assert_eq!(reference_band(AuthorRole::User, None), None);
    }

    #[test]
    fn finds_false_negatives_and_their_words() {
        let lex = lexicon();
        let scorer = VaderScorer::new();
        let norm = Normalizer::default();
        let reviews = vec![
            critic("boring and dull, meh", 90.0),
            critic("great fun", 95.0),
            critic("boring", 40.0),
        ];
        let report = DiagnosticAuditor::new(&scorer, &lex, &norm).audit(&reviews);

        assert_eq!(report.examined, 3);
        assert_eq!(report.false_negatives.len(), 1);
        assert_eq!(report.false_negatives[0].review_id, reviews[0].id);
        assert!(report.false_positives.is_empty());

        let words: Vec<&str> = report.fn_culprits.iter().map(|c| c.word.as_str()).collect();
        // "meh" is negative but inside the culprit threshold
        assert_eq!(words, vec!["boring", "dull"]);
        assert_eq!(report.fn_culprits[0].weight, -1.3);
    }

    #[test]
    fn finds_false_positives() {
        let lex = lexicon();
        let scorer = VaderScorer::new();
        let norm = Normalizer::default();
        let reviews = vec![user("nice art, great music, still bad", 3.0)];
        let report = DiagnosticAuditor::new(&scorer, &lex, &norm).audit(&reviews);

        assert_eq!(report.false_positives.len(), 1);
        assert_eq!(report.false_positives[0].direction, Direction::FalsePositive);
        let words: Vec<&str> = report.fp_culprits.iter().map(|c| c.word.as_str()).collect();
        assert_eq!(words, vec!["nice", "great"]);
    }

    #[test]
    fn culprits_rank_by_frequency_then_first_seen() {
        let lex = lexicon();
        let scorer = VaderScorer::new();
        let norm = Normalizer::default();
        let reviews = vec![
            critic("dull. boring.", 80.0),
            critic("bad and boring", 80.0),
            critic("boring, bad", 80.0),
        ];
        let report = DiagnosticAuditor::new(&scorer, &lex, &norm).audit(&reviews);
        let ranked: Vec<(&str, usize)> = report
            .fn_culprits
            .iter()
            .map(|c| (c.word.as_str(), c.count))
            .collect();
        assert_eq!(ranked, vec![("boring", 3), ("bad", 2), ("dull", 1)]);

        let limited = DiagnosticAuditor::new(&scorer, &lex, &norm)
            .with_limit(1)
            .audit(&reviews);
        assert_eq!(limited.fn_culprits.len(), 1);
        assert_eq!(limited.false_negatives.len(), 3);
    }

    #[test]
    fn missing_text_and_ratings_never_disagree() {
        let lex = lexicon();
        let scorer = VaderScorer::new();
        let norm = Normalizer::default();
        let reviews = vec![
            Review::new("Hades", AuthorRole::Critic, None, Some(95.0)),
            Review::new("Hades", AuthorRole::Critic, Some("boring".into()), None),
            critic("boring", 60.0),
        ];
        let report = DiagnosticAuditor::new(&scorer, &lex, &norm).audit(&reviews);
        assert_eq!(report.examined, 1);
        assert!(report.is_empty());
        assert!(report.fn_culprits.is_empty());
        assert!(report.fp_culprits.is_empty());
    }

    #[test]
    fn audit_is_idempotent_and_leaves_lexicon_alone() {
        let lex = lexicon();
        let before = lex.clone();
        let scorer = VaderScorer::new();
        let norm = Normalizer::default();
        let reviews = vec![critic("boring and dull", 90.0), user("great fun", 2.0)];
        let auditor = DiagnosticAuditor::new(&scorer, &lex, &norm);
        let first = auditor.audit(&reviews);
        let second = auditor.audit(&reviews);
        assert_eq!(first, second);
        assert_eq!(lex, before);
        assert_eq!(first.lexicon_fingerprint, before.fingerprint());
    }

    #[test]
    fn empty_corpus_gives_empty_report() {
        let lex = lexicon();
        let scorer = VaderScorer::new();
        let norm = Normalizer::default();
        let report = DiagnosticAuditor::new(&scorer, &lex, &norm).audit(&[]);
        assert_eq!(report.examined, 0);
        assert!(report.is_empty());
    }

    #[test]
    fn renders_fixed_width_tables() {
        let lex = lexicon();
        let scorer = VaderScorer::new();
        let norm = Normalizer::default();
        let report = DiagnosticAuditor::new(&scorer, &lex, &norm).audit(&[critic("boring", 90.0)]);
        let text = report.to_string();
        assert!(text.contains("Word            | Weight       | Frequency"));
        assert!(text.contains("boring          | -1.3         | 1"));
        assert!(text.contains("False negatives: 1"));
    }
}
